//! Domain entities and value objects
//! 
//! This module contains the core domain entities and value objects
//! that represent the business concepts of a wallet session.

pub mod network;
pub mod session;
pub mod log_entry;

// Re-export entities
pub use network::*;
pub use session::*;
pub use log_entry::*;
