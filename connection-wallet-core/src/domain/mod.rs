//! Domain layer - entities and repositories
//! 
//! This module contains the domain model of a wallet session and the traits
//! through which the session reaches wallets and chains.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
