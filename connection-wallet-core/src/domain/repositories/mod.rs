//! Domain repositories
//! 
//! This module contains the traits at the session's external seams: the
//! wallet provider and the dev-node chain control.

pub mod wallet_provider;
pub mod chain_control;

// Re-export repositories
pub use wallet_provider::*;
pub use chain_control::*;
