//! Infrastructure layer - external integrations
//!
//! This module contains the configuration loader, logging setup and the
//! JSON-RPC backed implementations of the session's provider and dev-node
//! boundaries.

pub mod config;
pub mod dev_node;
pub mod logger;
pub mod rpc;

// Re-export infrastructure components
pub use config::WalletConfig;
pub use dev_node::DevNodeClient;
pub use logger::init_logging;
pub use rpc::{spawn_event_poller, JsonRpcWalletProvider};
