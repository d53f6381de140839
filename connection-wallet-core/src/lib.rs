//! Connection Wallet Core
//!
//! Wallet session core for the Connection dApp.
//! Connects to a wallet provider, switches EVM networks, reads native and
//! token balances and registers usernames with the user-registry contract.
//!
//! ## Architecture
//!
//! - **Core**: Network registry, wallet session, activity log, contract calls
//! - **Domain**: Entities and the provider / dev-node traits
//! - **Infrastructure**: Configuration, logging, JSON-RPC backends
//! - **Shared**: Common types, constants, and utilities
//!
//! ## Usage
//!
//! ```rust,no_run
//! use connection_wallet_core::{init, init_wallet_session};
//!
//! # async fn run() -> Result<(), connection_wallet_core::WalletError> {
//! let config = init()?;
//! let (session, events) = init_wallet_session(&config)?;
//!
//! let flow = async {
//!     session.connect().await?;
//!     session.switch_network("hardhat").await?;
//!     session.register_username("alice").await
//! };
//! tokio::select! {
//!     _ = session.run_events(events) => {}
//!     result = flow => {
//!         result?;
//!     }
//! }
//!
//! for entry in session.log().entries() {
//!     println!("[{}] {}", entry.time_label(), entry.text);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export specific components
pub use crate::core::{
    BoundedLog, NetworkRegistry, SwitchOutcome, Transition, WalletEvent, WalletSession,
};
pub use crate::infrastructure::{DevNodeClient, JsonRpcWalletProvider, WalletConfig};

// Re-export domain entities
pub use crate::domain::{
    BalanceDisplay, ChainControl, ConnectionStatus, ContractAddresses, LogCategory, LogEntry,
    NetworkDescriptor, SessionState, WalletProvider,
};

// Re-export shared types
pub use crate::shared::error::{BalanceFailure, ProviderError, WalletError};
pub use crate::shared::types::WalletResult;

// Version information
pub use crate::shared::constants::{DESCRIPTION, NAME, VERSION};

/// Load configuration from `.env` / the environment and initialize logging
pub fn init() -> WalletResult<WalletConfig> {
    let config = WalletConfig::load()?;
    infrastructure::init_logging(&config.log_level);
    log::info!("{} v{} initialized", NAME, VERSION);
    Ok(config)
}

/// Build a session wired to the JSON-RPC backends described by `config`.
///
/// Spawns the account/chain poller on the current tokio runtime; drive the
/// returned queue with [`WalletSession::run_events`]. The poller stops once
/// the queue is dropped.
pub fn init_wallet_session(
    config: &WalletConfig,
) -> WalletResult<(WalletSession, mpsc::Receiver<WalletEvent>)> {
    let registry = config.build_registry()?;
    let rpc_url = registry
        .lookup(registry.default_key())
        .map(|network| network.rpc_url.clone())
        .ok_or_else(|| WalletError::unknown_network(registry.default_key()))?;

    let provider = Arc::new(JsonRpcWalletProvider::new(&rpc_url)?);
    let mut session = WalletSession::new(registry)?
        .with_deployments(config.deployments.clone())
        .with_registration_fee(config.registration_fee_wei()?)
        .with_provider(provider.clone());

    if let Some(url) = config.dev_node_url() {
        let mut dev_node = DevNodeClient::new(&url)?;
        if let Some(key) = &config.faucet_private_key {
            dev_node = dev_node.with_faucet_key(key)?;
        }
        log::info!("Dev node controls enabled at {}", url);
        session = session.with_chain_control(Arc::new(dev_node));
    }

    let (sender, events) = crate::core::event_channel();
    infrastructure::spawn_event_poller(
        provider,
        sender,
        Duration::from_millis(shared::constants::EVENT_POLL_INTERVAL_MS),
    );

    Ok((session, events))
}
