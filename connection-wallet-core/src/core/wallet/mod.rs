//! Wallet session management
//!
//! [`WalletSession`] owns the observable [`SessionState`] and drives the
//! connect / switch-network lifecycle against a [`WalletProvider`]. Balance
//! queries, username registration, dev-node helpers and wallet events live in
//! the submodules as further `impl WalletSession` blocks.

mod balances;
mod dev_tools;
pub mod events;
mod registration;

pub use events::{apply_event, event_channel, Transition, WalletEvent};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::core::activity::BoundedLog;
use crate::core::registry::NetworkRegistry;
use crate::core::transactions::ContractCalls;
use crate::domain::entities::{ConnectionStatus, ContractAddresses, NetworkDescriptor, SessionState};
use crate::domain::repositories::{ChainControl, WalletProvider};
use crate::shared::constants::{HARDHAT_KEY, MAX_CHAIN_SWITCH_RETRIES};
use crate::shared::error::{ProviderError, WalletError};
use crate::shared::types::{Address, NetworkKey, WalletResult, U256};
use crate::shared::utils::{parse_address, short_address};

/// Result of a network switch the user was asked to approve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    /// The user dismissed the prompt; the previous network stays selected
    Rejected,
}

pub struct WalletSession {
    registry: NetworkRegistry,
    deployments: HashMap<NetworkKey, ContractAddresses>,
    provider: Option<Arc<dyn WalletProvider>>,
    chain_control: Option<Arc<dyn ChainControl>>,
    contracts: ContractCalls,
    registration_fee: U256,
    state: watch::Sender<SessionState>,
    mining: watch::Sender<bool>,
    fauceting: AtomicBool,
    log: BoundedLog,
}

impl WalletSession {
    /// Session on the registry's default network with no provider attached
    pub fn new(registry: NetworkRegistry) -> WalletResult<Self> {
        let (state, _) = watch::channel(SessionState::new(registry.default_key()));
        let (mining, _) = watch::channel(false);

        Ok(Self {
            registry,
            deployments: HashMap::new(),
            provider: None,
            chain_control: None,
            contracts: ContractCalls::new()?,
            // 0.01 native units
            registration_fee: U256::exp10(16),
            state,
            mining,
            fauceting: AtomicBool::new(false),
            log: BoundedLog::new(),
        })
    }

    pub fn with_provider(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_chain_control(mut self, chain_control: Arc<dyn ChainControl>) -> Self {
        self.chain_control = Some(chain_control);
        self
    }

    pub fn with_deployments(mut self, deployments: HashMap<NetworkKey, ContractAddresses>) -> Self {
        self.deployments = deployments;
        self
    }

    pub fn with_registration_fee(mut self, fee: U256) -> Self {
        self.registration_fee = fee;
        self
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn subscribe_mining(&self) -> watch::Receiver<bool> {
        self.mining.subscribe()
    }

    pub fn is_mining(&self) -> bool {
        *self.mining.borrow()
    }

    pub fn is_fauceting(&self) -> bool {
        self.fauceting.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> &BoundedLog {
        &self.log
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    pub fn registration_fee(&self) -> U256 {
        self.registration_fee
    }

    pub fn current_network(&self) -> Option<&NetworkDescriptor> {
        let key = self.state.borrow().current_network_key.clone();
        self.registry.lookup(&key)
    }

    pub fn contract_addresses(&self, key: &str) -> Option<&ContractAddresses> {
        self.deployments.get(key)
    }

    /// Request account access, then select the current network.
    ///
    /// A failed or rejected network switch leaves the wallet connected; the
    /// failure is in the log and the returned address is still valid.
    pub async fn connect(&self) -> WalletResult<Address> {
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                self.log.error("No wallet provider detected. Install a wallet first.");
                return Err(WalletError::ProviderUnavailable);
            }
        };

        self.state.send_modify(|state| state.status = ConnectionStatus::Connecting);
        self.log.info("Requesting wallet connection...");

        let address = match self.request_first_account(provider.as_ref()).await {
            Ok(address) => address,
            Err(e) => {
                self.state.send_modify(|state| state.disconnect());
                if e.is_user_rejected() {
                    self.log.info("Connection request rejected by user.");
                } else {
                    self.log.error(format!("Connection failed: {}", e));
                }
                return Err(e);
            }
        };

        self.state.send_modify(|state| state.connect(address));
        self.log.info(format!("Wallet connected: {}, checking network...", short_address(&address)));

        let key = self.state.borrow().current_network_key.clone();
        if let Ok(SwitchOutcome::Switched) = self.switch_network(&key).await {
            if key == HARDHAT_KEY && self.chain_control.is_some() {
                self.block_info().await;
            }
            self.log.success("Wallet connected, network ready!");
        }

        Ok(address)
    }

    async fn request_first_account(&self, provider: &dyn WalletProvider) -> WalletResult<Address> {
        let accounts = provider.request_accounts().await.map_err(|e| {
            if e.is_user_rejected() {
                WalletError::user_rejected(e.message)
            } else {
                WalletError::connect_failed(e.message)
            }
        })?;

        let first = accounts
            .first()
            .ok_or_else(|| WalletError::connect_failed("Wallet returned no accounts"))?;

        parse_address(first).map_err(|e| WalletError::connect_failed(e.to_string()))
    }

    /// Ask the wallet to select `key`, registering the chain first when the
    /// wallet does not know it.
    pub async fn switch_network(&self, key: &str) -> WalletResult<SwitchOutcome> {
        let network = match self.registry.lookup(key) {
            Some(network) => network.clone(),
            None => {
                self.log.error(format!("Unknown network: {}", key));
                return Err(WalletError::unknown_network(key));
            }
        };

        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                self.log.error("No wallet provider detected. Install a wallet first.");
                return Err(WalletError::ProviderUnavailable);
            }
        };

        self.state.send_modify(|state| {
            state.status = ConnectionStatus::SwitchingNetwork {
                from: state.current_network_key.clone(),
                to: network.key.clone(),
            };
        });

        match self.request_switch(provider.as_ref(), &network).await {
            Ok(()) => {
                self.state.send_modify(|state| {
                    state.current_network_key = network.key.clone();
                    state.status = state.settled_status();
                });
                self.log.info(format!(
                    "Switched to {} (chain {})",
                    network.display_name, network.chain_id
                ));
                self.refresh_balances().await;
                Ok(SwitchOutcome::Switched)
            }
            Err(e) => {
                self.state.send_modify(|state| state.status = state.settled_status());
                if e.is_user_rejected() {
                    self.log.info(format!("Switch to {} rejected by user.", network.display_name));
                    Ok(SwitchOutcome::Rejected)
                } else {
                    self.log.error(format!("Network switch failed: {}", e.message));
                    Err(WalletError::network_switch_failed(e.message))
                }
            }
        }
    }

    async fn request_switch(
        &self,
        provider: &dyn WalletProvider,
        network: &NetworkDescriptor,
    ) -> Result<(), ProviderError> {
        let chain_id_hex = network.chain_id_hex();
        let mut retries_left = MAX_CHAIN_SWITCH_RETRIES;

        loop {
            match provider.switch_chain(chain_id_hex.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_unrecognized_chain() && retries_left > 0 => {
                    retries_left -= 1;
                    self.log.info(format!(
                        "{} is not known to the wallet, adding it...",
                        network.display_name
                    ));
                    provider.add_chain(network.add_chain_params()).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BalanceDisplay, LogCategory};
    use crate::domain::repositories::MockWalletProvider;
    use crate::shared::constants::*;
    use mockall::predicate::eq;

    const ACCOUNT: &str = "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6";

    fn session_with(provider: MockWalletProvider) -> WalletSession {
        let registry = NetworkRegistry::builtin(DEFAULT_NETWORK_KEY).unwrap();
        WalletSession::new(registry).unwrap().with_provider(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_connect_without_provider() {
        let registry = NetworkRegistry::builtin(DEFAULT_NETWORK_KEY).unwrap();
        let session = WalletSession::new(registry).unwrap();

        let result = session.connect().await;

        assert!(matches!(result, Err(WalletError::ProviderUnavailable)));
        assert_eq!(session.log().latest().unwrap().category, LogCategory::Error);
    }

    #[tokio::test]
    async fn test_connect_rejected_returns_to_disconnected() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_request_accounts()
            .times(1)
            .returning(|| Err(ProviderError::user_rejected()));
        provider.expect_switch_chain().never();
        let session = session_with(provider);

        let result = session.connect().await;

        assert!(matches!(result, Err(WalletError::UserRejected(_))));
        let state = session.state();
        assert_eq!(state.status, ConnectionStatus::Disconnected);
        assert!(state.wallet_address.is_none());
        assert_eq!(session.log().latest().unwrap().category, LogCategory::Info);
    }

    #[tokio::test]
    async fn test_connect_empty_accounts_fails() {
        let mut provider = MockWalletProvider::new();
        provider.expect_request_accounts().returning(|| Ok(vec![]));
        let session = session_with(provider);

        let result = session.connect().await;

        assert!(matches!(result, Err(WalletError::ConnectFailed(_))));
        assert_eq!(session.state().status, ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_keeps_wallet_when_switch_rejected() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_request_accounts()
            .returning(|| Ok(vec![ACCOUNT.to_string()]));
        provider
            .expect_switch_chain()
            .times(1)
            .returning(|_| Err(ProviderError::user_rejected()));
        provider.expect_get_balance().never();
        let session = session_with(provider);

        let address = session.connect().await.unwrap();

        let state = session.state();
        assert_eq!(state.wallet_address, Some(address));
        assert_eq!(
            state.status,
            ConnectionStatus::Connected {
                network: BASE_SEPOLIA_KEY.to_string()
            }
        );
        assert!(session
            .log()
            .entries()
            .iter()
            .all(|entry| entry.category != LogCategory::Success));
    }

    #[tokio::test]
    async fn test_switch_unknown_network() {
        let mut provider = MockWalletProvider::new();
        provider.expect_switch_chain().never();
        let session = session_with(provider);

        let result = session.switch_network("goerli").await;

        assert!(matches!(result, Err(WalletError::UnknownNetwork(_))));
        assert_eq!(session.state().current_network_key, BASE_SEPOLIA_KEY);
    }

    #[tokio::test]
    async fn test_switch_failure_keeps_previous_network() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_switch_chain()
            .with(eq("0x366".to_string()))
            .times(1)
            .returning(|_| Err(ProviderError::internal("wallet exploded")));
        provider.expect_add_chain().never();
        let session = session_with(provider);

        let result = session.switch_network(AI3_KEY).await;

        assert!(matches!(result, Err(WalletError::NetworkSwitchFailed(_))));
        let state = session.state();
        assert_eq!(state.current_network_key, BASE_SEPOLIA_KEY);
        assert_eq!(state.status, ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_add_chain_rejected() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_switch_chain()
            .times(1)
            .returning(|hex| Err(ProviderError::unrecognized_chain(&hex)));
        provider
            .expect_add_chain()
            .times(1)
            .returning(|_| Err(ProviderError::user_rejected()));
        let session = session_with(provider);

        let outcome = session.switch_network(AI3_KEY).await.unwrap();

        assert_eq!(outcome, SwitchOutcome::Rejected);
        assert_eq!(session.state().current_network_key, BASE_SEPOLIA_KEY);
    }

    #[tokio::test]
    async fn test_repeated_unrecognized_chain_is_bounded() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_switch_chain()
            .times(2)
            .returning(|hex| Err(ProviderError::unrecognized_chain(&hex)));
        provider.expect_add_chain().times(1).returning(|_| Ok(()));
        let session = session_with(provider);

        let result = session.switch_network(AI3_KEY).await;

        assert!(matches!(result, Err(WalletError::NetworkSwitchFailed(_))));
    }

    #[tokio::test]
    async fn test_switch_while_disconnected_skips_balances() {
        let mut provider = MockWalletProvider::new();
        provider.expect_switch_chain().returning(|_| Ok(()));
        provider.expect_get_balance().never();
        let session = session_with(provider);

        let outcome = session.switch_network(HARDHAT_KEY).await.unwrap();

        assert_eq!(outcome, SwitchOutcome::Switched);
        let state = session.state();
        assert_eq!(state.current_network_key, HARDHAT_KEY);
        assert_eq!(state.native_balance, BalanceDisplay::Disconnected);
    }
}
