//! Username registration against the user-registry contract

use std::sync::Arc;

use super::WalletSession;
use crate::domain::repositories::WalletProvider;
use crate::shared::constants::{HARDHAT_KEY, MIN_USERNAME_LENGTH, REQUIRED_CONFIRMATIONS};
use crate::shared::error::{ProviderError, WalletError};
use crate::shared::types::{Address, Transaction, TransactionReceipt, WalletResult};
use crate::shared::utils::format_units_trimmed;

impl WalletSession {
    /// Submit `registerUsername(name)` paying the registration fee and wait
    /// for one confirmation.
    pub async fn register_username(&self, name: &str) -> WalletResult<TransactionReceipt> {
        let (owner, key) = {
            let state = self.state.borrow();
            (state.wallet_address, state.current_network_key.clone())
        };

        let owner = match owner {
            Some(owner) => owner,
            None => {
                self.log.error("Connect a wallet before registering.");
                return Err(WalletError::NotConnected);
            }
        };

        if name.chars().count() < MIN_USERNAME_LENGTH {
            self.log.error(format!(
                "Username must be at least {} characters long.",
                MIN_USERNAME_LENGTH
            ));
            return Err(WalletError::invalid_name(format!(
                "'{}' is shorter than {} characters",
                name, MIN_USERNAME_LENGTH
            )));
        }

        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                self.log.error("No wallet provider detected. Install a wallet first.");
                return Err(WalletError::ProviderUnavailable);
            }
        };

        let registry = match self.registry_address(&key) {
            Some(registry) => registry,
            None => {
                let message = format!("Registry address not configured for {}", key);
                self.log.error(&message);
                return Err(WalletError::config(message));
            }
        };

        let chain_id = self
            .registry
            .lookup(&key)
            .map(|network| network.chain_id)
            .ok_or_else(|| WalletError::unknown_network(key.clone()))?;

        self.log.info(format!("Preparing registration of \"{}\"...", name));
        self.advance_dev_chain(&key).await;

        let transaction = self
            .contracts
            .registration(owner, registry, name, self.registration_fee, chain_id)?;
        let fee = format_units_trimmed(self.registration_fee, 18)?;
        self.log.tx(format!("Sending registration transaction (fee {})...", fee));

        let receipt = match self.submit(provider.as_ref(), transaction).await {
            Ok(receipt) => receipt,
            Err(e) => {
                let error = if e.is_user_rejected() {
                    self.log.info("Registration transaction rejected by user.");
                    WalletError::user_rejected(e.message)
                } else {
                    let reason = e.human_reason().to_string();
                    self.log.error(format!("Registration failed: {}", reason));
                    WalletError::transaction_failed(reason)
                };
                return Err(error);
            }
        };

        if receipt.is_reverted() {
            self.log.error("Registration failed: transaction reverted");
            return Err(WalletError::transaction_failed("transaction reverted"));
        }

        self.log.tx(format!(
            "Registration {:?} confirmed in block {}",
            receipt.transaction_hash,
            receipt
                .block_number
                .map(|number| number.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        ));

        self.advance_dev_chain(&key).await;
        self.refresh_balances().await;
        self.log.success(format!("Registered \"{}\"!", name));

        Ok(receipt)
    }

    fn registry_address(&self, key: &str) -> Option<Address> {
        self.contract_addresses(key)
            .and_then(|addresses| addresses.registry_address)
    }

    async fn submit(
        &self,
        provider: &dyn WalletProvider,
        transaction: Transaction,
    ) -> Result<TransactionReceipt, ProviderError> {
        let tx_hash = provider.send_transaction(transaction).await?;
        self.log.tx(format!("Transaction hash: {:?}", tx_hash));
        provider.wait_for_receipt(tx_hash, REQUIRED_CONFIRMATIONS).await
    }

    /// One second and one block forward on the local dev chain, so
    /// time-based contract logic sees elapsed time. Failures are logged and
    /// otherwise ignored.
    async fn advance_dev_chain(&self, key: &str) {
        if key != HARDHAT_KEY || self.chain_control.is_none() {
            return;
        }
        if let Err(e) = self.mine_time_and_blocks(1, 1).await {
            log::warn!("Continuing without dev chain advance: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::NetworkRegistry;
    use crate::domain::entities::{ContractAddresses, LogCategory};
    use crate::domain::repositories::{MockChainControl, MockWalletProvider};
    use crate::shared::constants::*;
    use crate::shared::types::{BlockInfo, H256, U256};
    use std::collections::HashMap;

    const ACCOUNT: &str = "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6";
    const REGISTRY: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn session_on(network: &str, provider: MockWalletProvider, connected: bool) -> WalletSession {
        let registry = NetworkRegistry::builtin(network).unwrap();
        let mut deployments = HashMap::new();
        deployments.insert(
            network.to_string(),
            ContractAddresses {
                registry_address: Some(REGISTRY.parse().unwrap()),
                token_address: None,
            },
        );
        let session = WalletSession::new(registry)
            .unwrap()
            .with_provider(Arc::new(provider))
            .with_deployments(deployments);
        if connected {
            session.state.send_modify(|state| state.connect(ACCOUNT.parse().unwrap()));
        }
        session
    }

    fn mined(status: u64) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: H256::repeat_byte(0xab),
            block_number: Some(7),
            status: Some(status),
        }
    }

    #[tokio::test]
    async fn test_requires_connected_wallet() {
        let mut provider = MockWalletProvider::new();
        provider.expect_send_transaction().never();
        let session = session_on(DEFAULT_NETWORK_KEY, provider, false);

        let result = session.register_username("alice").await;

        assert!(matches!(result, Err(WalletError::NotConnected)));
    }

    #[tokio::test]
    async fn test_name_length_counts_characters() {
        let mut provider = MockWalletProvider::new();
        provider.expect_send_transaction().times(1).returning(|_| Ok(H256::zero()));
        provider.expect_wait_for_receipt().returning(|_, _| Ok(mined(1)));
        provider.expect_get_balance().returning(|_| Ok(U256::zero()));
        let session = session_on(DEFAULT_NETWORK_KEY, provider, true);

        // three characters, seven bytes
        let result = session.register_username("éé€").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_missing_registry_address() {
        let mut provider = MockWalletProvider::new();
        provider.expect_send_transaction().never();
        let session = session_on(DEFAULT_NETWORK_KEY, provider, true);
        session.state.send_modify(|state| state.current_network_key = AI3_KEY.to_string());

        let result = session.register_username("alice").await;

        assert!(matches!(result, Err(WalletError::Config(_))));
    }

    #[tokio::test]
    async fn test_successful_registration() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_send_transaction()
            .withf(|tx| tx.value == U256::exp10(16) && tx.chain_id == BASE_SEPOLIA_CHAIN_ID)
            .times(1)
            .returning(|_| Ok(H256::repeat_byte(0xab)));
        provider
            .expect_wait_for_receipt()
            .withf(|_, confirmations| *confirmations == 1)
            .returning(|_, _| Ok(mined(1)));
        provider.expect_get_balance().returning(|_| Ok(U256::exp10(18)));
        let session = session_on(DEFAULT_NETWORK_KEY, provider, true);

        let receipt = session.register_username("alice").await.unwrap();

        assert_eq!(receipt.block_number, Some(7));
        let latest = session.log().latest().unwrap();
        assert_eq!(latest.category, LogCategory::Success);
        assert!(session
            .log()
            .entries()
            .iter()
            .any(|entry| entry.category == LogCategory::Tx && entry.text.contains("block 7")));
    }

    #[tokio::test]
    async fn test_revert_reason_surfaces() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_send_transaction()
            .returning(|_| Err(ProviderError::reverted("Username already taken")));
        let session = session_on(DEFAULT_NETWORK_KEY, provider, true);

        let result = session.register_username("alice").await;

        match result {
            Err(WalletError::TransactionFailed { reason }) => assert_eq!(reason, "Username already taken"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_transaction() {
        let mut provider = MockWalletProvider::new();
        provider
            .expect_send_transaction()
            .returning(|_| Err(ProviderError::user_rejected()));
        let session = session_on(DEFAULT_NETWORK_KEY, provider, true);

        let result = session.register_username("alice").await;

        assert!(matches!(result, Err(WalletError::UserRejected(_))));
        assert_eq!(session.log().latest().unwrap().category, LogCategory::Info);
    }

    #[tokio::test]
    async fn test_reverted_receipt() {
        let mut provider = MockWalletProvider::new();
        provider.expect_send_transaction().returning(|_| Ok(H256::zero()));
        provider.expect_wait_for_receipt().returning(|_, _| Ok(mined(0)));
        let session = session_on(DEFAULT_NETWORK_KEY, provider, true);

        let result = session.register_username("alice").await;

        assert!(matches!(
            result,
            Err(WalletError::TransactionFailed { ref reason }) if reason == "transaction reverted"
        ));
    }

    #[tokio::test]
    async fn test_hardhat_advances_chain_and_tolerates_failure() {
        let mut provider = MockWalletProvider::new();
        provider.expect_send_transaction().returning(|_| Ok(H256::zero()));
        provider.expect_wait_for_receipt().returning(|_, _| Ok(mined(1)));
        provider.expect_get_balance().returning(|_| Ok(U256::zero()));

        let mut chain = MockChainControl::new();
        chain
            .expect_increase_time()
            .times(2)
            .returning(|_| Err(WalletError::chain_control("node offline")));
        chain.expect_mine_block().never();
        chain.expect_latest_block().returning(|| Ok(BlockInfo { number: 1, timestamp: 0 }));

        let session = session_on(HARDHAT_KEY, provider, true).with_chain_control(Arc::new(chain));

        let result = session.register_username("alice").await;

        assert!(result.is_ok());
    }
}
