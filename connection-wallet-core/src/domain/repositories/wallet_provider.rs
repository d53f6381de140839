//! Wallet provider boundary
//!
//! The session never talks to a chain directly; every account request, chain
//! switch, balance query and transaction goes through a [`WalletProvider`].

use async_trait::async_trait;

use crate::domain::entities::AddChainParams;
use crate::shared::error::ProviderError;
use crate::shared::types::{Address, Bytes, Transaction, TransactionHash, TransactionReceipt, U256};

/// Wallet-side RPC bridge (an injected browser wallet, or a node with
/// managed accounts)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// `wallet_switchEthereumChain`, keyed by hex chain id
    async fn switch_chain(&self, chain_id_hex: String) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`
    async fn add_chain(&self, params: AddChainParams) -> Result<(), ProviderError>;

    /// Native balance in base units
    async fn get_balance(&self, address: Address) -> Result<U256, ProviderError>;

    /// Read-only contract call, returns raw return data
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;

    /// Sign and submit, returns the transaction hash
    async fn send_transaction(&self, transaction: Transaction) -> Result<TransactionHash, ProviderError>;

    /// Block until the transaction has `confirmations` confirmations
    async fn wait_for_receipt(
        &self,
        tx_hash: TransactionHash,
        confirmations: usize,
    ) -> Result<TransactionReceipt, ProviderError>;
}
