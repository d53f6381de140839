//! Dev-node chain control

use async_trait::async_trait;

use crate::shared::error::WalletError;
use crate::shared::types::{Address, BlockInfo, TransactionHash, U256};

/// Controls a local development chain (Hardhat): time travel, mining and a
/// gas faucet funded from the deployer key
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainControl: Send + Sync {
    async fn increase_time(&self, seconds: u64) -> Result<(), WalletError>;

    async fn mine_block(&self) -> Result<(), WalletError>;

    async fn latest_block(&self) -> Result<BlockInfo, WalletError>;

    /// Send `amount` native units to `to` and wait for it to be mined
    async fn fund(&self, to: Address, amount: U256) -> Result<TransactionHash, WalletError>;
}
