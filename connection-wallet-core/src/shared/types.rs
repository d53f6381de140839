use serde::{Deserialize, Serialize};

pub use ethers::types::{Address, Bytes, H256, U256};

// Basic types for session operations
pub type ChainId = u64;
pub type NetworkKey = String;
pub type TransactionHash = H256;
pub type BlockNumber = u64;

/// Outgoing contract transaction, signed by the wallet provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub chain_id: ChainId,
}

/// Receipt fields the session cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: TransactionHash,
    pub block_number: Option<BlockNumber>,
    /// 1 for success, 0 for revert; absent on pre-Byzantium chains
    pub status: Option<u64>,
}

impl TransactionReceipt {
    pub fn is_reverted(&self) -> bool {
        self.status == Some(0)
    }
}

/// Latest block as reported by a dev node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub number: BlockNumber,
    /// Unix seconds
    pub timestamp: u64,
}

// Result types for better error handling
pub type WalletResult<T> = Result<T, crate::shared::error::WalletError>;
