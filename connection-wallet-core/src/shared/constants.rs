//! Constants for the wallet core
//!
//! This module contains all constants used throughout the wallet core.

// Network keys, as written by the deploy step
pub const BASE_SEPOLIA_KEY: &str = "baseSepolia";
pub const AI3_KEY: &str = "ai3";
pub const HARDHAT_KEY: &str = "hardhat";
pub const DEFAULT_NETWORK_KEY: &str = BASE_SEPOLIA_KEY;

// Chain ids
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;
pub const AI3_CHAIN_ID: u64 = 870;
pub const HARDHAT_CHAIN_ID: u64 = 31337;

// Default RPC endpoints
pub const BASE_SEPOLIA_RPC_URL: &str = "https://sepolia.base.org";
pub const AI3_RPC_URL: &str = "https://auto-evm.mainnet.autonomys.xyz/ws";
pub const HARDHAT_RPC_URL: &str = "http://127.0.0.1:8545";

// Block explorers
pub const BASE_SEPOLIA_EXPLORER_URL: &str = "https://sepolia-explorer.base.org";
pub const AI3_EXPLORER_URL: &str = "https://explorer.auto-evm.mainnet.autonomys.xyz";

// Session constants
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const LOG_CAPACITY: usize = 100;
pub const MAX_CHAIN_SWITCH_RETRIES: usize = 1;
pub const REQUIRED_CONFIRMATIONS: usize = 1;
pub const EVENT_CHANNEL_CAPACITY: usize = 32;
pub const EVENT_POLL_INTERVAL_MS: u64 = 2000;

// Status projection messages
pub const INITIAL_STATUS: &str = "Not initialized...";
pub const CLEARED_STATUS: &str = "Log cleared.";

// Token and fee constants
pub const TOKEN_SYMBOL: &str = "CT";
pub const TOKEN_DECIMALS: u8 = 18;
pub const DEFAULT_REGISTRATION_FEE: &str = "0.01"; // native units
pub const FAUCET_AMOUNT: &str = "1.0"; // native units

// Contract interfaces (human-readable ABI)
pub const TOKEN_ABI: &[&str] = &["function balanceOf(address account) external view returns (uint256)"];
pub const REGISTRY_ABI: &[&str] = &["function registerUsername(string username) external payable"];

// Provider error codes (EIP-1193 / EIP-1474)
pub const USER_REJECTED_CODE: i64 = 4001;
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;
pub const EXECUTION_REVERTED_CODE: i64 = 3;
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;
pub const METHOD_NOT_SUPPORTED_CODE: i64 = -32004;
pub const INTERNAL_ERROR_CODE: i64 = -32603;

// Wallet RPC methods
pub const REQUEST_ACCOUNTS_METHOD: &str = "eth_requestAccounts";
pub const ACCOUNTS_METHOD: &str = "eth_accounts";
pub const SWITCH_CHAIN_METHOD: &str = "wallet_switchEthereumChain";
pub const ADD_CHAIN_METHOD: &str = "wallet_addEthereumChain";

// Hardhat RPC methods
pub const MINE_BLOCK_METHOD: &str = "evm_mine";
pub const INCREASE_TIME_METHOD: &str = "evm_increaseTime";
pub const GET_BLOCK_METHOD: &str = "eth_getBlockByNumber";

// Configuration
pub const DEFAULT_DEPLOYMENTS_FILE: &str = "deployments.json";
pub const FAUCET_KEY_PLACEHOLDER: &str = "YOUR_PRIVATE_KEY_HERE";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Validation constants
pub const ADDRESS_LENGTH: usize = 42; // 0x + 40 hex chars

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids() {
        assert_eq!(BASE_SEPOLIA_CHAIN_ID, 84532);
        assert_eq!(AI3_CHAIN_ID, 870);
        assert_eq!(HARDHAT_CHAIN_ID, 31337);
    }

    #[test]
    fn test_session_limits() {
        assert_eq!(MIN_USERNAME_LENGTH, 3);
        assert_eq!(LOG_CAPACITY, 100);
        assert_eq!(MAX_CHAIN_SWITCH_RETRIES, 1);
    }

    #[test]
    fn test_provider_codes() {
        assert_eq!(USER_REJECTED_CODE, 4001);
        assert_eq!(UNRECOGNIZED_CHAIN_CODE, 4902);
    }
}
