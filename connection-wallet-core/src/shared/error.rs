//! Error handling for the wallet core
//!
//! This module defines the error types used throughout the wallet core:
//! [`WalletError`] for session operations and [`ProviderError`] for failures
//! reported across the wallet provider boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::shared::constants::{
    EXECUTION_REVERTED_CODE, INTERNAL_ERROR_CODE, UNRECOGNIZED_CHAIN_CODE, USER_REJECTED_CODE,
};

/// Why a balance could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceFailure {
    /// The call returned data that does not decode as `uint256`
    Decode,
    /// The node reported an execution revert
    Revert,
    Unknown,
}

impl fmt::Display for BalanceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceFailure::Decode => write!(f, "decode"),
            BalanceFailure::Revert => write!(f, "revert"),
            BalanceFailure::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error reported by a wallet provider, keyed by EIP-1193 / JSON-RPC code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    /// Revert reason string, when the node supplied one
    pub reason: Option<String>,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The user dismissed the wallet prompt
    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_CODE, "User rejected the request.")
    }

    /// The wallet does not know the requested chain id
    pub fn unrecognized_chain(chain_id_hex: &str) -> Self {
        Self::new(
            UNRECOGNIZED_CHAIN_CODE,
            format!("Unrecognized chain ID \"{}\". Try adding the chain first.", chain_id_hex),
        )
    }

    pub fn reverted(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(EXECUTION_REVERTED_CODE, format!("execution reverted: {}", reason)).with_reason(reason)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR_CODE, message)
    }

    pub fn is_user_rejected(&self) -> bool {
        self.code == USER_REJECTED_CODE
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN_CODE
    }

    pub fn is_revert(&self) -> bool {
        self.code == EXECUTION_REVERTED_CODE
            || self.reason.is_some()
            || self.message.to_lowercase().contains("revert")
    }

    /// Revert reason when present, the raw message otherwise
    pub fn human_reason(&self) -> &str {
        self.reason.as_deref().unwrap_or(&self.message)
    }

    /// Classify a failed balance query
    pub fn balance_failure(&self) -> BalanceFailure {
        if self.is_revert() {
            BalanceFailure::Revert
        } else if self.message.to_lowercase().contains("decode") {
            BalanceFailure::Decode
        } else {
            BalanceFailure::Unknown
        }
    }
}

/// Wallet error type
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("No wallet provider available")]
    ProviderUnavailable,

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("User rejected: {0}")]
    UserRejected(String),

    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Balance query failed ({reason}): {message}")]
    BalanceQueryFailed {
        reason: BalanceFailure,
        message: String,
    },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Network switch failed: {0}")]
    NetworkSwitchFailed(String),

    #[error("Chain control error: {0}")]
    ChainControl(String),

    #[error("A faucet request is already in progress")]
    FaucetBusy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Create an unknown network error
    pub fn unknown_network(key: impl Into<String>) -> Self {
        Self::UnknownNetwork(key.into())
    }

    /// Create a user rejected error
    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::UserRejected(message.into())
    }

    pub fn connect_failed(message: impl Into<String>) -> Self {
        Self::ConnectFailed(message.into())
    }

    /// Create an invalid name error
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName(message.into())
    }

    pub fn balance_query_failed(reason: BalanceFailure, message: impl Into<String>) -> Self {
        Self::BalanceQueryFailed {
            reason,
            message: message.into(),
        }
    }

    /// Create a transaction error
    pub fn transaction_failed(reason: impl Into<String>) -> Self {
        Self::TransactionFailed {
            reason: reason.into(),
        }
    }

    pub fn network_switch_failed(message: impl Into<String>) -> Self {
        Self::NetworkSwitchFailed(message.into())
    }

    pub fn chain_control(message: impl Into<String>) -> Self {
        Self::ChainControl(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// User rejection is informational, everything else is a failure
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected(_))
    }
}

// Standard library error conversions
impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        Self::config(format!("IO error: {}", err))
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(err: hex::FromHexError) -> Self {
        Self::validation(format!("Hex decoding error: {}", err))
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(format!("JSON error: {}", err))
    }
}

impl From<ethers::utils::ConversionError> for WalletError {
    fn from(err: ethers::utils::ConversionError) -> Self {
        Self::validation(format!("Unit conversion error: {}", err))
    }
}

impl From<ethers::abi::AbiError> for WalletError {
    fn from(err: ethers::abi::AbiError) -> Self {
        Self::internal(format!("ABI error: {}", err))
    }
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        if err.is_user_rejected() {
            Self::user_rejected(err.message)
        } else {
            Self::internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_classification() {
        assert!(ProviderError::user_rejected().is_user_rejected());
        assert!(ProviderError::unrecognized_chain("0x366").is_unrecognized_chain());
        assert!(!ProviderError::user_rejected().is_unrecognized_chain());

        let reverted = ProviderError::reverted("Insufficient registration fee");
        assert!(reverted.is_revert());
        assert_eq!(reverted.human_reason(), "Insufficient registration fee");
    }

    #[test]
    fn test_balance_failure_classification() {
        let revert = ProviderError::new(-32000, "execution reverted");
        assert_eq!(revert.balance_failure(), BalanceFailure::Revert);

        let decode = ProviderError::new(-32603, "could not decode result data");
        assert_eq!(decode.balance_failure(), BalanceFailure::Decode);

        let timeout = ProviderError::internal("request timed out");
        assert_eq!(timeout.balance_failure(), BalanceFailure::Unknown);
    }

    #[test]
    fn test_human_reason_falls_back_to_message() {
        let error = ProviderError::new(-32000, "insufficient funds for gas");
        assert_eq!(error.human_reason(), "insufficient funds for gas");
    }

    #[test]
    fn test_wallet_error_creation() {
        let unknown = WalletError::unknown_network("goerli");
        let invalid = WalletError::invalid_name("too short");
        let rejected = WalletError::user_rejected("cancelled");

        assert!(matches!(unknown, WalletError::UnknownNetwork(ref key) if key == "goerli"));
        assert!(matches!(invalid, WalletError::InvalidName(_)));
        assert!(rejected.is_user_rejected());
        assert!(!invalid.is_user_rejected());
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let wallet_error: WalletError = io_error.into();

        assert!(matches!(wallet_error, WalletError::Config(_)));

        let rejected: WalletError = ProviderError::user_rejected().into();
        assert!(rejected.is_user_rejected());

        let failed: WalletError = ProviderError::internal("boom").into();
        assert!(matches!(failed, WalletError::Internal(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn test_error_display() {
        let error = WalletError::balance_query_failed(BalanceFailure::Decode, "bad data");
        let display = format!("{}", error);

        assert!(display.contains("Balance query failed"));
        assert!(display.contains("decode"));
        assert!(display.contains("bad data"));
    }
}
