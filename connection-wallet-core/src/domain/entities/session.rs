//! Session state and the values the UI renders from it

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::error::BalanceFailure;
use crate::shared::types::{Address, NetworkKey};

/// Where the session is in its connect/switch lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected { network: NetworkKey },
    SwitchingNetwork { from: NetworkKey, to: NetworkKey },
}

/// What a balance field currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BalanceDisplay {
    Disconnected,
    Loading,
    Amount { value: String, symbol: String },
    NotConfigured,
    Unavailable { reason: BalanceFailure },
}

impl BalanceDisplay {
    pub fn amount(value: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::Amount {
            value: value.into(),
            symbol: symbol.into(),
        }
    }

    pub fn unavailable(reason: BalanceFailure) -> Self {
        Self::Unavailable { reason }
    }
}

impl fmt::Display for BalanceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceDisplay::Disconnected => write!(f, "Not connected"),
            BalanceDisplay::Loading => write!(f, "Loading..."),
            BalanceDisplay::Amount { value, symbol } => write!(f, "{} {}", value, symbol),
            BalanceDisplay::NotConfigured => write!(f, "Token address not configured"),
            BalanceDisplay::Unavailable { reason } => match reason {
                BalanceFailure::Decode => write!(f, "Balance unreadable (decode failed)"),
                BalanceFailure::Revert => write!(f, "Balance call reverted"),
                BalanceFailure::Unknown => write!(f, "Balance unavailable"),
            },
        }
    }
}

/// Observable wallet session state.
///
/// Whenever `wallet_address` is `None` both balances hold
/// [`BalanceDisplay::Disconnected`]; [`SessionState::disconnect`] is the only
/// way the address is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub wallet_address: Option<Address>,
    pub current_network_key: NetworkKey,
    pub native_balance: BalanceDisplay,
    pub token_balance: BalanceDisplay,
    pub status: ConnectionStatus,
}

impl SessionState {
    pub fn new(default_network: impl Into<NetworkKey>) -> Self {
        Self {
            wallet_address: None,
            current_network_key: default_network.into(),
            native_balance: BalanceDisplay::Disconnected,
            token_balance: BalanceDisplay::Disconnected,
            status: ConnectionStatus::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.wallet_address.is_some()
    }

    /// Adopt an account and mark the session connected on the current network
    pub fn connect(&mut self, address: Address) {
        self.wallet_address = Some(address);
        self.status = ConnectionStatus::Connected {
            network: self.current_network_key.clone(),
        };
    }

    pub fn disconnect(&mut self) {
        self.wallet_address = None;
        self.native_balance = BalanceDisplay::Disconnected;
        self.token_balance = BalanceDisplay::Disconnected;
        self.status = ConnectionStatus::Disconnected;
    }

    /// Status to settle on once no connect/switch is in flight
    pub fn settled_status(&self) -> ConnectionStatus {
        if self.is_connected() {
            ConnectionStatus::Connected {
                network: self.current_network_key.clone(),
            }
        } else {
            ConnectionStatus::Disconnected
        }
    }
}
