//! Wallet-originated events
//!
//! Account and chain changes arrive on a queue and are folded into the
//! session state by [`apply_event`], a pure function of the previous state.
//! The session applies the resulting state and runs the follow-up work the
//! [`Transition`] calls for.

use tokio::sync::mpsc;

use super::WalletSession;
use crate::core::registry::NetworkRegistry;
use crate::domain::entities::SessionState;
use crate::shared::constants::EVENT_CHANNEL_CAPACITY;
use crate::shared::types::{Address, NetworkKey};
use crate::shared::utils::{parse_address, short_address};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// New account list, first entry is the selected account
    AccountsChanged(Vec<String>),
    /// Hex chain id now selected in the wallet
    ChainChanged(String),
}

/// What an event did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    AccountAdopted(Address),
    Disconnected,
    NetworkChanged { key: NetworkKey },
    UnrecognizedChain(String),
    InvalidAccount(String),
}

/// Fold one event into the state
pub fn apply_event(
    state: &SessionState,
    event: &WalletEvent,
    registry: &NetworkRegistry,
) -> (SessionState, Transition) {
    let mut next = state.clone();

    let transition = match event {
        WalletEvent::AccountsChanged(accounts) => match accounts.first() {
            None => {
                next.disconnect();
                Transition::Disconnected
            }
            Some(account) => match parse_address(account) {
                Ok(address) => {
                    next.connect(address);
                    Transition::AccountAdopted(address)
                }
                Err(_) => return (next, Transition::InvalidAccount(account.clone())),
            },
        },
        WalletEvent::ChainChanged(chain_id_hex) => match registry.by_hex_chain_id(chain_id_hex) {
            Some(network) => {
                next.current_network_key = network.key.clone();
                next.status = next.settled_status();
                Transition::NetworkChanged {
                    key: network.key.clone(),
                }
            }
            None => Transition::UnrecognizedChain(chain_id_hex.clone()),
        },
    };

    (next, transition)
}

/// Queue feeding [`WalletSession::run_events`]
pub fn event_channel() -> (mpsc::Sender<WalletEvent>, mpsc::Receiver<WalletEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

impl WalletSession {
    /// Drain the event queue until every sender is dropped
    pub async fn run_events(&self, mut events: mpsc::Receiver<WalletEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        log::debug!("Wallet event queue closed");
    }

    pub async fn handle_event(&self, event: WalletEvent) -> Transition {
        let mut transition = Transition::Disconnected;
        self.state.send_if_modified(|state| {
            let (next, applied) = apply_event(state, &event, &self.registry);
            transition = applied;
            if next == *state {
                return false;
            }
            *state = next;
            true
        });

        match &transition {
            Transition::AccountAdopted(address) => {
                self.log.info(format!("Wallet account changed to {}", short_address(address)));
                self.refresh_balances().await;
            }
            Transition::Disconnected => {
                self.log.info("Wallet disconnected.");
            }
            Transition::NetworkChanged { key } => {
                let name = self
                    .registry
                    .lookup(key)
                    .map(|network| network.display_name.clone())
                    .unwrap_or_else(|| key.clone());
                self.log.info(format!("Network changed to {}", name));
                self.refresh_balances().await;
            }
            Transition::UnrecognizedChain(chain_id_hex) => {
                self.log.error(format!("Wallet switched to an unrecognized network ({})", chain_id_hex));
            }
            Transition::InvalidAccount(account) => {
                self.log.error(format!("Wallet reported an invalid account: {}", account));
            }
        }

        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BalanceDisplay, ConnectionStatus};
    use crate::shared::constants::*;
    use proptest::prelude::*;

    const ACCOUNT: &str = "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6";

    fn registry() -> NetworkRegistry {
        NetworkRegistry::builtin(DEFAULT_NETWORK_KEY).unwrap()
    }

    fn connected_state() -> SessionState {
        let mut state = SessionState::new(DEFAULT_NETWORK_KEY);
        state.connect(ACCOUNT.parse().unwrap());
        state.native_balance = BalanceDisplay::amount("1.0", "ETH");
        state.token_balance = BalanceDisplay::amount("100.0", TOKEN_SYMBOL);
        state
    }

    #[test]
    fn test_accounts_changed_adopts_first() {
        let state = SessionState::new(DEFAULT_NETWORK_KEY);
        let event = WalletEvent::AccountsChanged(vec![
            ACCOUNT.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
        ]);

        let (next, transition) = apply_event(&state, &event, &registry());

        let expected: Address = ACCOUNT.parse().unwrap();
        assert_eq!(transition, Transition::AccountAdopted(expected));
        assert_eq!(next.wallet_address, Some(expected));
        assert!(matches!(next.status, ConnectionStatus::Connected { .. }));
    }

    #[test]
    fn test_invalid_account_leaves_state() {
        let state = connected_state();
        let event = WalletEvent::AccountsChanged(vec!["not-an-address".to_string()]);

        let (next, transition) = apply_event(&state, &event, &registry());

        assert_eq!(transition, Transition::InvalidAccount("not-an-address".to_string()));
        assert_eq!(next, state);
    }

    #[test]
    fn test_chain_changed_to_known_network() {
        let state = connected_state();
        let event = WalletEvent::ChainChanged("0x366".to_string());

        let (next, transition) = apply_event(&state, &event, &registry());

        assert_eq!(
            transition,
            Transition::NetworkChanged {
                key: AI3_KEY.to_string()
            }
        );
        assert_eq!(next.current_network_key, AI3_KEY);
        assert_eq!(
            next.status,
            ConnectionStatus::Connected {
                network: AI3_KEY.to_string()
            }
        );
    }

    #[test]
    fn test_chain_changed_to_unknown_network() {
        let state = connected_state();

        for chain_id in ["0x1", "banana", ""] {
            let event = WalletEvent::ChainChanged(chain_id.to_string());
            let (next, transition) = apply_event(&state, &event, &registry());

            assert_eq!(transition, Transition::UnrecognizedChain(chain_id.to_string()));
            assert_eq!(next, state);
        }
    }

    fn balance_strategy() -> impl Strategy<Value = BalanceDisplay> {
        prop_oneof![
            Just(BalanceDisplay::Loading),
            Just(BalanceDisplay::NotConfigured),
            "[0-9]{1,6}\\.[0-9]{1,4}".prop_map(|value| BalanceDisplay::amount(value, "ETH")),
        ]
    }

    proptest! {
        #[test]
        fn prop_empty_accounts_always_disconnects(
            native in balance_strategy(),
            token in balance_strategy(),
            network in prop::sample::select(vec![BASE_SEPOLIA_KEY, AI3_KEY, HARDHAT_KEY]),
        ) {
            let mut state = SessionState::new(network);
            state.connect(ACCOUNT.parse().unwrap());
            state.native_balance = native;
            state.token_balance = token;

            let (next, transition) =
                apply_event(&state, &WalletEvent::AccountsChanged(vec![]), &registry());

            prop_assert_eq!(transition, Transition::Disconnected);
            prop_assert!(next.wallet_address.is_none());
            prop_assert_eq!(next.native_balance, BalanceDisplay::Disconnected);
            prop_assert_eq!(next.token_balance, BalanceDisplay::Disconnected);
            prop_assert_eq!(next.status, ConnectionStatus::Disconnected);
            prop_assert_eq!(next.current_network_key, network);
        }
    }
}
