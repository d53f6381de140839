//! Native and token balance queries

use std::sync::Arc;

use super::WalletSession;
use crate::domain::entities::{BalanceDisplay, SessionState};
use crate::domain::repositories::WalletProvider;
use crate::shared::constants::{TOKEN_DECIMALS, TOKEN_SYMBOL};
use crate::shared::error::{BalanceFailure, WalletError};
use crate::shared::types::{Address, WalletResult, U256};
use crate::shared::utils::{checksum_address, format_units_trimmed, parse_address};

fn amount_display(amount: U256, decimals: u8, symbol: &str) -> BalanceDisplay {
    match format_units_trimmed(amount, decimals) {
        Ok(value) => BalanceDisplay::amount(value, symbol),
        Err(_) => BalanceDisplay::unavailable(BalanceFailure::Decode),
    }
}

impl WalletSession {
    /// Refresh both balance displays for `address` on the current network.
    ///
    /// Does nothing for an empty address or without a provider. A failed
    /// token query only affects the token display; a failed native query
    /// marks both unavailable and is returned.
    pub async fn fetch_balances(&self, address: &str) -> WalletResult<()> {
        if address.trim().is_empty() {
            return Ok(());
        }
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => return Ok(()),
        };

        let owner = match parse_address(address) {
            Ok(owner) => owner,
            Err(e) => {
                self.log.error(format!("Failed to fetch balances: {}", e));
                return Err(e);
            }
        };

        let key = self.state.borrow().current_network_key.clone();
        let network = self
            .registry
            .lookup(&key)
            .cloned()
            .ok_or_else(|| WalletError::unknown_network(key.clone()))?;

        self.update_balances(owner, |state| {
            state.native_balance = BalanceDisplay::Loading;
            state.token_balance = BalanceDisplay::Loading;
        });

        let native = match provider.get_balance(owner).await {
            Ok(native) => native,
            Err(e) => {
                let reason = e.balance_failure();
                self.update_balances(owner, |state| {
                    state.native_balance = BalanceDisplay::unavailable(reason);
                    state.token_balance = BalanceDisplay::unavailable(reason);
                });
                self.log.error(format!("Failed to fetch balances: {}", e.human_reason()));
                return Err(WalletError::balance_query_failed(reason, e.message));
            }
        };
        let native_display = amount_display(
            native,
            network.native_currency.decimals,
            &network.native_currency.symbol,
        );

        let token_address = self
            .contract_addresses(&key)
            .and_then(|addresses| addresses.token_address);

        let token_display = match token_address {
            None => BalanceDisplay::NotConfigured,
            Some(token) => match self.query_token_balance(provider.as_ref(), token, owner).await {
                Ok(balance) => amount_display(balance, TOKEN_DECIMALS, TOKEN_SYMBOL),
                Err(e) => {
                    let reason = match &e {
                        WalletError::BalanceQueryFailed { reason, .. } => *reason,
                        _ => BalanceFailure::Unknown,
                    };
                    self.log.error(format!("{} balance unavailable: {}", TOKEN_SYMBOL, e));
                    BalanceDisplay::unavailable(reason)
                }
            },
        };

        self.update_balances(owner, |state| {
            state.native_balance = native_display;
            state.token_balance = token_display;
        });

        Ok(())
    }

    async fn query_token_balance(
        &self,
        provider: &dyn WalletProvider,
        token: Address,
        owner: Address,
    ) -> WalletResult<U256> {
        let data = self.contracts.encode_balance_of(owner)?;
        let output = provider
            .call(token, data)
            .await
            .map_err(|e| WalletError::balance_query_failed(e.balance_failure(), e.human_reason()))?;

        self.contracts
            .decode_balance_of(&output)
            .map_err(|e| WalletError::balance_query_failed(BalanceFailure::Decode, e.to_string()))
    }

    /// Re-read balances for the connected wallet, if any. Failures are
    /// already in the log.
    pub(crate) async fn refresh_balances(&self) {
        let address = self.state.borrow().wallet_address;
        if let Some(address) = address {
            if let Err(e) = self.fetch_balances(&checksum_address(&address)).await {
                log::debug!("Balance refresh failed: {}", e);
            }
        }
    }

    /// Apply a balance update only while `owner` is still the connected
    /// wallet, so a late result never overwrites a disconnected state.
    fn update_balances(&self, owner: Address, update: impl FnOnce(&mut SessionState)) {
        self.state.send_if_modified(|state| {
            if state.wallet_address != Some(owner) {
                return false;
            }
            update(state);
            true
        });
    }
}
