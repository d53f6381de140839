//! JSON-RPC wallet provider
//!
//! [`JsonRpcWalletProvider`] speaks EIP-1193 style JSON-RPC to a node whose
//! accounts are managed by the node itself (Hardhat, a local signer proxy).
//! Account and chain changes are picked up by polling; see
//! [`spawn_event_poller`].

use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, PendingTransaction, Provider, RpcError},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest},
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::wallet::WalletEvent;
use crate::domain::entities::AddChainParams;
use crate::domain::repositories::WalletProvider;
use crate::shared::constants::*;
use crate::shared::error::{ProviderError, WalletError};
use crate::shared::types::{
    Address, Bytes, Transaction, TransactionHash, TransactionReceipt, WalletResult, U256,
};
use crate::shared::utils::{chain_id_to_hex, checksum_address, extract_revert_reason};

/// Map an ethers provider failure onto the EIP-1193 error shape
pub(crate) fn provider_error(err: ethers::providers::ProviderError) -> ProviderError {
    match err.as_error_response() {
        Some(response) => {
            let error = ProviderError::new(response.code, response.message.clone());
            let reason = extract_revert_reason(&response.message).or_else(|| {
                response
                    .message
                    .strip_prefix("execution reverted: ")
                    .map(str::to_string)
            });
            match reason {
                Some(reason) => error.with_reason(reason),
                None => error,
            }
        }
        None => ProviderError::internal(err.to_string()),
    }
}

pub struct JsonRpcWalletProvider {
    provider: Provider<Http>,
}

impl JsonRpcWalletProvider {
    pub fn new(rpc_url: &str) -> WalletResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| WalletError::config(format!("Invalid RPC URL {}: {}", rpc_url, e)))?
            .interval(Duration::from_millis(EVENT_POLL_INTERVAL_MS));

        Ok(Self { provider })
    }

    /// Accounts exposed without prompting
    pub async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        let accounts = self.provider.get_accounts().await.map_err(provider_error)?;
        Ok(accounts.iter().map(checksum_address).collect())
    }

    /// Currently selected chain as `0x...`
    pub async fn chain_id_hex(&self) -> Result<String, ProviderError> {
        let chain_id = self.provider.get_chainid().await.map_err(provider_error)?;
        Ok(chain_id_to_hex(chain_id.as_u64()))
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        match self
            .provider
            .request::<_, Vec<String>>(REQUEST_ACCOUNTS_METHOD, ())
            .await
            .map_err(provider_error)
        {
            Ok(accounts) => Ok(accounts),
            Err(e) if e.code == METHOD_NOT_FOUND_CODE || e.code == METHOD_NOT_SUPPORTED_CODE => {
                log::debug!("{} not supported, falling back to {}", REQUEST_ACCOUNTS_METHOD, ACCOUNTS_METHOD);
                self.accounts().await
            }
            Err(e) => Err(e),
        }
    }

    async fn switch_chain(&self, chain_id_hex: String) -> Result<(), ProviderError> {
        // A plain node cannot switch; accept a request for the chain it serves
        match self
            .provider
            .request::<_, serde_json::Value>(SWITCH_CHAIN_METHOD, [json!({ "chainId": chain_id_hex })])
            .await
            .map_err(provider_error)
        {
            Ok(_) => Ok(()),
            Err(e) if e.code == METHOD_NOT_FOUND_CODE || e.code == METHOD_NOT_SUPPORTED_CODE => {
                let served = self.chain_id_hex().await?;
                if served.eq_ignore_ascii_case(&chain_id_hex) {
                    Ok(())
                } else {
                    Err(ProviderError::unrecognized_chain(&chain_id_hex))
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn add_chain(&self, params: AddChainParams) -> Result<(), ProviderError> {
        self.provider
            .request::<_, serde_json::Value>(ADD_CHAIN_METHOD, [params])
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn get_balance(&self, address: Address) -> Result<U256, ProviderError> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(provider_error)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        self.provider.call(&tx, None).await.map_err(provider_error)
    }

    async fn send_transaction(&self, transaction: Transaction) -> Result<TransactionHash, ProviderError> {
        let request = TransactionRequest::new()
            .from(transaction.from)
            .to(transaction.to)
            .value(transaction.value)
            .data(transaction.data)
            .chain_id(transaction.chain_id);

        let pending = self
            .provider
            .send_transaction(request, None)
            .await
            .map_err(provider_error)?;
        Ok(pending.tx_hash())
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TransactionHash,
        confirmations: usize,
    ) -> Result<TransactionReceipt, ProviderError> {
        let receipt = PendingTransaction::new(tx_hash, &self.provider)
            .confirmations(confirmations)
            .await
            .map_err(provider_error)?
            .ok_or_else(|| ProviderError::internal(format!("Transaction {:?} was dropped", tx_hash)))?;

        Ok(TransactionReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|number| number.as_u64()),
            status: receipt.status.map(|status| status.as_u64()),
        })
    }
}

/// Remembers the last observed accounts and chain, emitting an event only on
/// change. The first observation is the baseline.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    accounts: Option<Vec<String>>,
    chain_id_hex: Option<String>,
}

impl ChangeTracker {
    pub fn observe_accounts(&mut self, accounts: Vec<String>) -> Option<WalletEvent> {
        let changed = matches!(&self.accounts, Some(previous) if *previous != accounts);
        self.accounts = Some(accounts.clone());
        changed.then(|| WalletEvent::AccountsChanged(accounts))
    }

    pub fn observe_chain(&mut self, chain_id_hex: String) -> Option<WalletEvent> {
        let changed = matches!(&self.chain_id_hex, Some(previous) if *previous != chain_id_hex);
        self.chain_id_hex = Some(chain_id_hex.clone());
        changed.then(|| WalletEvent::ChainChanged(chain_id_hex))
    }
}

/// Poll the node for account/chain changes and feed them into the session's
/// event queue. Stops when the queue is closed.
pub fn spawn_event_poller(
    provider: Arc<JsonRpcWalletProvider>,
    events: mpsc::Sender<WalletEvent>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut tracker = ChangeTracker::default();

        loop {
            ticker.tick().await;

            let mut changes = Vec::new();
            match provider.accounts().await {
                Ok(accounts) => changes.extend(tracker.observe_accounts(accounts)),
                Err(e) => log::warn!("Account poll failed: {}", e),
            }
            match provider.chain_id_hex().await {
                Ok(chain_id_hex) => changes.extend(tracker.observe_chain(chain_id_hex)),
                Err(e) => log::warn!("Chain poll failed: {}", e),
            }

            for event in changes {
                if events.send(event).await.is_err() {
                    log::debug!("Event queue closed, stopping poller");
                    return;
                }
            }
            if events.is_closed() {
                return;
            }
        }
    })
}
