//! Hardhat dev-node client
//!
//! Time travel and mining go through raw JSON-RPC (`evm_increaseTime`,
//! `evm_mine`); the gas faucet signs with the deployer key through an ethers
//! `SignerMiddleware`.

use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::TransactionRequest,
};
use reqwest::Client;
use serde_json::{json, Value};

use crate::domain::repositories::ChainControl;
use crate::shared::constants::*;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, BlockInfo, TransactionHash, WalletResult, U256};
use crate::shared::utils::parse_quantity;

/// Read `number` and `timestamp` from an `eth_getBlockByNumber` result
pub fn parse_block(block: &Value) -> WalletResult<BlockInfo> {
    let field = |name: &str| {
        block
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| WalletError::chain_control(format!("Block is missing '{}'", name)))
            .and_then(parse_quantity)
    };

    Ok(BlockInfo {
        number: field("number")?,
        timestamp: field("timestamp")?,
    })
}

pub struct DevNodeClient {
    client: Client,
    rpc_url: String,
    provider: Provider<Http>,
    faucet: Option<LocalWallet>,
}

impl DevNodeClient {
    pub fn new(rpc_url: &str) -> WalletResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| WalletError::config(format!("Invalid dev node URL {}: {}", rpc_url, e)))?;

        Ok(Self {
            client: Client::new(),
            rpc_url: rpc_url.to_string(),
            provider,
            faucet: None,
        })
    }

    /// Enable the faucet, signing with `private_key` on the Hardhat chain
    pub fn with_faucet_key(mut self, private_key: &str) -> WalletResult<Self> {
        let wallet = private_key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| WalletError::config(format!("Invalid faucet private key: {}", e)))?
            .with_chain_id(HARDHAT_CHAIN_ID);
        self.faucet = Some(wallet);
        Ok(self)
    }

    pub fn faucet_address(&self) -> Option<Address> {
        self.faucet.as_ref().map(|wallet| wallet.address())
    }

    async fn rpc(&self, method: &str, params: Value) -> WalletResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let resp = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::chain_control(format!("{} request failed: {}", method, e)))?;
        let resp_json: Value = resp
            .json()
            .await
            .map_err(|e| WalletError::chain_control(format!("Invalid {} response: {}", method, e)))?;

        if let Some(error) = resp_json.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(WalletError::chain_control(format!("{} failed: {}", method, message)));
        }

        Ok(resp_json.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ChainControl for DevNodeClient {
    async fn increase_time(&self, seconds: u64) -> Result<(), WalletError> {
        self.rpc(INCREASE_TIME_METHOD, json!([seconds])).await?;
        Ok(())
    }

    async fn mine_block(&self) -> Result<(), WalletError> {
        self.rpc(MINE_BLOCK_METHOD, json!([])).await?;
        Ok(())
    }

    async fn latest_block(&self) -> Result<BlockInfo, WalletError> {
        let block = self.rpc(GET_BLOCK_METHOD, json!(["latest", false])).await?;
        parse_block(&block)
    }

    async fn fund(&self, to: Address, amount: U256) -> Result<TransactionHash, WalletError> {
        let wallet = self
            .faucet
            .clone()
            .ok_or_else(|| WalletError::config("Faucet private key not configured"))?;
        let client = SignerMiddleware::new(self.provider.clone(), wallet);

        let request = TransactionRequest::new().to(to).value(amount);
        let pending = client
            .send_transaction(request, None)
            .await
            .map_err(|e| WalletError::chain_control(format!("Faucet transaction failed: {}", e)))?;
        let tx_hash = pending.tx_hash();

        let receipt = pending
            .await
            .map_err(|e| WalletError::chain_control(format!("Faucet receipt failed: {}", e)))?;
        match receipt {
            Some(receipt) if receipt.status.map(|s| s.as_u64()) == Some(0) => {
                Err(WalletError::transaction_failed("faucet transaction reverted"))
            }
            Some(receipt) => Ok(receipt.transaction_hash),
            None => Err(WalletError::chain_control(format!(
                "Faucet transaction {:?} was dropped",
                tx_hash
            ))),
        }
    }
}
