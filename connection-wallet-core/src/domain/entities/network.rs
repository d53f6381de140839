//! Network entity for the wallet core

use serde::{Deserialize, Serialize};

use crate::shared::types::{Address, ChainId};
use crate::shared::utils::chain_id_to_hex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Connection metadata for one EVM network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub key: String,
    pub display_name: String,
    pub chain_id: ChainId,
    pub rpc_url: String,
    pub native_currency: NativeCurrency,
    pub block_explorer_url: Option<String>,
}

impl NetworkDescriptor {
    pub fn chain_id_hex(&self) -> String {
        chain_id_to_hex(self.chain_id)
    }

    /// Payload for `wallet_addEthereumChain` (EIP-3085)
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.display_name.clone(),
            rpc_urls: vec![self.rpc_url.clone()],
            native_currency: self.native_currency.clone(),
            block_explorer_urls: self.block_explorer_url.clone().map(|url| vec![url]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_explorer_urls: Option<Vec<String>>,
}

/// Contract addresses written by the deploy step for one network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    #[serde(default)]
    pub registry_address: Option<Address>,
    #[serde(default)]
    pub token_address: Option<Address>,
}
