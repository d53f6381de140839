//! Network registry
//!
//! Static mapping from network key to [`NetworkDescriptor`]. Chain ids are
//! unique across the registry so a chain id reported by a wallet resolves to
//! at most one key.

use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashSet};

use crate::domain::entities::{NativeCurrency, NetworkDescriptor};
use crate::shared::constants::*;
use crate::shared::error::WalletError;
use crate::shared::types::{ChainId, WalletResult};
use crate::shared::utils::parse_chain_id_hex;

lazy_static! {
    /// Networks the deploy step targets
    pub static ref BUILTIN_NETWORKS: Vec<NetworkDescriptor> = vec![
        NetworkDescriptor {
            key: BASE_SEPOLIA_KEY.to_string(),
            display_name: "Base Sepolia".to_string(),
            chain_id: BASE_SEPOLIA_CHAIN_ID,
            rpc_url: BASE_SEPOLIA_RPC_URL.to_string(),
            native_currency: NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            block_explorer_url: Some(BASE_SEPOLIA_EXPLORER_URL.to_string()),
        },
        NetworkDescriptor {
            key: AI3_KEY.to_string(),
            display_name: "Autonomys Auto EVM".to_string(),
            chain_id: AI3_CHAIN_ID,
            rpc_url: AI3_RPC_URL.to_string(),
            native_currency: NativeCurrency {
                name: "AI3".to_string(),
                symbol: "AI3".to_string(),
                decimals: 18,
            },
            block_explorer_url: Some(AI3_EXPLORER_URL.to_string()),
        },
        NetworkDescriptor {
            key: HARDHAT_KEY.to_string(),
            display_name: "Hardhat Localhost".to_string(),
            chain_id: HARDHAT_CHAIN_ID,
            rpc_url: HARDHAT_RPC_URL.to_string(),
            native_currency: NativeCurrency {
                name: "AI3/ETH".to_string(),
                symbol: "AI3".to_string(),
                decimals: 18,
            },
            block_explorer_url: None,
        },
    ];
}

#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: BTreeMap<String, NetworkDescriptor>,
    default_key: String,
}

impl NetworkRegistry {
    /// Build a registry, rejecting duplicate keys or chain ids and an unknown
    /// default key
    pub fn new(descriptors: Vec<NetworkDescriptor>, default_key: &str) -> WalletResult<Self> {
        let mut networks = BTreeMap::new();
        let mut chain_ids = HashSet::new();

        for descriptor in descriptors {
            if !chain_ids.insert(descriptor.chain_id) {
                return Err(WalletError::config(format!(
                    "Duplicate chain id {} for network {}",
                    descriptor.chain_id, descriptor.key
                )));
            }
            if networks.contains_key(&descriptor.key) {
                return Err(WalletError::config(format!("Duplicate network key {}", descriptor.key)));
            }
            networks.insert(descriptor.key.clone(), descriptor);
        }

        if !networks.contains_key(default_key) {
            return Err(WalletError::unknown_network(default_key));
        }

        Ok(Self {
            networks,
            default_key: default_key.to_string(),
        })
    }

    /// Registry of the built-in networks with the given default
    pub fn builtin(default_key: &str) -> WalletResult<Self> {
        Self::new(BUILTIN_NETWORKS.clone(), default_key)
    }

    pub fn lookup(&self, key: &str) -> Option<&NetworkDescriptor> {
        self.networks.get(key)
    }

    pub fn by_chain_id(&self, chain_id: ChainId) -> Option<&NetworkDescriptor> {
        self.networks.values().find(|network| network.chain_id == chain_id)
    }

    /// Resolve a wallet-reported `0x...` chain id
    pub fn by_hex_chain_id(&self, chain_id_hex: &str) -> Option<&NetworkDescriptor> {
        parse_chain_id_hex(chain_id_hex)
            .ok()
            .and_then(|chain_id| self.by_chain_id(chain_id))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.values()
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn contains(&self, key: &str) -> bool {
        self.networks.contains_key(key)
    }

    /// Replace the RPC URL of one network
    pub fn override_rpc_url(&mut self, key: &str, rpc_url: &str) -> WalletResult<()> {
        let network = self
            .networks
            .get_mut(key)
            .ok_or_else(|| WalletError::unknown_network(key))?;
        network.rpc_url = rpc_url.to_string();
        Ok(())
    }
}
