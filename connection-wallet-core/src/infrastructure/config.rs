//! Session configuration
//!
//! Resolved from `.env` / the process environment plus a JSON deployment
//! file written by the contract deploy step:
//!
//! ```json
//! { "hardhat": { "registryAddress": "0x...", "tokenAddress": "0x..." } }
//! ```

use dotenv::dotenv;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::registry::NetworkRegistry;
use crate::domain::entities::ContractAddresses;
use crate::shared::constants::*;
use crate::shared::error::WalletError;
use crate::shared::types::{NetworkKey, WalletResult, U256};
use crate::shared::utils::parse_address;

pub const DEPLOYMENTS_FILE_VAR: &str = "CONNECTION_DEPLOYMENTS_FILE";
pub const NETWORK_KEY_VAR: &str = "CONNECTION_NETWORK_KEY";
pub const REGISTRY_ADDRESS_VAR: &str = "CONNECTION_REGISTRY_ADDRESS";
pub const TOKEN_ADDRESS_VAR: &str = "CONNECTION_TOKEN_ADDRESS";
pub const DEV_NODE_URL_VAR: &str = "CONNECTION_DEV_NODE_URL";
pub const FAUCET_PRIVATE_KEY_VAR: &str = "CONNECTION_FAUCET_PRIVATE_KEY";
pub const REGISTRATION_FEE_VAR: &str = "CONNECTION_REGISTRATION_FEE";
pub const LOG_LEVEL_VAR: &str = "CONNECTION_LOG_LEVEL";

/// Per-network RPC override variables
pub const RPC_URL_VARS: &[(&str, &str)] = &[
    (BASE_SEPOLIA_KEY, "CONNECTION_RPC_BASE_SEPOLIA"),
    (AI3_KEY, "CONNECTION_RPC_AI3"),
    (HARDHAT_KEY, "CONNECTION_RPC_HARDHAT"),
];

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    pub default_network: NetworkKey,
    pub deployments_file: PathBuf,
    pub deployments: HashMap<NetworkKey, ContractAddresses>,
    pub rpc_overrides: BTreeMap<NetworkKey, String>,
    pub dev_node_url: Option<String>,
    #[serde(skip)]
    pub faucet_private_key: Option<String>,
    pub registration_fee: String,
    pub log_level: String,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("default_network", &self.default_network)
            .field("deployments_file", &self.deployments_file)
            .field("deployments", &self.deployments)
            .field("rpc_overrides", &self.rpc_overrides)
            .field("dev_node_url", &self.dev_node_url)
            .field(
                "faucet_private_key",
                &self.faucet_private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("registration_fee", &self.registration_fee)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl WalletConfig {
    /// Load `.env` if present, then resolve from the process environment
    pub fn load() -> WalletResult<Self> {
        dotenv().ok();
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary variable source
    pub fn from_source<F>(lookup: F) -> WalletResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let default_network = var(NETWORK_KEY_VAR).unwrap_or_else(|| DEFAULT_NETWORK_KEY.to_string());
        let deployments_file = PathBuf::from(
            var(DEPLOYMENTS_FILE_VAR).unwrap_or_else(|| DEFAULT_DEPLOYMENTS_FILE.to_string()),
        );

        let mut deployments = Self::load_deployments(&deployments_file)?;

        if let Some(registry) = var(REGISTRY_ADDRESS_VAR) {
            deployments
                .entry(default_network.clone())
                .or_default()
                .registry_address = Some(parse_address(&registry)?);
        }
        if let Some(token) = var(TOKEN_ADDRESS_VAR) {
            deployments
                .entry(default_network.clone())
                .or_default()
                .token_address = Some(parse_address(&token)?);
        }

        let rpc_overrides = RPC_URL_VARS
            .iter()
            .filter_map(|(key, name)| var(name).map(|url| (key.to_string(), url)))
            .collect();

        let config = Self {
            default_network,
            deployments_file,
            deployments,
            rpc_overrides,
            dev_node_url: var(DEV_NODE_URL_VAR),
            faucet_private_key: var(FAUCET_PRIVATE_KEY_VAR).filter(|key| key != FAUCET_KEY_PLACEHOLDER),
            registration_fee: var(REGISTRATION_FEE_VAR)
                .unwrap_or_else(|| DEFAULT_REGISTRATION_FEE.to_string()),
            log_level: var(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Read the deployment file; a missing file means nothing is deployed yet
    pub fn load_deployments(path: &Path) -> WalletResult<HashMap<NetworkKey, ContractAddresses>> {
        if !path.exists() {
            log::warn!("Deployment file {} not found, no contract addresses configured", path.display());
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| WalletError::config(format!("Failed to read {}: {}", path.display(), e)))?;
        let deployments: HashMap<NetworkKey, ContractAddresses> = serde_json::from_str(&content)
            .map_err(|e| WalletError::config(format!("Failed to parse {}: {}", path.display(), e)))?;

        log::info!(
            "Loaded contract addresses for {} network(s) from {}",
            deployments.len(),
            path.display()
        );
        Ok(deployments)
    }

    pub fn validate(&self) -> WalletResult<()> {
        let mut errors = Vec::new();

        let registry = NetworkRegistry::builtin(DEFAULT_NETWORK_KEY)?;
        if !registry.contains(&self.default_network) {
            errors.push(format!("Unknown default network '{}'", self.default_network));
        }
        for key in self.deployments.keys() {
            if !registry.contains(key) {
                errors.push(format!("Deployment entry for unknown network '{}'", key));
            }
        }
        if let Err(e) = self.registration_fee_wei() {
            errors.push(format!("Invalid registration fee '{}': {}", self.registration_fee, e));
        }
        if let Some(key) = &self.faucet_private_key {
            let digits = key.strip_prefix("0x").unwrap_or(key);
            match hex::decode(digits) {
                Ok(bytes) if bytes.len() == 32 => {}
                _ => errors.push("Faucet private key must be 32 bytes of hex".to_string()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(WalletError::config(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    /// Built-in networks with RPC overrides applied
    pub fn build_registry(&self) -> WalletResult<NetworkRegistry> {
        let mut registry = NetworkRegistry::builtin(&self.default_network)?;
        for (key, url) in &self.rpc_overrides {
            registry.override_rpc_url(key, url)?;
        }
        Ok(registry)
    }

    pub fn registration_fee_wei(&self) -> WalletResult<U256> {
        Ok(ethers::utils::parse_ether(&self.registration_fee)?)
    }

    /// Dev node to control: the configured URL, or the Hardhat RPC when
    /// Hardhat is the default network
    pub fn dev_node_url(&self) -> Option<String> {
        if let Some(url) = &self.dev_node_url {
            return Some(url.clone());
        }
        if self.default_network == HARDHAT_KEY {
            return Some(
                self.rpc_overrides
                    .get(HARDHAT_KEY)
                    .cloned()
                    .unwrap_or_else(|| HARDHAT_RPC_URL.to_string()),
            );
        }
        None
    }
}
