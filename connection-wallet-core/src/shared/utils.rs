//! Utility functions for the wallet core
//!
//! This module contains common utility functions used throughout the wallet core.

use crate::shared::constants::ADDRESS_LENGTH;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, ChainId, U256};

/// Wire form of a chain id: `0x` + lower-case hex, no padding
pub fn chain_id_to_hex(chain_id: ChainId) -> String {
    format!("0x{:x}", chain_id)
}

/// Parse a `0x`-prefixed chain id as reported by a wallet
pub fn parse_chain_id_hex(value: &str) -> Result<ChainId, WalletError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| WalletError::validation(format!("Chain id must start with 0x: {}", value)))?;

    if digits.is_empty() {
        return Err(WalletError::validation("Chain id has no digits"));
    }

    u64::from_str_radix(digits, 16)
        .map_err(|e| WalletError::validation(format!("Invalid chain id {}: {}", value, e)))
}

/// Check `0x` followed by 40 hex characters
pub fn is_valid_hex_address(address: &str) -> bool {
    if address.len() != ADDRESS_LENGTH || !address.starts_with("0x") {
        return false;
    }

    address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate and parse an Ethereum address
pub fn parse_address(address: &str) -> Result<Address, WalletError> {
    let address = address.trim();
    if !is_valid_hex_address(address) {
        return Err(WalletError::validation(format!(
            "Invalid address '{}'. Expected: 0x followed by 40 hex characters",
            address
        )));
    }

    address
        .parse::<Address>()
        .map_err(|e| WalletError::validation(format!("Invalid address '{}': {}", address, e)))
}

/// Checksummed form of an address
pub fn checksum_address(address: &Address) -> String {
    ethers::utils::to_checksum(address, None)
}

/// First six characters of the checksummed address, for log lines
pub fn short_address(address: &Address) -> String {
    let full = checksum_address(address);
    format!("{}...", &full[..6])
}

/// Format a base-unit amount in whole units with trailing zeros trimmed
pub fn format_units_trimmed(amount: U256, decimals: u8) -> Result<String, WalletError> {
    let formatted = ethers::utils::format_units(amount, u32::from(decimals))?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }

    let trimmed = formatted.trim_end_matches('0');
    if trimmed.ends_with('.') {
        Ok(format!("{}0", trimmed))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a hex JSON-RPC quantity such as `0x1b4`
pub fn parse_quantity(value: &str) -> Result<u64, WalletError> {
    let digits = value.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| WalletError::validation(format!("Invalid quantity {}: {}", value, e)))
}

/// Pull the revert reason out of a node error message, e.g.
/// `reverted with reason string 'Insufficient registration fee'`
pub fn extract_revert_reason(message: &str) -> Option<String> {
    const MARKER: &str = "reason string '";

    let start = message.find(MARKER)? + MARKER.len();
    let rest = &message[start..];
    let end = rest.find('\'')?;
    let reason = &rest[..end];

    if reason.is_empty() {
        None
    } else {
        Some(reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_to_hex() {
        assert_eq!(chain_id_to_hex(870), "0x366");
        assert_eq!(chain_id_to_hex(84532), "0x14a34");
        assert_eq!(chain_id_to_hex(31337), "0x7a69");
        assert_eq!(chain_id_to_hex(1), "0x1");
    }

    #[test]
    fn test_parse_chain_id_hex() {
        assert_eq!(parse_chain_id_hex("0x366").unwrap(), 870);
        assert_eq!(parse_chain_id_hex("0x14A34").unwrap(), 84532);
        assert_eq!(parse_chain_id_hex("0X7a69").unwrap(), 31337);

        assert!(parse_chain_id_hex("366").is_err());
        assert!(parse_chain_id_hex("0x").is_err());
        assert!(parse_chain_id_hex("0xzz").is_err());
    }

    #[test]
    fn test_chain_id_hex_round_trip() {
        for chain_id in [1u64, 870, 31337, 84532, u64::MAX] {
            assert_eq!(parse_chain_id_hex(&chain_id_to_hex(chain_id)).unwrap(), chain_id);
        }
    }

    #[test]
    fn test_validate_address() {
        assert!(is_valid_hex_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6"));
        assert!(!is_valid_hex_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b")); // Too short
        assert!(!is_valid_hex_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8bG")); // Invalid character
        assert!(!is_valid_hex_address("742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6aa")); // No prefix

        assert!(parse_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").is_ok());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_short_address() {
        let address = parse_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").unwrap();
        assert_eq!(short_address(&address), "0x742d...");
    }

    #[test]
    fn test_format_units_trimmed() {
        let one_and_half = ethers::utils::parse_ether("1.5").unwrap();
        assert_eq!(format_units_trimmed(one_and_half, 18).unwrap(), "1.5");
        assert_eq!(format_units_trimmed(U256::zero(), 18).unwrap(), "0.0");
        assert_eq!(format_units_trimmed(U256::exp10(18), 18).unwrap(), "1.0");
        assert_eq!(format_units_trimmed(U256::from(1_234_500u64), 6).unwrap(), "1.2345");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x1b4").unwrap(), 436);
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert!(parse_quantity("0xnope").is_err());
    }

    #[test]
    fn test_extract_revert_reason() {
        let message = "Error: VM Exception while processing transaction: reverted with reason string 'Insufficient registration fee'";
        assert_eq!(
            extract_revert_reason(message).as_deref(),
            Some("Insufficient registration fee")
        );
        assert_eq!(extract_revert_reason("execution reverted"), None);
    }
}
