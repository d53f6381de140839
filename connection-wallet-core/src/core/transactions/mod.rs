//! Contract call encoding
//!
//! This module builds the calldata for the two contracts the session talks to
//! (the ERC-20 style token and the user registry) and decodes their results.

use ethers::abi::parse_abi;
use ethers::contract::BaseContract;

use crate::shared::constants::{REGISTRY_ABI, TOKEN_ABI};
use crate::shared::error::WalletError;
use crate::shared::types::{Address, Bytes, ChainId, Transaction, WalletResult, U256};

const BALANCE_OF: &str = "balanceOf";
const REGISTER_USERNAME: &str = "registerUsername";

/// Encoder/decoder for the token and registry contracts
#[derive(Debug, Clone)]
pub struct ContractCalls {
    token: BaseContract,
    registry: BaseContract,
}

impl ContractCalls {
    pub fn new() -> WalletResult<Self> {
        let token = parse_abi(TOKEN_ABI)
            .map_err(|e| WalletError::internal(format!("Invalid token ABI: {}", e)))?;
        let registry = parse_abi(REGISTRY_ABI)
            .map_err(|e| WalletError::internal(format!("Invalid registry ABI: {}", e)))?;

        Ok(Self {
            token: BaseContract::from(token),
            registry: BaseContract::from(registry),
        })
    }

    /// Calldata for `balanceOf(owner)`
    pub fn encode_balance_of(&self, owner: Address) -> WalletResult<Bytes> {
        Ok(self.token.encode(BALANCE_OF, owner)?)
    }

    /// Decode the `uint256` returned by `balanceOf`
    pub fn decode_balance_of(&self, output: &Bytes) -> WalletResult<U256> {
        self.token
            .decode_output::<U256, _>(BALANCE_OF, output)
            .map_err(|e| WalletError::validation(format!("Could not decode balanceOf result: {}", e)))
    }

    /// `registerUsername(name)` paying `fee` to the registry
    pub fn registration(
        &self,
        from: Address,
        registry: Address,
        name: &str,
        fee: U256,
        chain_id: ChainId,
    ) -> WalletResult<Transaction> {
        let data = self.registry.encode(REGISTER_USERNAME, name.to_string())?;

        Ok(Transaction {
            from,
            to: registry,
            value: fee,
            data,
            chain_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};

    fn owner() -> Address {
        "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6".parse().unwrap()
    }

    #[test]
    fn test_balance_of_selector() {
        let calls = ContractCalls::new().unwrap();
        let data = calls.encode_balance_of(owner()).unwrap();

        // keccak("balanceOf(address)")[..4]
        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[16..], owner().as_bytes());
    }

    #[test]
    fn test_decode_balance_of() {
        let calls = ContractCalls::new().unwrap();
        let output = Bytes::from(encode(&[Token::Uint(U256::from(1_500u64))]));

        assert_eq!(calls.decode_balance_of(&output).unwrap(), U256::from(1_500u64));
    }

    #[test]
    fn test_decode_empty_output_fails() {
        let calls = ContractCalls::new().unwrap();
        let result = calls.decode_balance_of(&Bytes::default());

        assert!(matches!(result, Err(WalletError::Validation(_))));
    }

    #[test]
    fn test_registration_transaction() {
        let calls = ContractCalls::new().unwrap();
        let registry: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap();
        let fee = U256::exp10(16);

        let tx = calls.registration(owner(), registry, "alice", fee, 31337).unwrap();

        assert_eq!(tx.from, owner());
        assert_eq!(tx.to, registry);
        assert_eq!(tx.value, fee);
        assert_eq!(tx.chain_id, 31337);
        // selector + offset + length + one padded word
        assert_eq!(tx.data.len(), 4 + 32 * 3);
    }
}
