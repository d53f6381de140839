//! Hardhat dev-node helpers: time travel, mining and the gas faucet

use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::WalletSession;
use crate::domain::repositories::ChainControl;
use crate::shared::constants::FAUCET_AMOUNT;
use crate::shared::error::WalletError;
use crate::shared::types::{BlockInfo, WalletResult};
use crate::shared::utils::short_address;

/// Clears the faucet in-flight flag on every exit path
struct FaucetGuard<'a>(&'a WalletSession);

impl Drop for FaucetGuard<'_> {
    fn drop(&mut self) {
        self.0.fauceting.store(false, Ordering::SeqCst);
    }
}

impl WalletSession {
    fn chain_control(&self) -> WalletResult<Arc<dyn ChainControl>> {
        self.chain_control
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| WalletError::chain_control("Dev node not configured"))
    }

    /// Advance the dev chain by `seconds` and mine `blocks` blocks.
    ///
    /// Failures are logged and returned; callers decide whether they are
    /// fatal.
    pub async fn mine_time_and_blocks(&self, seconds: u64, blocks: u64) -> WalletResult<()> {
        let chain = self.chain_control()?;

        self.mining.send_replace(true);
        self.log.info(format!(
            "Dev node: advancing {} s and mining {} block(s)...",
            seconds, blocks
        ));

        let result = async {
            if seconds > 0 {
                chain.increase_time(seconds).await?;
            }
            for _ in 0..blocks {
                chain.mine_block().await?;
            }
            Ok::<(), WalletError>(())
        }
        .await;

        self.mining.send_replace(false);

        match result {
            Ok(()) => {
                self.block_info().await;
                self.log.success("Dev node operation succeeded.");
                Ok(())
            }
            Err(e) => {
                self.log.error(format!("Dev node operation failed: {}", e));
                Err(e)
            }
        }
    }

    /// Advance `count` seconds and mine `count` blocks, then refresh balances
    pub async fn mine_blocks(&self, count: u64) -> WalletResult<()> {
        if !self.state.borrow().is_connected() {
            self.log.error("Connect a wallet first.");
            return Err(WalletError::NotConnected);
        }

        self.mine_time_and_blocks(count, count).await?;
        self.refresh_balances().await;
        Ok(())
    }

    /// Send native gas from the deployer key to the connected wallet
    pub async fn faucet_gas(&self) -> WalletResult<()> {
        let owner = self.state.borrow().wallet_address;
        let owner = match owner {
            Some(owner) => owner,
            None => {
                self.log.error("Connect a wallet and configure the deployer key first.");
                return Err(WalletError::NotConnected);
            }
        };
        let chain = match self.chain_control() {
            Ok(chain) => chain,
            Err(e) => {
                self.log.error("Connect a wallet and configure the deployer key first.");
                return Err(e);
            }
        };

        if self
            .fauceting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(WalletError::FaucetBusy);
        }
        let _guard = FaucetGuard(self);

        self.log.info(format!(
            "Sending {} native gas to {}...",
            FAUCET_AMOUNT,
            short_address(&owner)
        ));

        let amount = ethers::utils::parse_ether(FAUCET_AMOUNT)?;
        let tx_hash = match chain.fund(owner, amount).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                self.log.error(format!("Faucet failed: {}", e));
                return Err(e);
            }
        };
        self.log.tx(format!("Faucet transaction {:?} confirmed.", tx_hash));

        if let Err(e) = self.mine_time_and_blocks(1, 1).await {
            log::warn!("Continuing without dev chain advance: {}", e);
        }
        self.refresh_balances().await;
        self.log.success("Gas faucet succeeded!");

        Ok(())
    }

    /// Log the latest dev-node block; `None` (and an error entry) when the
    /// node cannot be reached
    pub async fn block_info(&self) -> Option<BlockInfo> {
        let chain = match self.chain_control() {
            Ok(chain) => chain,
            Err(e) => {
                self.log.error(format!("Cannot read block info: {}", e));
                return None;
            }
        };

        match chain.latest_block().await {
            Ok(block) => {
                let time = i64::try_from(block.timestamp)
                    .ok()
                    .and_then(|seconds| chrono::DateTime::<chrono::Utc>::from_timestamp(seconds, 0))
                    .map(|time| time.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| block.timestamp.to_string());
                self.log.block(format!("Current block #{}, time: {}", block.number, time));
                Some(block)
            }
            Err(e) => {
                self.log.error(format!(
                    "Cannot read block info. Is the Hardhat node running? {}",
                    e
                ));
                None
            }
        }
    }
}
