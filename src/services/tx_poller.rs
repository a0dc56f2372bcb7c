use ethers::types::H256;
use std::time::Duration;
use tokio::time::sleep;

use crate::{config::Config, error::Result, models::TxStatus};

use super::chain_reader::ChainReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    Confirmed,
    Reverted,
    TimedOut,
}

/// Receipt polling with a hard deadline. RPC errors abort the wait.
#[derive(Debug, Clone, Copy)]
pub struct TxPoller {
    timeout: Duration,
    poll_interval: Duration,
}

impl TxPoller {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_secs(config.tx_wait_timeout_secs),
            Duration::from_millis(config.tx_poll_interval_ms),
        )
    }

    pub async fn wait(&self, reader: &dyn ChainReader, hash: H256) -> Result<TxOutcome> {
        match tokio::time::timeout(self.timeout, self.poll_until_mined(reader, hash)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::info!(
                    "tx {:#x} not mined within {}s",
                    hash,
                    self.timeout.as_secs()
                );
                Ok(TxOutcome::TimedOut)
            }
        }
    }

    async fn poll_until_mined(&self, reader: &dyn ChainReader, hash: H256) -> Result<TxOutcome> {
        loop {
            match reader.transaction_status(hash).await? {
                Some(TxStatus::Success) => return Ok(TxOutcome::Confirmed),
                Some(TxStatus::Reverted) => return Ok(TxOutcome::Reverted),
                None => sleep(self.poll_interval).await,
            }
        }
    }
}

pub async fn wait_for_transaction(
    reader: &dyn ChainReader,
    hash: H256,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<TxOutcome> {
    TxPoller::new(timeout, poll_interval).wait(reader, hash).await
}
