use async_trait::async_trait;
use ethers::{
    contract::Contract,
    providers::{Http, Middleware, Provider},
    types::{Address, H256, U256},
};
use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::{
        chain::{AuctionStateTuple, MinerStateTuple},
        AuctionState, MinerSchedule, MinerSlot, MinerState, TakeoverSlot, TxStatus,
    },
};

use super::contracts::{
    auction_multicall_abi, load_abi, miner_multicall_abi, miner_slot_abi, takeover_abi, Erc20,
    Miner, MinerSlot0, TakeoverSlot0,
};

/// Typed read access to the game contracts.
///
/// Every method is a single logical read; callers fan several of them out
/// concurrently and fail the whole request if any one fails.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Multicall `getMiner(account)`.
    async fn miner_state(&self, account: Address) -> Result<MinerState>;

    /// Miner `startTime()`, `HALVING_PERIOD()` and `donut()`.
    async fn miner_schedule(&self) -> Result<MinerSchedule>;

    /// Miner `getSlot0()` epoch and `getPrice()`.
    async fn miner_slot(&self) -> Result<MinerSlot>;

    async fn token_total_supply(&self, token: Address) -> Result<U256>;

    /// Auction Multicall `getAuction(account)`.
    async fn auction_state(&self, account: Address) -> Result<AuctionState>;

    /// Takeover contract `getPrice()` and `getSlot0()` epoch.
    async fn takeover_slot(&self) -> Result<TakeoverSlot>;

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Receipt status of a transaction, `None` while it is still pending.
    async fn transaction_status(&self, hash: H256) -> Result<Option<TxStatus>>;

    async fn block_number(&self) -> Result<u64>;
}

pub struct EthersChainReader {
    provider: Arc<Provider<Http>>,
    miner_multicall: Contract<Provider<Http>>,
    auction_multicall: Contract<Provider<Http>>,
    miner_slot: Contract<Provider<Http>>,
    takeover: Contract<Provider<Http>>,
    miner: Miner<Provider<Http>>,
}

// Internal helper that wraps provider and contract errors.
fn rpc_error(method: &str, err: impl std::fmt::Display) -> AppError {
    tracing::warn!("{} failed: {}", method, err);
    AppError::BlockchainRPC(format!("{}: {}", method, err))
}

// Internal helper that narrows a uint256 timestamp-like value.
fn u256_to_u64(method: &str, value: U256) -> Result<u64> {
    if value > U256::from(u64::MAX) {
        return Err(AppError::BlockchainRPC(format!(
            "{} returned out-of-range value {}",
            method, value
        )));
    }
    Ok(value.as_u64())
}

impl EthersChainReader {
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.base_provider_url.as_str())
            .map_err(|e| AppError::Config(format!("Invalid BASE_PROVIDER_URL: {}", e)))?;
        let provider = Arc::new(provider);

        Ok(Self {
            miner_multicall: Contract::new(
                config.multicall_address,
                load_abi(miner_multicall_abi())?,
                provider.clone(),
            ),
            auction_multicall: Contract::new(
                config.auction_multicall_address,
                load_abi(auction_multicall_abi())?,
                provider.clone(),
            ),
            miner_slot: Contract::new(
                config.miner_address,
                load_abi(miner_slot_abi())?,
                provider.clone(),
            ),
            takeover: Contract::new(
                config.takeover_contract_address,
                load_abi(takeover_abi())?,
                provider.clone(),
            ),
            miner: Miner::new(config.miner_address, provider.clone()),
            provider,
        })
    }
}

#[async_trait]
impl ChainReader for EthersChainReader {
    async fn miner_state(&self, account: Address) -> Result<MinerState> {
        let raw: MinerStateTuple = self
            .miner_multicall
            .method::<_, MinerStateTuple>("getMiner", account)
            .map_err(|e| rpc_error("getMiner", e))?
            .call()
            .await
            .map_err(|e| rpc_error("getMiner", e))?;
        Ok(MinerState::from(raw))
    }

    async fn miner_schedule(&self) -> Result<MinerSchedule> {
        let start_call = self.miner.start_time();
        let halving_call = self
            .miner
            .method::<_, U256>("HALVING_PERIOD", ())
            .map_err(|e| rpc_error("HALVING_PERIOD", e))?;
        let donut_call = self.miner.donut();

        let (start_time, halving_period, donut_token) = tokio::try_join!(
            async { start_call.call().await.map_err(|e| rpc_error("startTime", e)) },
            async { halving_call.call().await.map_err(|e| rpc_error("HALVING_PERIOD", e)) },
            async { donut_call.call().await.map_err(|e| rpc_error("donut", e)) },
        )?;

        Ok(MinerSchedule {
            start_time: u256_to_u64("startTime", start_time)?,
            halving_period: u256_to_u64("HALVING_PERIOD", halving_period)?,
            donut_token,
        })
    }

    async fn miner_slot(&self) -> Result<MinerSlot> {
        let slot_call = self
            .miner_slot
            .method::<_, MinerSlot0>("getSlot0", ())
            .map_err(|e| rpc_error("getSlot0", e))?;
        let price_call = self.miner.get_price();

        let (slot0, price) = tokio::try_join!(
            async { slot_call.call().await.map_err(|e| rpc_error("getSlot0", e)) },
            async { price_call.call().await.map_err(|e| rpc_error("getPrice", e)) },
        )?;

        Ok(MinerSlot {
            epoch_id: slot0.1,
            price,
        })
    }

    async fn token_total_supply(&self, token: Address) -> Result<U256> {
        Erc20::new(token, self.provider.clone())
            .total_supply()
            .call()
            .await
            .map_err(|e| rpc_error("totalSupply", e))
    }

    async fn auction_state(&self, account: Address) -> Result<AuctionState> {
        let raw: AuctionStateTuple = self
            .auction_multicall
            .method::<_, AuctionStateTuple>("getAuction", account)
            .map_err(|e| rpc_error("getAuction", e))?
            .call()
            .await
            .map_err(|e| rpc_error("getAuction", e))?;
        Ok(AuctionState::from(raw))
    }

    async fn takeover_slot(&self) -> Result<TakeoverSlot> {
        let price_call = self
            .takeover
            .method::<_, U256>("getPrice", ())
            .map_err(|e| rpc_error("getPrice", e))?;
        let slot_call = self
            .takeover
            .method::<_, TakeoverSlot0>("getSlot0", ())
            .map_err(|e| rpc_error("getSlot0", e))?;

        let (price, slot0) = tokio::try_join!(
            async { price_call.call().await.map_err(|e| rpc_error("getPrice", e)) },
            async { slot_call.call().await.map_err(|e| rpc_error("getSlot0", e)) },
        )?;

        Ok(TakeoverSlot {
            epoch_id: slot0.1,
            price,
        })
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        Erc20::new(token, self.provider.clone())
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| rpc_error("allowance", e))
    }

    async fn transaction_status(&self, hash: H256) -> Result<Option<TxStatus>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| rpc_error("eth_getTransactionReceipt", e))?;
        Ok(receipt.map(|r| TxStatus::from_receipt_status(r.status.map(|s| s.as_u64()))))
    }

    async fn block_number(&self) -> Result<u64> {
        let block = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| rpc_error("eth_blockNumber", e))?;
        Ok(block.as_u64())
    }
}
