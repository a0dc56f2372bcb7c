//! In-memory stand-ins for the chain, Neynar and Redis used by handler tests.

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{
    error::{AppError, Result},
    integrations::FarcasterClient,
    models::{
        AuctionState, MinerSchedule, MinerSlot, MinerState, TakeoverSlot, TxStatus,
        ValidatedFrameAction,
    },
};

use super::{chain_reader::ChainReader, paid_store::PaidStore};

pub fn wei(ether: u64) -> U256 {
    U256::from(ether) * U256::exp10(18)
}

pub struct FakeChainReader {
    pub miner_state: MinerState,
    pub schedule: MinerSchedule,
    pub slot: MinerSlot,
    pub total_supply: U256,
    pub auction: AuctionState,
    pub takeover: TakeoverSlot,
    pub allowance: U256,
    pub block: u64,
    statuses: Mutex<VecDeque<Option<TxStatus>>>,
    status_calls: AtomicUsize,
    failure: Option<String>,
}

impl Default for FakeChainReader {
    fn default() -> Self {
        Self {
            miner_state: MinerState {
                epoch_id: 7,
                init_price: wei(2),
                start_time: 1_000,
                glazed: wei(3),
                price: wei(1),
                dps: wei(4),
                next_dps: wei(2),
                miner: Address::from_low_u64_be(0xbeef),
                uri: String::new(),
                eth_balance: U256::zero(),
                donut_balance: U256::zero(),
            },
            schedule: MinerSchedule {
                start_time: 0,
                halving_period: 86_400,
                donut_token: Address::from_low_u64_be(0xd0),
            },
            slot: MinerSlot {
                epoch_id: 7,
                price: U256::from(1_000_000_000u64),
            },
            total_supply: wei(1_000),
            auction: AuctionState {
                epoch_id: 2,
                init_price: wei(1),
                start_time: 500,
                payment_token: Address::from_low_u64_be(0x1b),
                price: wei(1),
                payment_token_price: wei(2),
                weth_accumulated: wei(5),
                weth_balance: U256::zero(),
                payment_token_balance: U256::zero(),
            },
            takeover: TakeoverSlot {
                epoch_id: 4,
                price: U256::from(2_000_000u64),
            },
            allowance: U256::from(500_000u64),
            block: 1_234,
            statuses: Mutex::new(VecDeque::new()),
            status_calls: AtomicUsize::new(0),
            failure: None,
        }
    }
}

impl FakeChainReader {
    /// Receipt lookups answer these in order, then stay pending.
    pub fn with_statuses(self, statuses: Vec<Option<TxStatus>>) -> Self {
        if let Ok(mut queue) = self.statuses.lock() {
            queue.extend(statuses);
        }
        self
    }

    /// Every read fails with an RPC error carrying `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(AppError::BlockchainRPC(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChainReader for FakeChainReader {
    async fn miner_state(&self, account: Address) -> Result<MinerState> {
        self.check()?;
        let mut state = self.miner_state.clone();
        if account.is_zero() {
            state.eth_balance = U256::zero();
            state.donut_balance = U256::zero();
        }
        Ok(state)
    }

    async fn miner_schedule(&self) -> Result<MinerSchedule> {
        self.check()?;
        Ok(self.schedule.clone())
    }

    async fn miner_slot(&self) -> Result<MinerSlot> {
        self.check()?;
        Ok(self.slot.clone())
    }

    async fn token_total_supply(&self, _token: Address) -> Result<U256> {
        self.check()?;
        Ok(self.total_supply)
    }

    async fn auction_state(&self, _account: Address) -> Result<AuctionState> {
        self.check()?;
        Ok(self.auction.clone())
    }

    async fn takeover_slot(&self) -> Result<TakeoverSlot> {
        self.check()?;
        Ok(self.takeover.clone())
    }

    async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> Result<U256> {
        self.check()?;
        Ok(self.allowance)
    }

    async fn transaction_status(&self, _hash: H256) -> Result<Option<TxStatus>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let next = self
            .statuses
            .lock()
            .map_err(|_| AppError::Internal("status queue poisoned".to_string()))?
            .pop_front();
        Ok(next.flatten())
    }

    async fn block_number(&self) -> Result<u64> {
        self.check()?;
        Ok(self.block)
    }
}

#[derive(Default)]
pub struct FakeFarcaster {
    pub usernames: HashMap<Address, String>,
    pub action: Option<ValidatedFrameAction>,
    pub fail_lookups: bool,
}

impl FakeFarcaster {
    pub fn with_action(fid: u64, transaction_hash: Option<&str>) -> Self {
        Self {
            action: Some(ValidatedFrameAction {
                valid: true,
                fid: Some(fid),
                transaction_hash: transaction_hash.map(str::to_string),
            }),
            ..Self::default()
        }
    }
}

#[async_trait]
impl FarcasterClient for FakeFarcaster {
    async fn username_for_address(&self, address: Address) -> Result<Option<String>> {
        if self.fail_lookups {
            return Err(AppError::ExternalAPI("lookup unavailable".to_string()));
        }
        Ok(self.usernames.get(&address).cloned())
    }

    async fn validate_frame_action(&self, _message_bytes: &str) -> Result<ValidatedFrameAction> {
        self.action
            .clone()
            .ok_or_else(|| AppError::ExternalAPI("validation unavailable".to_string()))
    }
}

#[derive(Default)]
pub struct MemoryPaidStore {
    paid: Mutex<HashSet<u64>>,
}

impl MemoryPaidStore {
    pub fn with_paid(fids: &[u64]) -> Self {
        Self {
            paid: Mutex::new(fids.iter().copied().collect()),
        }
    }

    pub fn contains(&self, fid: u64) -> bool {
        self.paid.lock().map(|set| set.contains(&fid)).unwrap_or(false)
    }
}

#[async_trait]
impl PaidStore for MemoryPaidStore {
    async fn has_paid(&self, fid: u64) -> Result<bool> {
        Ok(self.contains(fid))
    }

    async fn mark_paid(&self, fid: u64) -> Result<()> {
        self.paid
            .lock()
            .map_err(|_| AppError::Internal("paid set poisoned".to_string()))?
            .insert(fid);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
