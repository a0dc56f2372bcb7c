use ethers::types::{Address, U256};

// ==================== MINER ====================
/// Snapshot returned by the Multicall `getMiner(account)` view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerState {
    pub epoch_id: u16,
    pub init_price: U256,
    pub start_time: u64,
    /// Amount the current miner has accrued, computed by the contract.
    pub glazed: U256,
    pub price: U256,
    pub dps: U256,
    pub next_dps: U256,
    pub miner: Address,
    pub uri: String,
    pub eth_balance: U256,
    pub donut_balance: U256,
}

/// Raw tuple layout of `getMiner`.
pub type MinerStateTuple = (
    u16,
    U256,
    u64,
    U256,
    U256,
    U256,
    U256,
    Address,
    String,
    U256,
    U256,
);

impl From<MinerStateTuple> for MinerState {
    fn from(raw: MinerStateTuple) -> Self {
        let (
            epoch_id,
            init_price,
            start_time,
            glazed,
            price,
            dps,
            next_dps,
            miner,
            uri,
            eth_balance,
            donut_balance,
        ) = raw;
        Self {
            epoch_id,
            init_price,
            start_time,
            glazed,
            price,
            dps,
            next_dps,
            miner,
            uri,
            eth_balance,
            donut_balance,
        }
    }
}

/// Halving schedule and reward token of the Miner contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerSchedule {
    pub start_time: u64,
    pub halving_period: u64,
    pub donut_token: Address,
}

/// Current epoch and price of the Miner contract, as needed to build `mine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerSlot {
    pub epoch_id: u16,
    pub price: U256,
}

// ==================== AUCTION ====================
/// Snapshot returned by the auction Multicall `getAuction(account)` view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionState {
    pub epoch_id: u16,
    pub init_price: U256,
    pub start_time: u64,
    pub payment_token: Address,
    pub price: U256,
    pub payment_token_price: U256,
    pub weth_accumulated: U256,
    pub weth_balance: U256,
    pub payment_token_balance: U256,
}

pub type AuctionStateTuple = (u16, U256, u64, Address, U256, U256, U256, U256, U256);

impl From<AuctionStateTuple> for AuctionState {
    fn from(raw: AuctionStateTuple) -> Self {
        let (
            epoch_id,
            init_price,
            start_time,
            payment_token,
            price,
            payment_token_price,
            weth_accumulated,
            weth_balance,
            payment_token_balance,
        ) = raw;
        Self {
            epoch_id,
            init_price,
            start_time,
            payment_token,
            price,
            payment_token_price,
            weth_accumulated,
            weth_balance,
            payment_token_balance,
        }
    }
}

// ==================== TAKEOVER ====================
/// Price and epoch of the USDC-priced takeover contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeoverSlot {
    pub epoch_id: u16,
    pub price: U256,
}

// ==================== RECEIPTS ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Reverted,
}

impl TxStatus {
    /// Receipt `status` field: 1 is success, anything else a revert.
    pub fn from_receipt_status(status: Option<u64>) -> Self {
        match status {
            Some(1) => TxStatus::Success,
            _ => TxStatus::Reverted,
        }
    }
}
