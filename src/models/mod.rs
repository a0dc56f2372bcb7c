// src/models/mod.rs
pub mod chain;
pub mod frame;
pub mod responses;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use chain::{AuctionState, MinerSchedule, MinerSlot, MinerState, TakeoverSlot, TxStatus};
pub use frame::{FrameActionRequest, ValidatedFrameAction};
pub use responses::{
    ApproveDetails, ApproveParams, ApproveResponse, AuctionStateResponse, FrameTransaction,
    FrameTransactionParams, GameStateResponse, PriceResponse, TxStatusResponse,
};
