// All service modules
pub mod chain_reader;
pub mod contracts;
pub mod frame_renderer;
pub mod paid_store;
pub mod state_formatter;
pub mod tx_builder;
pub mod tx_poller;

#[cfg(test)]
pub mod fakes;

// Re-export for convenience
pub use chain_reader::{ChainReader, EthersChainReader};
pub use paid_store::{PaidStore, RedisPaidStore};
pub use tx_poller::{wait_for_transaction, TxOutcome, TxPoller};
