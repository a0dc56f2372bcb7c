// src/api/mod.rs

pub mod auction;
pub mod check_tx;
pub mod frame;
pub mod game_state;
pub mod health;
pub mod price;
pub mod transaction;

use axum::body::Bytes;
use ethers::types::Address;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::integrations::FarcasterClient;
use crate::models::FrameActionRequest;
use crate::services::{ChainReader, PaidStore};
use crate::utils::parse_evm_address;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chain: Arc<dyn ChainReader>,
    pub farcaster: Arc<dyn FarcasterClient>,
    pub paid: Arc<dyn PaidStore>,
}

/// Optional `userAddress`-style parameter: absent or blank means the zero
/// address, anything else must be a valid EVM address.
pub fn optional_address(raw: Option<&str>) -> Result<Address> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_evm_address(value),
        None => Ok(Address::zero()),
    }
}

// Frame clients do not always send a JSON content type, so the body is parsed by hand.
pub fn parse_frame_body(body: &Bytes) -> Result<FrameActionRequest> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(FrameActionRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("unparseable frame body: {}", e);
        AppError::BadRequest("Invalid request".to_string())
    })
}

pub fn require_public_url(config: &Config) -> Result<&str> {
    config
        .public_url
        .as_deref()
        .ok_or_else(|| AppError::Config("PUBLIC_URL is not set".to_string()))
}

pub fn require_game_url(config: &Config) -> Result<&str> {
    config
        .game_url
        .as_deref()
        .ok_or_else(|| AppError::Config("GAME_URL is not set".to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::test_config;
    use crate::services::fakes::{FakeChainReader, FakeFarcaster, MemoryPaidStore};

    pub fn state_with(
        chain: FakeChainReader,
        farcaster: FakeFarcaster,
        paid: Arc<MemoryPaidStore>,
    ) -> AppState {
        AppState {
            config: Arc::new(test_config()),
            chain: Arc::new(chain),
            farcaster: Arc::new(farcaster),
            paid,
        }
    }

    pub fn default_state() -> AppState {
        state_with(
            FakeChainReader::default(),
            FakeFarcaster::default(),
            Arc::new(MemoryPaidStore::default()),
        )
    }

    pub async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
