// Utility helpers shared by handlers and services

use ethers::types::{Address, H256};
use ethers::utils::to_checksum;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Current wall-clock time in unix seconds.
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Parses a user-supplied EVM address, rejecting anything that is not 20 hex bytes.
pub fn parse_evm_address(raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::BadRequest(format!("Invalid address: {}", raw)));
    }
    Address::from_str(hex_part).map_err(|_| AppError::BadRequest(format!("Invalid address: {}", raw)))
}

/// Parses a 32-byte transaction hash.
pub fn parse_tx_hash(raw: &str) -> Result<H256> {
    let trimmed = raw.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex_part.len() != 64 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::BadRequest(format!("Invalid txHash: {}", raw)));
    }
    H256::from_str(hex_part).map_err(|_| AppError::BadRequest(format!("Invalid txHash: {}", raw)))
}

/// EIP-55 checksummed address string.
pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// 0x-prefixed hex encoding of calldata.
pub fn hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
