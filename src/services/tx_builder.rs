use ethers::abi::AbiEncode;
use ethers::types::{Address, U256};

use crate::{
    config::Config,
    constants::{MAX_PRICE_DENOMINATOR, MAX_PRICE_NUMERATOR, MINE_DEADLINE_SECS},
    error::{AppError, Result},
    models::{
        ApproveDetails, ApproveParams, ApproveResponse, FrameTransaction, FrameTransactionParams,
        MinerSlot,
    },
    utils::{checksum, hex_data},
};

use super::contracts::{mine_abi, transfer_abi, ApproveCall, MineCall, TransferCall};

const SEND_TRANSACTION_METHOD: &str = "eth_sendTransaction";

/// Upper bound the contract will accept for `mine`, 10% above the quoted price.
pub fn max_price_with_slippage(price: U256) -> U256 {
    price.saturating_mul(U256::from(MAX_PRICE_NUMERATOR)) / U256::from(MAX_PRICE_DENOMINATOR)
}

pub fn mine_deadline(now: u64) -> u64 {
    now.saturating_add(MINE_DEADLINE_SECS)
}

#[derive(Debug, Clone)]
pub struct MineArgs {
    pub miner: Address,
    pub provider: Address,
    pub epoch_id: u16,
    pub deadline: u64,
    pub max_price: U256,
    pub uri: String,
}

pub fn encode_mine(args: &MineArgs) -> Vec<u8> {
    MineCall {
        miner: args.miner,
        provider: args.provider,
        epoch_id: U256::from(args.epoch_id),
        deadline: U256::from(args.deadline),
        max_price: args.max_price,
        uri: args.uri.clone(),
    }
    .encode()
}

pub fn encode_approve(spender: Address, amount: U256) -> Vec<u8> {
    ApproveCall { spender, amount }.encode()
}

pub fn encode_transfer(to: Address, amount: U256) -> Vec<u8> {
    TransferCall { to, amount }.encode()
}

/// `mine` transaction making `user` the new miner at the current epoch and price.
pub fn build_mine_transaction(
    config: &Config,
    user: Address,
    slot: &MinerSlot,
    now: u64,
) -> FrameTransaction {
    let args = MineArgs {
        miner: user,
        provider: config.provider_address,
        epoch_id: slot.epoch_id,
        deadline: mine_deadline(now),
        max_price: max_price_with_slippage(slot.price),
        uri: String::new(),
    };
    tracing::debug!(
        "mine calldata epoch={} price={} max_price={} deadline={}",
        args.epoch_id,
        slot.price,
        args.max_price,
        args.deadline
    );

    FrameTransaction {
        chain_id: config.caip2_chain_id(),
        method: SEND_TRANSACTION_METHOD.to_string(),
        params: FrameTransactionParams {
            abi: mine_abi(),
            to: checksum(&config.miner_address),
            data: hex_data(&encode_mine(&args)),
            value: slot.price.to_string(),
        },
    }
}

/// Unlimited `approve` of the auction payment token, with the auction Multicall as spender.
pub fn build_approve_lp(token: Address, spender: Address) -> ApproveResponse {
    ApproveResponse {
        params: ApproveParams {
            to: checksum(&token),
            data: hex_data(&encode_approve(spender, U256::MAX)),
            value: "0x0".to_string(),
        },
        details: ApproveDetails {
            action: "Approve LP tokens".to_string(),
            spender: checksum(&spender),
            token: checksum(&token),
            amount: "unlimited".to_string(),
        },
    }
}

/// USDC `transfer` of the frame entry fee to the configured payee.
pub fn build_entry_fee_transaction(config: &Config) -> Result<FrameTransaction> {
    let recipient = config
        .payment_recipient_address
        .ok_or_else(|| AppError::Config("PAYMENT_RECIPIENT_ADDRESS is not set".to_string()))?;
    let amount = U256::from(config.entry_fee_usdc_units);

    Ok(FrameTransaction {
        chain_id: config.caip2_chain_id(),
        method: SEND_TRANSACTION_METHOD.to_string(),
        params: FrameTransactionParams {
            abi: transfer_abi(),
            to: checksum(&config.usdc_address),
            data: hex_data(&encode_transfer(recipient, amount)),
            value: "0".to_string(),
        },
    })
}
