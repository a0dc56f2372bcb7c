use ethers::types::{Address, U256};
use ethers::utils::format_units;

use crate::{
    constants::{ETHER_DECIMALS, USDC_DECIMALS},
    models::{
        AuctionState, AuctionStateResponse, GameStateResponse, MinerSchedule, MinerState,
        PriceResponse, TakeoverSlot,
    },
    utils::checksum,
};

/// Formats a raw token amount with `decimals` places, trimming trailing zeros
/// but keeping one fractional digit (`"1.0"`, `"0.5"`, `"0.0"`).
pub fn format_units_trimmed(value: U256, decimals: u32) -> String {
    let formatted = match format_units(value, decimals) {
        Ok(formatted) => formatted,
        Err(err) => {
            tracing::warn!("format_units failed for {} ({} decimals): {}", value, decimals, err);
            return value.to_string();
        }
    };

    if !formatted.contains('.') {
        return format!("{}.0", formatted);
    }
    let trimmed = formatted.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

pub fn format_ether(value: U256) -> String {
    format_units_trimmed(value, ETHER_DECIMALS)
}

/// Seconds until the next halving boundary `contract_start + k * halving_period`.
pub fn seconds_until_halving(contract_start: u64, halving_period: u64, now: u64) -> u64 {
    if halving_period == 0 {
        return 0;
    }
    let elapsed = now.saturating_sub(contract_start);
    let periods_done = elapsed / halving_period;
    let next_halving = contract_start.saturating_add((periods_done + 1).saturating_mul(halving_period));
    next_halving.saturating_sub(now)
}

/// How long the current holder has been mining, floored at zero for clock skew.
pub fn time_as_miner(miner_start: u64, now: u64) -> u64 {
    now.saturating_sub(miner_start)
}

// Internal helper that renders the zero address as "no user".
fn user_field(account: Address) -> Option<String> {
    if account.is_zero() {
        None
    } else {
        Some(checksum(&account))
    }
}

pub struct GameStateInputs<'a> {
    pub state: &'a MinerState,
    pub schedule: &'a MinerSchedule,
    pub total_supply: U256,
    pub account: Address,
    pub miner_username: Option<String>,
    pub miner_contract: Address,
    pub now: u64,
}

pub fn build_game_state(inputs: GameStateInputs<'_>) -> GameStateResponse {
    let GameStateInputs {
        state,
        schedule,
        total_supply,
        account,
        miner_username,
        miner_contract,
        now,
    } = inputs;

    GameStateResponse {
        epoch_id: state.epoch_id,
        current_miner: checksum(&state.miner),
        current_miner_username: miner_username,
        price: state.price.to_string(),
        price_in_eth: format_ether(state.price),

        current_dps: state.dps.to_string(),
        current_dps_formatted: format_ether(state.dps),
        next_dps: state.next_dps.to_string(),
        next_dps_formatted: format_ether(state.next_dps),

        start_time: state.start_time,
        current_time: now,
        time_as_miner: time_as_miner(state.start_time, now),
        seconds_until_halving: seconds_until_halving(
            schedule.start_time,
            schedule.halving_period,
            now,
        ),

        user_address: user_field(account),
        user_eth_balance: state.eth_balance.to_string(),
        user_eth_balance_formatted: format_ether(state.eth_balance),
        user_donut_balance: state.donut_balance.to_string(),
        user_donut_balance_formatted: format_ether(state.donut_balance),

        claimable_donuts: state.glazed.to_string(),
        claimable_donuts_formatted: format_ether(state.glazed),

        total_donut_supply: total_supply.to_string(),
        total_donut_supply_formatted: format_ether(total_supply),

        miner_contract: checksum(&miner_contract),
        donut_contract: checksum(&schedule.donut_token),

        uri: state.uri.clone(),
    }
}

pub fn build_price_response(slot: &TakeoverSlot, allowance: Option<U256>) -> PriceResponse {
    PriceResponse {
        price: slot.price.to_string(),
        epoch_id: slot.epoch_id,
        price_in_usdc: format_units_trimmed(slot.price, USDC_DECIMALS),
        allowance: allowance.map(|value| value.to_string()),
        is_free: slot.price.is_zero(),
    }
}

pub fn build_auction_response(state: &AuctionState, account: Address) -> AuctionStateResponse {
    AuctionStateResponse {
        epoch_id: state.epoch_id,
        start_time: state.start_time,
        payment_token: checksum(&state.payment_token),
        price: state.price.to_string(),
        price_formatted: format_ether(state.price),
        payment_token_price: state.payment_token_price.to_string(),
        payment_token_price_formatted: format_ether(state.payment_token_price),
        weth_accumulated: state.weth_accumulated.to_string(),
        weth_accumulated_formatted: format_ether(state.weth_accumulated),
        user_address: user_field(account),
        user_weth_balance: state.weth_balance.to_string(),
        user_weth_balance_formatted: format_ether(state.weth_balance),
        user_payment_token_balance: state.payment_token_balance.to_string(),
        user_payment_token_balance_formatted: format_ether(state.payment_token_balance),
    }
}
