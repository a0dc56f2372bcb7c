use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{optional_address, AppState};
use crate::{
    error::Result,
    models::GameStateResponse,
    services::state_formatter::{build_game_state, GameStateInputs},
    utils::unix_now,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateQuery {
    pub user_address: Option<String>,
}

/// GET /api/get-game-state
pub async fn get_game_state(
    State(state): State<AppState>,
    Query(query): Query<GameStateQuery>,
) -> Result<Json<GameStateResponse>> {
    let account = optional_address(query.user_address.as_deref())?;
    tracing::debug!("get-game-state for {:#x}", account);

    let (miner_state, schedule) = tokio::try_join!(
        state.chain.miner_state(account),
        state.chain.miner_schedule(),
    )?;
    let total_supply = state.chain.token_total_supply(schedule.donut_token).await?;

    // A failed username lookup never fails the request.
    let miner_username = if miner_state.miner.is_zero() {
        None
    } else {
        match state.farcaster.username_for_address(miner_state.miner).await {
            Ok(username) => username,
            Err(err) => {
                tracing::warn!("username lookup for {:#x} failed: {}", miner_state.miner, err);
                None
            }
        }
    };

    let response = build_game_state(GameStateInputs {
        state: &miner_state,
        schedule: &schedule,
        total_supply,
        account,
        miner_username,
        miner_contract: state.config.miner_address,
        now: unix_now(),
    });

    tracing::info!(
        "get-game-state epoch={} miner={}",
        response.epoch_id,
        response.current_miner
    );
    Ok(Json(response))
}
