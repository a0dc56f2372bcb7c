use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{optional_address, AppState};
use crate::{
    error::{AppError, Result},
    models::{ApproveResponse, AuctionStateResponse},
    services::{state_formatter::build_auction_response, tx_builder::build_approve_lp},
    utils::parse_evm_address,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionQuery {
    pub user_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveLpQuery {
    pub player: Option<String>,
}

/// GET /api/get-auction-state
pub async fn get_auction_state(
    State(state): State<AppState>,
    Query(query): Query<AuctionQuery>,
) -> Result<Json<AuctionStateResponse>> {
    let account = optional_address(query.user_address.as_deref())?;
    let auction = state.chain.auction_state(account).await?;
    tracing::debug!("get-auction-state epoch={} price={}", auction.epoch_id, auction.price);
    Ok(Json(build_auction_response(&auction, account)))
}

/// GET /api/approve-lp
///
/// Unsigned `approve` letting the auction Multicall spend the player's LP tokens.
pub async fn approve_lp(
    State(state): State<AppState>,
    Query(query): Query<ApproveLpQuery>,
) -> Result<Json<ApproveResponse>> {
    let raw = query
        .player
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing player address".to_string()))?;
    let player = parse_evm_address(raw)
        .map_err(|_| AppError::BadRequest("Invalid player address".to_string()))?;

    let auction = state.chain.auction_state(player).await?;
    if auction.payment_token.is_zero() {
        return Err(AppError::BlockchainRPC(
            "auction has no payment token".to_string(),
        ));
    }

    tracing::info!(
        "approve-lp for {:#x}: token={:#x} spender={:#x}",
        player,
        auction.payment_token,
        state.config.auction_multicall_address
    );
    Ok(Json(build_approve_lp(
        auction.payment_token,
        state.config.auction_multicall_address,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::default_state;
    use crate::utils::checksum;

    fn approve_query(player: Option<&str>) -> Query<ApproveLpQuery> {
        Query(ApproveLpQuery {
            player: player.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn auction_state_is_formatted() {
        let Json(body) = get_auction_state(State(default_state()), Query(AuctionQuery { user_address: None }))
            .await
            .unwrap();
        assert_eq!(body.epoch_id, 2);
        assert_eq!(body.price_formatted, "1.0");
        assert_eq!(body.weth_accumulated_formatted, "5.0");
        assert_eq!(body.user_address, None);
    }

    #[tokio::test]
    async fn approve_lp_requires_player() {
        let missing = approve_lp(State(default_state()), approve_query(None)).await;
        match missing {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Missing player address"),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }

        let invalid = approve_lp(State(default_state()), approve_query(Some("0x12"))).await;
        match invalid {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid player address"),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn approve_lp_targets_payment_token() {
        let state = default_state();
        let spender = state.config.auction_multicall_address;
        let Json(body) = approve_lp(
            State(state),
            approve_query(Some("0x0000000000000000000000000000000000000abc")),
        )
        .await
        .unwrap();
        assert_eq!(body.params.to, checksum(&ethers::types::Address::from_low_u64_be(0x1b)));
        assert_eq!(body.details.spender, checksum(&spender));
        assert_eq!(body.params.value, "0x0");
    }
}
