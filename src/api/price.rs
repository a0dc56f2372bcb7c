use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{optional_address, AppState};
use crate::{error::Result, models::PriceResponse, services::state_formatter::build_price_response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    pub user_address: Option<String>,
}

/// GET /api/get-price
///
/// Takeover price in USDC and, for a given user, their USDC allowance to the
/// takeover contract.
pub async fn get_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceResponse>> {
    let account = optional_address(query.user_address.as_deref())?;
    let config = &state.config;

    let (slot, allowance) = if account.is_zero() {
        (state.chain.takeover_slot().await?, None)
    } else {
        let (slot, allowance) = tokio::try_join!(
            state.chain.takeover_slot(),
            state.chain.allowance(
                config.usdc_address,
                account,
                config.takeover_contract_address
            ),
        )?;
        (slot, Some(allowance))
    };

    tracing::debug!(
        "get-price epoch={} price={} allowance={:?}",
        slot.epoch_id,
        slot.price,
        allowance
    );
    Ok(Json(build_price_response(&slot, allowance)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{default_state, state_with};
    use crate::services::fakes::{FakeChainReader, FakeFarcaster, MemoryPaidStore};
    use ethers::types::U256;
    use std::sync::Arc;

    #[tokio::test]
    async fn free_price_without_user_has_null_allowance() {
        let mut chain = FakeChainReader::default();
        chain.takeover.price = U256::zero();
        let state = state_with(chain, FakeFarcaster::default(), Arc::new(MemoryPaidStore::default()));

        let Json(body) = get_price(State(state), Query(PriceQuery { user_address: None }))
            .await
            .unwrap();
        assert!(body.is_free);
        assert_eq!(body.allowance, None);
        assert_eq!(body.epoch_id, 4);
    }

    #[tokio::test]
    async fn user_request_includes_allowance() {
        let query = PriceQuery {
            user_address: Some("0x0000000000000000000000000000000000000abc".to_string()),
        };
        let Json(body) = get_price(State(default_state()), Query(query)).await.unwrap();
        assert!(!body.is_free);
        assert_eq!(body.price_in_usdc, "2.0");
        assert_eq!(body.allowance.as_deref(), Some("500000"));
    }
}
