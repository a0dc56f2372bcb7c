use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::time::Duration;

use super::AppState;
use crate::{
    models::TxStatusResponse,
    services::{wait_for_transaction, TxOutcome},
    utils::parse_tx_hash,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTxQuery {
    pub tx_hash: Option<String>,
}

fn outcome_response(outcome: TxOutcome) -> (StatusCode, TxStatusResponse) {
    match outcome {
        TxOutcome::Confirmed => (StatusCode::OK, TxStatusResponse::confirmed()),
        TxOutcome::Reverted => (
            StatusCode::BAD_REQUEST,
            TxStatusResponse::with_error("reverted", "Transaction was reverted."),
        ),
        TxOutcome::TimedOut => (
            StatusCode::REQUEST_TIMEOUT,
            TxStatusResponse::with_error("timeout", "Transaction timed out."),
        ),
    }
}

/// GET /api/check-tx
///
/// Blocks until the transaction is mined, reverted, or the poller gives up.
pub async fn check_tx(
    State(state): State<AppState>,
    Query(query): Query<CheckTxQuery>,
) -> (StatusCode, Json<TxStatusResponse>) {
    let raw = match query.tx_hash.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
        Some(raw) => raw,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(TxStatusResponse::with_error("failed", "Missing txHash.")),
            )
        }
    };
    let hash = match parse_tx_hash(raw) {
        Ok(hash) => hash,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(TxStatusResponse::with_error("failed", err.public_message())),
            )
        }
    };

    tracing::info!("check-tx: waiting for {:#x}", hash);
    let outcome = wait_for_transaction(
        state.chain.as_ref(),
        hash,
        Duration::from_secs(state.config.tx_wait_timeout_secs),
        Duration::from_millis(state.config.tx_poll_interval_ms),
    )
    .await;
    match outcome {
        Ok(outcome) => {
            tracing::info!("check-tx: {:#x} -> {:?}", hash, outcome);
            let (status, body) = outcome_response(outcome);
            (status, Json(body))
        }
        Err(err) => {
            tracing::error!("check-tx: {:#x} failed: {}", hash, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TxStatusResponse::with_error("failed", err.public_message())),
            )
        }
    }
}
