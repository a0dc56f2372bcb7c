use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::{parse_frame_body, require_game_url, require_public_url, AppState};
use crate::{
    error::{AppError, HtmlError},
    services::{
        frame_renderer::{
            blaze_success_frame, payment_frame, payment_page, redirect_frame, retry_frame,
            usdc_fee_label,
        },
        TxOutcome, TxPoller,
    },
    utils::parse_tx_hash,
};

type FrameResult = std::result::Result<Response, HtmlError>;

fn html(body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        body,
    )
        .into_response()
}

/// POST /api/index
///
/// Entry frame: paid fids go straight to the game, everyone else is asked to pay.
pub async fn index_frame(State(state): State<AppState>, body: Bytes) -> FrameResult {
    let req = parse_frame_body(&body)?;
    let config = &state.config;
    let public_url = require_public_url(config)?;

    let fid = match req.message_bytes() {
        Some(bytes) => {
            let action = state.farcaster.validate_frame_action(bytes).await?;
            if action.valid {
                action.fid
            } else {
                tracing::warn!("index: frame signature rejected");
                None
            }
        }
        None => None,
    };

    let has_paid = match fid {
        Some(fid) => state.paid.has_paid(fid).await?,
        None => false,
    };
    tracing::info!("index: fid={:?} paid={}", fid, has_paid);

    if has_paid {
        let game_url = require_game_url(config)?;
        Ok(html(redirect_frame(&config.start_image_url, game_url)))
    } else {
        Ok(html(payment_frame(
            &config.start_image_url,
            public_url,
            &usdc_fee_label(config.entry_fee_usdc_units),
        )))
    }
}

/// POST /api/verify
///
/// Waits for the payment transaction named by a validated frame action and
/// records the fid as paid once it confirms.
pub async fn verify_frame(State(state): State<AppState>, body: Bytes) -> FrameResult {
    let req = parse_frame_body(&body)?;
    let config = &state.config;
    let public_url = require_public_url(config)?;
    let game_url = require_game_url(config)?;

    let message_bytes = req.message_bytes().ok_or_else(|| {
        tracing::warn!("verify: missing trustedData");
        AppError::BadRequest("Invalid request: missing trustedData".to_string())
    })?;

    let action = state.farcaster.validate_frame_action(message_bytes).await?;
    let retry = || html(retry_frame(&config.failed_image_url, public_url));

    if !action.valid {
        tracing::warn!("verify: frame signature rejected");
        return Ok(retry());
    }
    let hash = match action.transaction_hash.as_deref().map(parse_tx_hash) {
        Some(Ok(hash)) => hash,
        Some(Err(err)) => {
            tracing::warn!("verify: {}", err);
            return Ok(retry());
        }
        None => {
            tracing::info!("verify: no transaction hash, showing retry frame");
            return Ok(retry());
        }
    };

    tracing::info!("verify: waiting for {:#x} (fid={:?})", hash, action.fid);
    let outcome = TxPoller::from_config(config)
        .wait(state.chain.as_ref(), hash)
        .await;

    match outcome {
        Ok(TxOutcome::Confirmed) => {
            match action.fid {
                Some(fid) => state.paid.mark_paid(fid).await?,
                None => tracing::warn!("verify: confirmed {:#x} without an fid", hash),
            }
            tracing::info!("verify: payment {:#x} confirmed", hash);
            Ok(html(redirect_frame(&config.success_image_url, game_url)))
        }
        Ok(other) => {
            tracing::info!("verify: payment {:#x} ended as {:?}", hash, other);
            Ok(retry())
        }
        Err(err) => {
            tracing::error!("verify: waiting for {:#x} failed: {}", hash, err);
            Ok(retry())
        }
    }
}

/// POST /api/blaze-verify
pub async fn blaze_verify(State(state): State<AppState>, body: Bytes) -> FrameResult {
    let req = parse_frame_body(&body)?;
    let untrusted = req
        .untrusted_data
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Invalid request".to_string()))?;
    let config = &state.config;
    let game_url = require_game_url(config)?;

    let tx_id = untrusted
        .transaction_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    tracing::info!("blaze-verify: fid={:?} tx={:?}", untrusted.fid, tx_id);

    Ok(html(blaze_success_frame(
        &config.success_image_url,
        game_url,
        tx_id,
    )))
}

/// GET|POST /api/payment-frame
pub async fn payment_frame_page(State(state): State<AppState>) -> FrameResult {
    let config = &state.config;
    let public_url = require_public_url(config)?;
    Ok(html(payment_page(&config.start_image_url, public_url)))
}
