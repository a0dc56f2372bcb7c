use axum::{body::Bytes, extract::State, Json};

use super::{parse_frame_body, AppState};
use crate::{
    error::{AppError, Result},
    models::FrameTransaction,
    services::tx_builder::{build_entry_fee_transaction, build_mine_transaction},
    utils::{parse_evm_address, unix_now},
};

/// POST /api/transaction
///
/// Frame `tx` button target: a `mine` call making the presser the new miner.
pub async fn mine_transaction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FrameTransaction>> {
    let req = parse_frame_body(&body)?;
    let untrusted = req
        .untrusted_data
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Missing untrustedData".to_string()))?;
    let fid = untrusted
        .fid
        .ok_or_else(|| AppError::BadRequest("Missing fid".to_string()))?;
    let raw_address = untrusted
        .address
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing address".to_string()))?;
    let user = parse_evm_address(raw_address)?;

    let slot = state.chain.miner_slot().await?;
    tracing::info!(
        "transaction: fid={} user={:#x} epoch={} price={}",
        fid,
        user,
        slot.epoch_id,
        slot.price
    );

    Ok(Json(build_mine_transaction(&state.config, user, &slot, unix_now())))
}

/// POST /api/pay
pub async fn pay_entry_fee(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FrameTransaction>> {
    let req = parse_frame_body(&body)?;
    let fid = req.untrusted_data.as_ref().and_then(|data| data.fid);
    let tx = build_entry_fee_transaction(&state.config)?;
    tracing::info!(
        "pay: fid={:?} amount={} USDC units",
        fid,
        state.config.entry_fee_usdc_units
    );
    Ok(Json(tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::default_state;
    use crate::services::contracts::MineCall;
    use ethers::abi::AbiDecode;
    use ethers::types::{Address, U256};
    use serde_json::json;

    fn request(fid: Option<u64>, address: Option<&str>) -> Bytes {
        Bytes::from(
            json!({ "untrustedData": { "fid": fid, "address": address } }).to_string(),
        )
    }

    #[tokio::test]
    async fn builds_mine_call_for_presser() {
        let user = "0x0000000000000000000000000000000000000abc";
        let Json(tx) = mine_transaction(State(default_state()), request(Some(5), Some(user)))
            .await
            .unwrap();
        assert_eq!(tx.chain_id, "eip155:8453");
        assert_eq!(tx.params.value, "1000000000");

        let data = hex::decode(tx.params.data.trim_start_matches("0x")).unwrap();
        let call = MineCall::decode(&data).unwrap();
        assert_eq!(call.miner, Address::from_low_u64_be(0xabc));
        assert_eq!(call.epoch_id, U256::from(7u64));
        assert_eq!(call.max_price, U256::from(1_100_000_000u64));
    }

    #[tokio::test]
    async fn missing_fid_or_address_is_rejected() {
        let no_fid = mine_transaction(
            State(default_state()),
            request(None, Some("0x0000000000000000000000000000000000000abc")),
        )
        .await;
        assert!(matches!(no_fid, Err(AppError::BadRequest(_))));

        let no_address = mine_transaction(State(default_state()), request(Some(5), None)).await;
        assert!(matches!(no_address, Err(AppError::BadRequest(_))));

        let empty = mine_transaction(State(default_state()), Bytes::new()).await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));

        let garbage = mine_transaction(State(default_state()), Bytes::from_static(b"fid=5")).await;
        assert!(matches!(garbage, Err(AppError::BadRequest(msg)) if msg == "Invalid request"));
    }

    #[tokio::test]
    async fn pay_returns_usdc_transfer() {
        let state = default_state();
        let usdc = crate::utils::checksum(&state.config.usdc_address);
        let Json(tx) = pay_entry_fee(State(state), request(Some(5), None)).await.unwrap();
        assert_eq!(tx.params.to, usdc);
        assert!(tx.params.data.starts_with("0xa9059cbb"));
        assert_eq!(tx.params.abi[0]["name"], "transfer");
    }
}
