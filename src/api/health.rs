use axum::{extract::State, Json};
use serde::Serialize;
use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rpc: String,
    pub redis: String,
    pub chain_id: u64,
}

fn connection_label(ok: bool) -> String {
    if ok {
        "connected".to_string()
    } else {
        "disconnected".to_string()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (block, ping) = tokio::join!(state.chain.block_number(), state.paid.ping());

    if let Err(err) = &block {
        tracing::warn!("health: RPC unreachable: {}", err);
    }
    if let Err(err) = &ping {
        tracing::warn!("health: Redis unreachable: {}", err);
    }

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rpc: connection_label(block.is_ok()),
        redis: connection_label(ping.is_ok()),
        chain_id: state.config.chain_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{default_state, state_with};
    use crate::services::fakes::{FakeChainReader, FakeFarcaster, MemoryPaidStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn reports_connected_backends() {
        let Json(body) = health_check(State(default_state())).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.rpc, "connected");
        assert_eq!(body.redis, "connected");
        assert_eq!(body.chain_id, 8453);
    }

    #[tokio::test]
    async fn stays_ok_when_rpc_is_down() {
        let state = state_with(
            FakeChainReader::default().failing("could not detect network"),
            FakeFarcaster::default(),
            Arc::new(MemoryPaidStore::default()),
        );
        let Json(body) = health_check(State(state)).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.rpc, "disconnected");
    }
}
