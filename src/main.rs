use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod integrations;
mod models;
mod services;
mod utils;

use config::Config;
use integrations::NeynarClient;
use services::{EthersChainReader, RedisPaidStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "donut_miner_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Donut Miner API");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Chain: {} ({})",
        config.caip2_chain_id(),
        if config.is_testnet() { "testnet" } else { "mainnet" }
    );

    let chain = EthersChainReader::from_config(&config)?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let redis_manager = redis::aio::ConnectionManager::new(redis).await?;

    let app_state = api::AppState {
        chain: Arc::new(chain),
        farcaster: Arc::new(NeynarClient::from_config(&config)),
        paid: Arc::new(RedisPaidStore::new(redis_manager, config.paid_flag_ttl_secs)),
        config: Arc::new(config.clone()),
    };

    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Game state
        .route("/api/get-game-state", get(api::game_state::get_game_state))
        .route("/api/get-price", get(api::price::get_price))
        .route(
            "/api/get-auction-state",
            get(api::auction::get_auction_state),
        )
        .route("/api/approve-lp", get(api::auction::approve_lp))
        // Transactions
        .route(
            "/api/transaction",
            post(api::transaction::mine_transaction),
        )
        .route("/api/pay", post(api::transaction::pay_entry_fee))
        .route("/api/check-tx", get(api::check_tx::check_tx))
        // Frames
        .route("/api/index", post(api::frame::index_frame))
        .route("/api/verify", post(api::frame::verify_frame))
        .route("/api/blaze-verify", post(api::frame::blaze_verify))
        .route(
            "/api/payment-frame",
            get(api::frame::payment_frame_page).post(api::frame::payment_frame_page),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::default_state;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let app = build_router(default_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/verify")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let app = build_router(default_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cors_accepts_origin_list() {
        let mut config = crate::config::test_config();
        config.cors_allowed_origins = "https://a.example, https://b.example".to_string();
        let mut state = default_state();
        state.config = Arc::new(config);

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://b.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://b.example"))
        );
    }

    #[tokio::test]
    async fn frame_tx_target_accepts_body_without_content_type() {
        let app = build_router(default_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/transaction")
                    .body(Body::from(
                        r#"{"untrustedData":{"fid":5,"address":"0x0000000000000000000000000000000000000abc"}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = build_router(default_state())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/pay")
                    .body(Body::from(r#"{"untrustedData":{"fid":5}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
