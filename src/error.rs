use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Blockchain RPC error: {0}")]
    BlockchainRPC(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalAPI(String),

    #[error("Server configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Maps a raw RPC or revert message to a sentence a player can act on.
///
/// Returns `None` when nothing recognisable is found, in which case the raw
/// message is shown.
pub fn humanize_chain_error(message: &str) -> Option<&'static str> {
    let lower = message.to_ascii_lowercase();
    if lower.contains("epochidmismatch") {
        Some("Game state updated. Please refresh and try again.")
    } else if lower.contains("maxpaymentamountexceeded") || lower.contains("maxpriceexceeded") {
        Some("Price changed. Please refresh and try again.")
    } else if lower.contains("expired") {
        Some("Transaction expired. Please try again.")
    } else if lower.contains("insufficient funds") {
        Some("Insufficient funds in your wallet.")
    } else if lower.contains("call exception") || lower.contains("could not detect network") {
        Some("Network error or wrong wallet network. Please check your wallet and try again.")
    } else if lower.contains("timeout") || lower.contains("timed out") {
        Some("Confirmation timed out. Please try again.")
    } else if lower.contains("nonce") {
        Some("Transaction error. Please try again.")
    } else {
        None
    }
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Redis(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            AppError::BlockchainRPC(_) => (StatusCode::INTERNAL_SERVER_ERROR, "BLOCKCHAIN_RPC_ERROR"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::ExternalAPI(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_API_ERROR"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message returned to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BlockchainRPC(raw) => humanize_chain_error(raw)
                .map(str::to_string)
                .unwrap_or_else(|| self.to_string()),
            AppError::BadRequest(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.public_message(),
                details: None,
            },
        });

        (status, body).into_response()
    }
}

/// Error wrapper for routes that answer frame clients, which expect text rather than JSON.
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let (status, _) = self.0.status_and_code();
        tracing::error!("frame request failed: {}", self.0);
        let body = match &self.0 {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Config(_) => self.0.to_string(),
            other => format!("Server Error: {}", other.public_message()),
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
