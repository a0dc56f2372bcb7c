use async_trait::async_trait;
use ethers::types::Address;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::{
    config::Config,
    constants::NEYNAR_TIMEOUT_SECS,
    error::{AppError, Result},
    models::ValidatedFrameAction,
    utils::checksum,
};

/// Farcaster identity lookups and frame action validation.
#[async_trait]
pub trait FarcasterClient: Send + Sync {
    /// Username of the Farcaster account verified for `address`, if any.
    async fn username_for_address(&self, address: Address) -> Result<Option<String>>;

    /// Checks signed frame `messageBytes` and extracts the vouched-for fields.
    async fn validate_frame_action(&self, message_bytes: &str) -> Result<ValidatedFrameAction>;
}

#[derive(Clone, Debug)]
pub struct NeynarClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl NeynarClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(NEYNAR_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            base_url,
            api_key,
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.neynar_api_url.clone(), config.neynar_api_key.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Config("NEYNAR_API_KEY is not set".to_string()))
    }
}

// Internal helper that turns a non-2xx Neynar reply into an error.
async fn read_json(resp: reqwest::Response, what: &str) -> Result<Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!("Neynar {} returned {}: {}", what, status, body);
        return Err(AppError::ExternalAPI(format!(
            "Neynar {} failed with status {}",
            what, status
        )));
    }
    resp.json::<Value>()
        .await
        .map_err(|e| AppError::ExternalAPI(format!("Neynar {} returned invalid JSON: {}", what, e)))
}

/// Picks the first username out of a `bulk-by-address` reply.
///
/// Neynar keys the result by lowercase address, so both spellings are tried.
pub fn parse_username(payload: &Value, address: Address) -> Option<String> {
    let lower = format!("{:#x}", address);
    let checksummed = checksum(&address);
    [lower.as_str(), checksummed.as_str()]
        .iter()
        .find_map(|key| payload.get(*key))
        .and_then(|users| users.as_array())
        .and_then(|users| users.first())
        .and_then(|user| user.get("username"))
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
}

/// Reads `valid`, the interactor fid and the optional transaction hash out
/// of a `frame/validate` reply.
pub fn parse_validation(payload: &Value) -> ValidatedFrameAction {
    let action = payload.get("action");
    ValidatedFrameAction {
        valid: payload.get("valid").and_then(|v| v.as_bool()).unwrap_or(false),
        fid: action
            .and_then(|a| a.get("interactor"))
            .and_then(|i| i.get("fid"))
            .and_then(|fid| fid.as_u64()),
        transaction_hash: action
            .and_then(|a| a.get("transaction"))
            .and_then(|t| t.get("hash"))
            .and_then(|hash| hash.as_str())
            .filter(|hash| !hash.is_empty())
            .map(|hash| hash.to_string()),
    }
}

#[async_trait]
impl FarcasterClient for NeynarClient {
    async fn username_for_address(&self, address: Address) -> Result<Option<String>> {
        if !self.is_configured() {
            return Ok(None);
        }

        let resp = self
            .client
            .get(format!(
                "{}?addresses={:#x}",
                self.endpoint("/v2/farcaster/user/bulk-by-address"),
                address
            ))
            .header("x-api-key", self.api_key()?)
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Neynar user lookup failed: {}", e)))?;

        // Unknown addresses come back as 404.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let payload = read_json(resp, "user lookup").await?;
        Ok(parse_username(&payload, address))
    }

    async fn validate_frame_action(&self, message_bytes: &str) -> Result<ValidatedFrameAction> {
        let resp = self
            .client
            .post(self.endpoint("/v2/farcaster/frame/validate"))
            .header("x-api-key", self.api_key()?)
            .json(&json!({ "message_bytes_in_hex": message_bytes }))
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Neynar frame validation failed: {}", e)))?;

        let payload = read_json(resp, "frame validation").await?;
        let action = parse_validation(&payload);
        tracing::debug!(
            "Frame action valid={} fid={:?} tx={:?}",
            action.valid,
            action.fid,
            action.transaction_hash
        );
        Ok(action)
    }
}
