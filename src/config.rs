use ethers::types::Address;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_AUCTION_MULTICALL_ADDRESS, DEFAULT_CHAIN_ID, DEFAULT_ENTRY_FEE_USDC_UNITS,
    DEFAULT_FAILED_IMAGE_URL, DEFAULT_MINER_ADDRESS, DEFAULT_MULTICALL_ADDRESS,
    DEFAULT_NEYNAR_API_URL, DEFAULT_PROVIDER_ADDRESS, DEFAULT_START_IMAGE_URL,
    DEFAULT_SUCCESS_IMAGE_URL, DEFAULT_TAKEOVER_CONTRACT_ADDRESS, DEFAULT_TX_POLL_INTERVAL_MS,
    DEFAULT_TX_WAIT_TIMEOUT_SECS, DEFAULT_USDC_ADDRESS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Redis
    pub redis_url: String,

    // Blockchain
    pub base_provider_url: String,
    pub chain_id: u64,

    // Contract Addresses
    pub multicall_address: Address,
    pub miner_address: Address,
    pub provider_address: Address,
    pub auction_multicall_address: Address,
    pub takeover_contract_address: Address,
    pub usdc_address: Address,

    // Payment gate
    pub payment_recipient_address: Option<Address>,
    pub entry_fee_usdc_units: u64,
    pub paid_flag_ttl_secs: Option<u64>,

    // Frames
    pub public_url: Option<String>,
    pub game_url: Option<String>,
    pub start_image_url: String,
    pub success_image_url: String,
    pub failed_image_url: String,

    // External APIs
    pub neynar_api_key: Option<String>,
    pub neynar_api_url: String,

    // Transaction poller
    pub tx_wait_timeout_secs: u64,
    pub tx_poll_interval_ms: u64,

    // CORS
    pub cors_allowed_origins: String,
}

// Internal helper that reads an optional, non-blank variable.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// Internal helper that parses a contract address, falling back to the deployed default.
fn address_var(name: &str, default: &str) -> anyhow::Result<Address> {
    let raw = optional_var(name).unwrap_or_else(|| default.to_string());
    Address::from_str(&raw).map_err(|e| anyhow::anyhow!("{} is not a valid address ({}): {}", name, raw, e))
}

// Internal helper that parses an optional number, failing on a malformed value.
fn optional_u64_var(name: &str) -> anyhow::Result<Option<u64>> {
    optional_var(name)
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| anyhow::anyhow!("{} is not a valid number ({}): {}", name, raw, e))
        })
        .transpose()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let payment_recipient_address = match optional_var("PAYMENT_RECIPIENT_ADDRESS") {
            Some(raw) => Some(Address::from_str(&raw).map_err(|e| {
                anyhow::anyhow!("PAYMENT_RECIPIENT_ADDRESS is not a valid address: {}", e)
            })?),
            None => None,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),

            base_provider_url: env::var("BASE_PROVIDER_URL")?,
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
                .parse()?,

            multicall_address: address_var("MULTICALL_ADDRESS", DEFAULT_MULTICALL_ADDRESS)?,
            miner_address: address_var("MINER_ADDRESS", DEFAULT_MINER_ADDRESS)?,
            provider_address: address_var("PROVIDER_ADDRESS", DEFAULT_PROVIDER_ADDRESS)?,
            auction_multicall_address: address_var(
                "AUCTION_MULTICALL_ADDRESS",
                DEFAULT_AUCTION_MULTICALL_ADDRESS,
            )?,
            takeover_contract_address: address_var(
                "TAKEOVER_CONTRACT_ADDRESS",
                DEFAULT_TAKEOVER_CONTRACT_ADDRESS,
            )?,
            usdc_address: address_var("USDC_ADDRESS", DEFAULT_USDC_ADDRESS)?,

            payment_recipient_address,
            entry_fee_usdc_units: env::var("ENTRY_FEE_USDC_UNITS")
                .unwrap_or_else(|_| DEFAULT_ENTRY_FEE_USDC_UNITS.to_string())
                .parse()?,
            paid_flag_ttl_secs: optional_u64_var("PAID_FLAG_TTL_SECS")?,

            public_url: optional_var("PUBLIC_URL"),
            game_url: optional_var("GAME_URL"),
            start_image_url: optional_var("START_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_START_IMAGE_URL.to_string()),
            success_image_url: optional_var("SUCCESS_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_SUCCESS_IMAGE_URL.to_string()),
            failed_image_url: optional_var("FAILED_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_FAILED_IMAGE_URL.to_string()),

            neynar_api_key: optional_var("NEYNAR_API_KEY"),
            neynar_api_url: optional_var("NEYNAR_API_URL")
                .unwrap_or_else(|| DEFAULT_NEYNAR_API_URL.to_string()),

            tx_wait_timeout_secs: env::var("TX_WAIT_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TX_WAIT_TIMEOUT_SECS.to_string())
                .parse()?,
            tx_poll_interval_ms: env::var("TX_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| DEFAULT_TX_POLL_INTERVAL_MS.to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_provider_url.trim().is_empty() {
            anyhow::bail!("BASE_PROVIDER_URL is empty");
        }
        url::Url::parse(self.base_provider_url.trim())
            .map_err(|e| anyhow::anyhow!("BASE_PROVIDER_URL is not a valid URL: {}", e))?;
        if self.paid_flag_ttl_secs == Some(0) {
            anyhow::bail!("PAID_FLAG_TTL_SECS must be > 0 when set");
        }
        if self.tx_poll_interval_ms == 0 {
            anyhow::bail!("TX_POLL_INTERVAL_MS must be > 0");
        }

        if self.multicall_address.is_zero() {
            tracing::warn!("Using zero multicall address");
        }
        if self.miner_address.is_zero() {
            tracing::warn!("Using zero miner address");
        }
        if self.auction_multicall_address.is_zero() {
            tracing::warn!("Using zero auction multicall address");
        }
        if self.takeover_contract_address.is_zero() {
            tracing::warn!("Using zero takeover contract address");
        }

        if self.neynar_api_key.is_none() {
            tracing::warn!("NEYNAR_API_KEY not set; usernames are disabled and frame validation will fail");
        }
        if self.public_url.is_none() || self.game_url.is_none() {
            tracing::warn!("PUBLIC_URL or GAME_URL not set; frame routes will answer 500");
        }
        if self.payment_recipient_address.is_none() {
            tracing::warn!("PAYMENT_RECIPIENT_ADDRESS not set; /api/pay is disabled");
        }

        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        if self.environment == "development" || self.environment == "testnet" {
            return true;
        }
        // Base Sepolia
        self.chain_id == 84532
    }

    /// CAIP-2 chain identifier used in frame transaction responses.
    pub fn caip2_chain_id(&self) -> String {
        format!("eip155:{}", self.chain_id)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        environment: "testnet".to_string(),
        redis_url: "redis://localhost:6379".to_string(),
        base_provider_url: "http://localhost:8545".to_string(),
        chain_id: DEFAULT_CHAIN_ID,
        multicall_address: Address::from_low_u64_be(0x1001),
        miner_address: Address::from_low_u64_be(0x1002),
        provider_address: Address::from_low_u64_be(0x1003),
        auction_multicall_address: Address::from_low_u64_be(0x1004),
        takeover_contract_address: Address::from_low_u64_be(0x1005),
        usdc_address: Address::from_low_u64_be(0x1006),
        payment_recipient_address: Some(Address::from_low_u64_be(0x2001)),
        entry_fee_usdc_units: DEFAULT_ENTRY_FEE_USDC_UNITS,
        paid_flag_ttl_secs: None,
        public_url: Some("https://frames.example".to_string()),
        game_url: Some("https://game.example".to_string()),
        start_image_url: "https://img.example/start.png".to_string(),
        success_image_url: "https://img.example/success.png".to_string(),
        failed_image_url: "https://img.example/failed.png".to_string(),
        neynar_api_key: None,
        neynar_api_url: DEFAULT_NEYNAR_API_URL.to_string(),
        tx_wait_timeout_secs: 1,
        tx_poll_interval_ms: 10,
        cors_allowed_origins: "*".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caip2_chain_id_prefixes_eip155() {
        let config = test_config();
        assert_eq!(config.caip2_chain_id(), "eip155:8453");
    }

    #[test]
    fn validate_rejects_unparseable_rpc_url() {
        let mut config = test_config();
        config.base_provider_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_poll_interval() {
        let mut config = test_config();
        config.tx_poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_paid_flag_ttl() {
        let mut config = test_config();
        config.paid_flag_ttl_secs = Some(0);
        assert!(config.validate().is_err());
        config.paid_flag_ttl_secs = Some(86_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn optional_u64_var_fails_on_malformed_value() {
        std::env::set_var("DONUT_MINER_TEST_BAD_TTL", "one day");
        assert!(optional_u64_var("DONUT_MINER_TEST_BAD_TTL").is_err());
        std::env::set_var("DONUT_MINER_TEST_GOOD_TTL", "3600");
        assert_eq!(optional_u64_var("DONUT_MINER_TEST_GOOD_TTL").unwrap(), Some(3600));
        assert_eq!(optional_u64_var("DONUT_MINER_TEST_UNSET_TTL").unwrap(), None);
    }

    #[test]
    fn address_var_falls_back_to_default() {
        let addr = address_var("DONUT_MINER_TEST_UNSET_ADDRESS", DEFAULT_MINER_ADDRESS).unwrap();
        assert_eq!(addr, Address::from_str(DEFAULT_MINER_ADDRESS).unwrap());
    }
}
