use serde::Serialize;

// ==================== GAME STATE ====================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    // Basic game state
    pub epoch_id: u16,
    pub current_miner: String,
    pub current_miner_username: Option<String>,
    pub price: String,
    pub price_in_eth: String,

    // DPS info
    pub current_dps: String,
    pub current_dps_formatted: String,
    pub next_dps: String,
    pub next_dps_formatted: String,

    // Timing
    pub start_time: u64,
    pub current_time: u64,
    pub time_as_miner: u64,
    pub seconds_until_halving: u64,

    // User data
    pub user_address: Option<String>,
    pub user_eth_balance: String,
    pub user_eth_balance_formatted: String,
    pub user_donut_balance: String,
    pub user_donut_balance_formatted: String,

    // Claimable
    pub claimable_donuts: String,
    pub claimable_donuts_formatted: String,

    // Supply
    pub total_donut_supply: String,
    pub total_donut_supply_formatted: String,

    // Contracts
    pub miner_contract: String,
    pub donut_contract: String,

    pub uri: String,
}

// ==================== PRICE ====================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub price: String,
    pub epoch_id: u16,
    pub price_in_usdc: String,
    pub allowance: Option<String>,
    pub is_free: bool,
}

// ==================== AUCTION ====================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionStateResponse {
    pub epoch_id: u16,
    pub start_time: u64,
    pub payment_token: String,
    pub price: String,
    pub price_formatted: String,
    pub payment_token_price: String,
    pub payment_token_price_formatted: String,
    pub weth_accumulated: String,
    pub weth_accumulated_formatted: String,
    pub user_address: Option<String>,
    pub user_weth_balance: String,
    pub user_weth_balance_formatted: String,
    pub user_payment_token_balance: String,
    pub user_payment_token_balance_formatted: String,
}

// ==================== TRANSACTIONS ====================
/// Wallet-ready transaction returned to a frame `tx` button.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTransaction {
    pub chain_id: String,
    pub method: String,
    pub params: FrameTransactionParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameTransactionParams {
    pub abi: serde_json::Value,
    pub to: String,
    pub data: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveResponse {
    pub params: ApproveParams,
    pub details: ApproveDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveParams {
    pub to: String,
    pub data: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveDetails {
    pub action: String,
    pub spender: String,
    pub token: String,
    pub amount: String,
}

// ==================== TX STATUS ====================
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TxStatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TxStatusResponse {
    pub fn confirmed() -> Self {
        Self {
            status: "confirmed".to_string(),
            error: None,
        }
    }

    pub fn with_error(status: &str, error: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_status_omits_error() {
        let body = serde_json::to_value(TxStatusResponse::confirmed()).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "confirmed" }));
    }

    #[test]
    fn price_response_uses_camel_case() {
        let body = serde_json::to_value(PriceResponse {
            price: "0".to_string(),
            epoch_id: 4,
            price_in_usdc: "0.0".to_string(),
            allowance: None,
            is_free: true,
        })
        .unwrap();
        assert_eq!(body["epochId"], 4);
        assert_eq!(body["priceInUsdc"], "0.0");
        assert!(body["allowance"].is_null());
        assert_eq!(body["isFree"], true);
    }
}
