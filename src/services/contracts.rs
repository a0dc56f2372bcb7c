//! Contract bindings for the game contracts on Base.
//!
//! Simple views and the state-changing calls go through `abigen!`. The
//! tuple-returning views (`getMiner`, `getAuction`, `getSlot0`) are described
//! as JSON ABI fragments and decoded into our own models, since their layouts
//! have changed between deployments.

use ethers::abi::Abi;
use serde_json::{json, Value};

use crate::error::{AppError, Result};

ethers::contract::abigen!(
    Erc20,
    r#"[
        function totalSupply() view returns (uint256)
        function allowance(address owner, address spender) view returns (uint256)
        function approve(address spender, uint256 amount) returns (bool)
        function transfer(address to, uint256 amount) returns (bool)
    ]"#
);

ethers::contract::abigen!(
    Miner,
    r#"[
        function startTime() view returns (uint256)
        function HALVING_PERIOD() view returns (uint256)
        function donut() view returns (address)
        function getPrice() view returns (uint256)
        function mine(address miner, address provider, uint256 epochId, uint256 deadline, uint256 maxPrice, string uri) payable returns (uint256)
    ]"#
);

/// `getSlot0` layout of the Miner contract: locked, epochId, initPrice, startTime, dps, miner, uri.
pub type MinerSlot0 = (
    u8,
    u16,
    ethers::types::U256,
    u64,
    ethers::types::U256,
    ethers::types::Address,
    String,
);

/// `getSlot0` layout of the takeover contract: locked, epochId, initPrice, startTime, owner, uri.
pub type TakeoverSlot0 = (
    u8,
    u16,
    ethers::types::U256,
    u64,
    ethers::types::Address,
    String,
);

// Internal helper that builds a list of named ABI params.
fn params(fields: &[(&str, &str)]) -> Vec<Value> {
    fields
        .iter()
        .map(|(name, kind)| json!({ "name": name, "type": kind }))
        .collect()
}

// Internal helper that builds a view function returning one tuple.
fn tuple_view(name: &str, inputs: &[(&str, &str)], components: &[(&str, &str)]) -> Value {
    json!({
        "type": "function",
        "name": name,
        "stateMutability": "view",
        "inputs": params(inputs),
        "outputs": [{
            "name": "state",
            "type": "tuple",
            "components": params(components),
        }],
    })
}

pub fn miner_multicall_abi() -> Value {
    json!([tuple_view(
        "getMiner",
        &[("account", "address")],
        &[
            ("epochId", "uint16"),
            ("initPrice", "uint192"),
            ("startTime", "uint40"),
            ("glazed", "uint256"),
            ("price", "uint256"),
            ("dps", "uint256"),
            ("nextDps", "uint256"),
            ("miner", "address"),
            ("uri", "string"),
            ("ethBalance", "uint256"),
            ("donutBalance", "uint256"),
        ],
    )])
}

pub fn auction_multicall_abi() -> Value {
    json!([tuple_view(
        "getAuction",
        &[("account", "address")],
        &[
            ("epochId", "uint16"),
            ("initPrice", "uint192"),
            ("startTime", "uint40"),
            ("paymentToken", "address"),
            ("price", "uint256"),
            ("paymentTokenPrice", "uint256"),
            ("wethAccumulated", "uint256"),
            ("wethBalance", "uint256"),
            ("paymentTokenBalance", "uint256"),
        ],
    )])
}

pub fn miner_slot_abi() -> Value {
    json!([tuple_view(
        "getSlot0",
        &[],
        &[
            ("locked", "uint8"),
            ("epochId", "uint16"),
            ("initPrice", "uint192"),
            ("startTime", "uint40"),
            ("dps", "uint256"),
            ("miner", "address"),
            ("uri", "string"),
        ],
    )])
}

pub fn takeover_abi() -> Value {
    json!([
        {
            "type": "function",
            "name": "getPrice",
            "stateMutability": "view",
            "inputs": [],
            "outputs": params(&[("", "uint256")]),
        },
        tuple_view(
            "getSlot0",
            &[],
            &[
                ("locked", "uint8"),
                ("epochId", "uint16"),
                ("initPrice", "uint192"),
                ("startTime", "uint40"),
                ("owner", "address"),
                ("uri", "string"),
            ],
        ),
    ])
}

/// ABI of `mine`, as handed to wallets alongside the calldata.
pub fn mine_abi() -> Value {
    json!([{
        "type": "function",
        "name": "mine",
        "stateMutability": "payable",
        "inputs": params(&[
            ("miner", "address"),
            ("provider", "address"),
            ("epochId", "uint256"),
            ("deadline", "uint256"),
            ("maxPrice", "uint256"),
            ("uri", "string"),
        ]),
        "outputs": params(&[("price", "uint256")]),
    }])
}

/// ABI of ERC-20 `transfer`, as handed to wallets alongside the calldata.
pub fn transfer_abi() -> Value {
    json!([{
        "type": "function",
        "name": "transfer",
        "stateMutability": "nonpayable",
        "inputs": params(&[("to", "address"), ("amount", "uint256")]),
        "outputs": params(&[("", "bool")]),
    }])
}

pub fn load_abi(value: Value) -> Result<Abi> {
    serde_json::from_value(value).map_err(|e| AppError::Internal(format!("Invalid contract ABI: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::ParamType;

    #[test]
    fn multicall_abi_decodes_tuple_output() {
        let abi = load_abi(miner_multicall_abi()).unwrap();
        let function = abi.function("getMiner").unwrap();
        assert_eq!(function.inputs.len(), 1);
        match &function.outputs[0].kind {
            ParamType::Tuple(components) => {
                assert_eq!(components.len(), 11);
                assert_eq!(components[8], ParamType::String);
            }
            other => panic!("unexpected output kind {:?}", other),
        }
    }

    #[test]
    fn all_runtime_abis_parse() {
        assert!(load_abi(auction_multicall_abi()).unwrap().function("getAuction").is_ok());
        assert!(load_abi(miner_slot_abi()).unwrap().function("getSlot0").is_ok());
        let takeover = load_abi(takeover_abi()).unwrap();
        assert!(takeover.function("getPrice").is_ok());
        assert!(takeover.function("getSlot0").is_ok());
        assert!(load_abi(mine_abi()).unwrap().function("mine").is_ok());
        assert!(load_abi(transfer_abi()).unwrap().function("transfer").is_ok());
    }
}
