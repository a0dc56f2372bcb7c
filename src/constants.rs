/// Application constants

// Contract addresses (Base mainnet)
pub const DEFAULT_MULTICALL_ADDRESS: &str = "0x88e52940E62E150619cAa54b1bc51b1103a2EA9F";
pub const DEFAULT_MINER_ADDRESS: &str = "0x3EE441030984ACfeCf17FDa6953bea00a8c53Fa7";
pub const DEFAULT_PROVIDER_ADDRESS: &str = "0x96f71F5ef424D560C9df490B453802C24D2Cd705";
pub const DEFAULT_AUCTION_MULTICALL_ADDRESS: &str = "0x3eE553912ba4262Ddd955DD5F910bA0844B16278";
pub const DEFAULT_TAKEOVER_CONTRACT_ADDRESS: &str = "0x9c751e6825edaa55007160b99933846f6eceec9b";
pub const DEFAULT_USDC_ADDRESS: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

// Chain
pub const DEFAULT_CHAIN_ID: u64 = 8453; // Base mainnet
pub const ETHER_DECIMALS: u32 = 18;
pub const USDC_DECIMALS: u32 = 6;

// Transaction builder
pub const MINE_DEADLINE_SECS: u64 = 300;
pub const MAX_PRICE_NUMERATOR: u64 = 110; // 10% slippage bound
pub const MAX_PRICE_DENOMINATOR: u64 = 100;
pub const DEFAULT_ENTRY_FEE_USDC_UNITS: u64 = 1_000_000; // 1.00 USDC

// Transaction poller
pub const DEFAULT_TX_WAIT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TX_POLL_INTERVAL_MS: u64 = 1_000;

// Paid flag
pub const PAID_KEY_PREFIX: &str = "paid";

// Frames
pub const FRAME_VERSION: &str = "vNext";
pub const DEFAULT_START_IMAGE_URL: &str = "https://i.imgur.com/IsUWL7j.png";
pub const DEFAULT_SUCCESS_IMAGE_URL: &str = "https://i.imgur.com/IsUWL7j.png";
pub const DEFAULT_FAILED_IMAGE_URL: &str = "https://i.imgur.com/failed.png";

// Neynar
pub const DEFAULT_NEYNAR_API_URL: &str = "https://api.neynar.com";
pub const NEYNAR_TIMEOUT_SECS: u64 = 8;
