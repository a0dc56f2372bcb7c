pub mod neynar;

pub use neynar::{FarcasterClient, NeynarClient};
