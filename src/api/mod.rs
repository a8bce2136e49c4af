pub mod client;
pub mod dexscreener;
pub mod types;

pub use client::{RateLimitGuard, RateLimiter, RetryPolicy};
pub use dexscreener::DexScreenerClient;
