//! Multi-strategy launch discovery
//!
//! Four strategies fan out against the market API each cycle:
//! 1. latest token profiles  -> batch pool lookup
//! 2. latest boosted tokens  -> batch pool lookup
//! 3. top boosted tokens     -> batch pool lookup
//! 4. keyword searches over common meme terms
//!
//! Each strategy is isolated: one failing endpoint costs its own results
//! only, the cycle still yields whatever the others found. Results are
//! merged and deduplicated by pool address before leaving this module.
use crate::api::dexscreener::{CHAIN_ID, MAX_TOKENS_PER_REQUEST};
use crate::api::types::RawPair;
use crate::api::DexScreenerClient;
use crate::logger::{self, LogTag};
use std::collections::HashSet;
use std::sync::Arc;

/// Search terms that new meme launches cluster around
const HYPE_KEYWORDS: &[&str] = &[
    "pepe", "doge", "cat", "moon", "inu", "baby", "trump", "elon", "wojak", "chad",
];

pub struct DiscoveryAggregator {
    api: Arc<DexScreenerClient>,
}

impl DiscoveryAggregator {
    pub fn new(api: Arc<DexScreenerClient>) -> Self {
        Self { api }
    }

    /// Run all strategies and return the deduplicated union of their pairs.
    /// Never fails as a whole; strategies that error are logged and skipped.
    pub async fn discover(&self) -> Vec<RawPair> {
        let mut collected: Vec<RawPair> = Vec::new();

        match self.from_token_profiles().await {
            Ok(pairs) => {
                logger::debug(
                    LogTag::Discovery,
                    &format!("Token profiles yielded {} pairs", pairs.len()),
                );
                collected.extend(pairs);
            }
            Err(e) => logger::warn(LogTag::Discovery, &format!("Token profiles failed: {}", e)),
        }

        match self.from_latest_boosts().await {
            Ok(pairs) => {
                logger::debug(
                    LogTag::Discovery,
                    &format!("Latest boosts yielded {} pairs", pairs.len()),
                );
                collected.extend(pairs);
            }
            Err(e) => logger::warn(LogTag::Discovery, &format!("Latest boosts failed: {}", e)),
        }

        match self.from_top_boosts().await {
            Ok(pairs) => {
                logger::debug(
                    LogTag::Discovery,
                    &format!("Top boosts yielded {} pairs", pairs.len()),
                );
                collected.extend(pairs);
            }
            Err(e) => logger::warn(LogTag::Discovery, &format!("Top boosts failed: {}", e)),
        }

        collected.extend(self.from_keyword_searches().await);

        let before = collected.len();
        let deduped = dedup_pairs(collected);
        logger::info(
            LogTag::Discovery,
            &format!("Discovered {} unique pairs ({} raw)", deduped.len(), before),
        );
        deduped
    }

    async fn from_token_profiles(&self) -> Result<Vec<RawPair>, crate::errors::ApiError> {
        let profiles = self.api.latest_token_profiles().await?;
        let addresses: Vec<String> = profiles
            .into_iter()
            .filter(|p| p.chain_id == CHAIN_ID)
            .map(|p| p.token_address)
            .collect();
        self.resolve_token_batches(addresses).await
    }

    async fn from_latest_boosts(&self) -> Result<Vec<RawPair>, crate::errors::ApiError> {
        let boosts = self.api.latest_boosts().await?;
        let addresses: Vec<String> = boosts
            .into_iter()
            .filter(|b| b.chain_id == CHAIN_ID)
            .map(|b| b.token_address)
            .collect();
        self.resolve_token_batches(addresses).await
    }

    async fn from_top_boosts(&self) -> Result<Vec<RawPair>, crate::errors::ApiError> {
        let boosts = self.api.top_boosts().await?;
        let addresses: Vec<String> = boosts
            .into_iter()
            .filter(|b| b.chain_id == CHAIN_ID)
            .map(|b| b.token_address)
            .collect();
        self.resolve_token_batches(addresses).await
    }

    /// Each keyword is its own isolated sub-strategy
    async fn from_keyword_searches(&self) -> Vec<RawPair> {
        let mut pairs = Vec::new();
        for keyword in HYPE_KEYWORDS {
            match self.api.search(keyword).await {
                Ok(found) => {
                    logger::debug(
                        LogTag::Discovery,
                        &format!("Search '{}' yielded {} pairs", keyword, found.len()),
                    );
                    pairs.extend(found);
                }
                Err(e) => {
                    logger::warn(
                        LogTag::Discovery,
                        &format!("Search '{}' failed: {}", keyword, e),
                    );
                }
            }
        }
        pairs
    }

    /// Resolve token addresses to their pools, 30 per request
    async fn resolve_token_batches(
        &self,
        addresses: Vec<String>,
    ) -> Result<Vec<RawPair>, crate::errors::ApiError> {
        let mut pairs = Vec::new();
        for chunk in chunked(&addresses, MAX_TOKENS_PER_REQUEST) {
            pairs.extend(self.api.tokens_batch(chunk).await?);
        }
        Ok(pairs)
    }
}

/// Split a slice into chunks of at most `size` entries
fn chunked<T>(items: &[T], size: usize) -> impl Iterator<Item = &[T]> {
    items.chunks(size.max(1))
}

/// Keep the tracked chain only and drop duplicate pools. Pool addresses are
/// compared case-insensitively; the first occurrence wins so strategy order
/// sets precedence.
pub fn dedup_pairs(pairs: Vec<RawPair>) -> Vec<RawPair> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for pair in pairs {
        if pair.chain_id != CHAIN_ID {
            continue;
        }
        if seen.insert(pair.pair_address.to_lowercase()) {
            unique.push(pair);
        }
    }
    unique
}
