//! DexScreener API client
//!
//! API documentation: https://docs.dexscreener.com/api/reference
//!
//! Endpoints used by the discovery pipeline:
//! 1. /latest/dex/search?q={query} - search pairs
//! 2. /latest/dex/pairs/{chainId}/{pairId} - single pair lookup
//! 3. /token-pairs/v1/{chainId}/{tokenAddress} - all pools for a token
//! 4. /tokens/v1/{chainId}/{tokenAddresses} - pools for up to 30 tokens (batch)
//! 5. /token-profiles/latest/v1 - latest token profiles
//! 6. /token-boosts/latest/v1 - latest boosted tokens
//! 7. /token-boosts/top/v1 - top boosted tokens
//!
//! Every call funnels through one rate-limit gate owned by this instance,
//! and transient failures are retried with exponential backoff.
use crate::api::client::{RateLimiter, RetryPolicy};
use crate::api::types::{PairLookupResponse, RawPair, SearchResponse, TokenBoost, TokenProfile};
use crate::config::DexScreenerConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEXSCREENER_BASE_URL: &str = "https://api.dexscreener.com";

/// The single chain this tracker follows
pub const CHAIN_ID: &str = "solana";

/// Maximum tokens per batch request (upstream limit)
pub const MAX_TOKENS_PER_REQUEST: usize = 30;

pub struct DexScreenerClient {
    client: Client,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl DexScreenerClient {
    pub fn new(config: &DexScreenerConfig) -> Result<Self, ApiError> {
        if config.timeout_seconds == 0 {
            return Err(ApiError::InvalidRequest(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(config.min_interval_ms),
            retry: RetryPolicy::new(config.max_retries),
        })
    }

    /// One paced, unretried request; the retry policy wraps this
    async fn fetch_json<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let _guard = self.limiter.acquire().await?;

        let url = format!("{}/{}", DEXSCREENER_BASE_URL, endpoint);
        let mut builder = self.client.get(&url).header("Accept", "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        logger::debug(LogTag::Api, &format!("GET {}", endpoint));
        self.retry.run(|| self.fetch_json(endpoint, query)).await
    }

    /// Search pairs by free-text query
    pub async fn search(&self, query: &str) -> Result<Vec<RawPair>, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::InvalidRequest("query cannot be empty".to_string()));
        }

        let data: SearchResponse = self
            .get_json("latest/dex/search", &[("q", query)])
            .await?;

        Ok(data.pairs.unwrap_or_default())
    }

    /// Look up a single pair by pool address. A miss is Ok(None), not an error.
    pub async fn get_pair(&self, pair_address: &str) -> Result<Option<RawPair>, ApiError> {
        let endpoint = format!("latest/dex/pairs/{}/{}", CHAIN_ID, pair_address);

        match self.get_json::<PairLookupResponse>(&endpoint, &[]).await {
            Ok(data) => {
                let pair = data
                    .pair
                    .or_else(|| data.pairs.and_then(|ps| ps.into_iter().next()));
                Ok(pair)
            }
            Err(ApiError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// All pools for a single token
    pub async fn token_pairs(&self, token_address: &str) -> Result<Vec<RawPair>, ApiError> {
        let endpoint = format!("token-pairs/v1/{}/{}", CHAIN_ID, token_address);
        self.get_json(&endpoint, &[]).await
    }

    /// Best pool per token for up to 30 tokens in one call
    pub async fn tokens_batch(&self, addresses: &[String]) -> Result<Vec<RawPair>, ApiError> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }
        if addresses.len() > MAX_TOKENS_PER_REQUEST {
            return Err(ApiError::InvalidRequest(format!(
                "too many addresses: {} (max {})",
                addresses.len(),
                MAX_TOKENS_PER_REQUEST
            )));
        }

        let endpoint = format!("tokens/v1/{}/{}", CHAIN_ID, addresses.join(","));
        self.get_json(&endpoint, &[]).await
    }

    /// Latest token profiles (newest listings)
    pub async fn latest_token_profiles(&self) -> Result<Vec<TokenProfile>, ApiError> {
        self.get_json("token-profiles/latest/v1", &[]).await
    }

    /// Latest boosted tokens (newest promotions)
    pub async fn latest_boosts(&self) -> Result<Vec<TokenBoost>, ApiError> {
        self.get_json("token-boosts/latest/v1", &[]).await
    }

    /// Top boosted tokens (most promoted)
    pub async fn top_boosts(&self) -> Result<Vec<TokenBoost>, ApiError> {
        self.get_json("token-boosts/top/v1", &[]).await
    }
}
