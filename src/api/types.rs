//! Raw DexScreener wire types
//!
//! Field names follow the API's camelCase JSON. Prices arrive as strings,
//! timestamps as millisecond epochs; normalization into stored launches
//! happens in the filter, not here.
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPair {
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub pair_address: String,
    pub base_token: RawToken,
    #[serde(default)]
    pub quote_token: Option<RawToken>,
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub volume: Option<VolumeStats>,
    #[serde(default)]
    pub price_change: Option<PriceChangeStats>,
    #[serde(default)]
    pub liquidity: Option<LiquidityInfo>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Fully diluted valuation, fallback when marketCap is absent
    #[serde(default)]
    pub fdv: Option<f64>,
    /// Millisecond epoch; absent for some DEXes
    #[serde(default)]
    pub pair_created_at: Option<i64>,
    #[serde(default)]
    pub info: Option<PairInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawToken {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VolumeStats {
    #[serde(default)]
    pub h24: Option<f64>,
    #[serde(default)]
    pub h6: Option<f64>,
    #[serde(default)]
    pub h1: Option<f64>,
    #[serde(default)]
    pub m5: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceChangeStats {
    #[serde(default)]
    pub h24: Option<f64>,
    #[serde(default)]
    pub h6: Option<f64>,
    #[serde(default)]
    pub h1: Option<f64>,
    #[serde(default)]
    pub m5: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiquidityInfo {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub base: Option<f64>,
    #[serde(default)]
    pub quote: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub websites: Option<Vec<WebsiteInfo>>,
    #[serde(default)]
    pub socials: Option<Vec<SocialInfo>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebsiteInfo {
    #[serde(default)]
    pub label: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialInfo {
    #[serde(rename = "type")]
    pub social_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Entry from /token-profiles/latest/v1
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProfile {
    pub chain_id: String,
    pub token_address: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Entry from /token-boosts/{latest,top}/v1
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBoost {
    pub chain_id: String,
    pub token_address: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

/// Envelope for /latest/dex/pairs/{chain}/{pair}
#[derive(Debug, Clone, Deserialize)]
pub struct PairLookupResponse {
    #[serde(default)]
    pub pair: Option<RawPair>,
    #[serde(default)]
    pub pairs: Option<Vec<RawPair>>,
}

/// Envelope for /latest/dex/search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub pairs: Option<Vec<RawPair>>,
}
