//! Persisted record types and the enums used in queries and alert rules
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pool believed to represent a new token listing, keyed by pool address.
///
/// Identity fields and `pair_created_at` are immutable after first insert;
/// market fields and `last_updated` are overwritten on every observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launch {
    pub pair_address: String,
    /// Not unique - one token may have several pools
    pub token_address: String,
    pub name: String,
    pub symbol: String,
    pub dex_id: String,
    pub price_usd: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub liquidity_usd: f64,
    /// Percentage, -100 .. inf
    pub price_change_24h: f64,
    pub pair_created_at: DateTime<Utc>,
    pub dex_url: String,
    pub last_updated: DateTime<Utc>,
}

/// Sort order for windowed launch queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Volume,
    MarketCap,
    Newest,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "volume" | "vol" => Some(SortBy::Volume),
            "marketcap" | "mcap" | "cap" => Some(SortBy::MarketCap),
            "newest" | "new" | "created" | "age" => Some(SortBy::Newest),
            _ => None,
        }
    }

    /// Column used for ORDER BY ... DESC
    pub(crate) fn column(&self) -> &'static str {
        match self {
            SortBy::Volume => "volume_24h",
            SortBy::MarketCap => "market_cap",
            SortBy::Newest => "pair_created_at",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub user_id: i64,
    pub token_address: String,
    pub added_at: DateTime<Utc>,
}

/// Which launch field an alert compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionType {
    Price,
    Volume,
    MarketCap,
}

impl ConditionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "price" => Some(ConditionType::Price),
            "volume" => Some(ConditionType::Volume),
            "marketcap" | "mcap" => Some(ConditionType::MarketCap),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::Price => "price",
            ConditionType::Volume => "volume",
            ConditionType::MarketCap => "marketCap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Above,
    Below,
    Equal,
}

impl Operator {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ">" => Some(Operator::Above),
            "<" => Some(Operator::Below),
            "=" => Some(Operator::Equal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Above => ">",
            Operator::Below => "<",
            Operator::Equal => "=",
        }
    }
}

/// A one-shot alert rule. `triggered` moves false -> true exactly once and
/// never resets; a triggered alert stays out of the active set forever.
#[derive(Debug, Clone)]
pub struct Alert {
    pub id: i64,
    pub user_id: i64,
    pub token_address: String,
    pub condition_type: ConditionType,
    pub operator: Operator,
    pub threshold: f64,
    pub triggered: bool,
    pub created_at: DateTime<Utc>,
}
