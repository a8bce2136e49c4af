//! Launch classification
//!
//! An ordered rejection pipeline separates genuine new launches from noise.
//! A candidate failing any rule is dropped; survivors are normalized into
//! stored launches. Rules run cheapest-first.
use crate::api::types::RawPair;
use crate::db::models::Launch;
use crate::logger::{self, LogTag};
use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Pools younger than this tend to fail right after creation
const MIN_AGE_MINUTES: i64 = 30;

/// Older than this is an established token, not a launch
const MAX_AGE_HOURS: i64 = 7 * 24;

const MIN_LIQUIDITY_USD: f64 = 1_000.0;
const MIN_VOLUME_24H_USD: f64 = 5_000.0;
const MAX_MARKET_CAP_USD: f64 = 50_000_000.0;

/// Wrapped assets, stablecoins and major-cap tickers; matched
/// case-insensitively against the base token symbol.
const SYMBOL_BLOCKLIST: &[&str] = &[
    "SOL", "WSOL", "USDC", "USDT", "WBTC", "WETH", "BTC", "ETH", "STSOL", "MSOL", "JITOSOL",
    "BSOL", "DAI", "BUSD", "USDH", "UXD", "PAI",
];

/// Name shapes that mark wrapped/bridged assets and stablecoins
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^wrapped\b",
        r"(?i)^bridged\b",
        r"(?i)usd coin",
        r"(?i)^tether\b",
        r"(?i)^w(btc|eth|sol|bnb)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    MissingNameOrSymbol,
    BlocklistedSymbol,
    BlocklistedName,
    MissingCreatedAt,
    TooYoung,
    TooOld,
    LowLiquidity,
    LowVolume,
    CapTooHigh,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingNameOrSymbol => "missing_name_or_symbol",
            RejectReason::BlocklistedSymbol => "blocklisted_symbol",
            RejectReason::BlocklistedName => "blocklisted_name",
            RejectReason::MissingCreatedAt => "missing_created_at",
            RejectReason::TooYoung => "too_young",
            RejectReason::TooOld => "too_old",
            RejectReason::LowLiquidity => "low_liquidity",
            RejectReason::LowVolume => "low_volume",
            RejectReason::CapTooHigh => "cap_too_high",
        }
    }
}

/// Per-batch filter counters, logged once per poll cycle
#[derive(Debug, Default)]
pub struct FilterStats {
    pub processed: usize,
    pub passed: usize,
    pub rejections: HashMap<RejectReason, usize>,
}

impl FilterStats {
    pub fn record_rejection(&mut self, reason: RejectReason) {
        *self.rejections.entry(reason).or_insert(0) += 1;
    }

    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .rejections
            .iter()
            .map(|(reason, count)| format!("{}={}", reason.as_str(), count))
            .collect();
        parts.sort();
        format!(
            "{} processed, {} passed, rejected: [{}]",
            self.processed,
            self.passed,
            parts.join(", ")
        )
    }
}

/// Apply the rejection pipeline to one candidate. `None` means it passed.
pub fn evaluate(pair: &RawPair, now: DateTime<Utc>) -> Option<RejectReason> {
    let name = pair.base_token.name.as_deref().unwrap_or("").trim();
    let symbol = pair.base_token.symbol.as_deref().unwrap_or("").trim();
    if name.is_empty() || symbol.is_empty() {
        return Some(RejectReason::MissingNameOrSymbol);
    }

    let symbol_upper = symbol.to_uppercase();
    if SYMBOL_BLOCKLIST.contains(&symbol_upper.as_str()) {
        return Some(RejectReason::BlocklistedSymbol);
    }

    if NAME_PATTERNS.iter().any(|re| re.is_match(name)) {
        return Some(RejectReason::BlocklistedName);
    }

    let created_at = match pair.pair_created_at.and_then(ms_to_datetime) {
        Some(ts) => ts,
        None => return Some(RejectReason::MissingCreatedAt),
    };

    // full-precision comparison; integer minutes/hours would truncate
    // partial units and let e.g. a 168h30m pool slip under the ceiling
    let age = now.signed_duration_since(created_at);
    if age < Duration::minutes(MIN_AGE_MINUTES) {
        return Some(RejectReason::TooYoung);
    }
    if age > Duration::hours(MAX_AGE_HOURS) {
        return Some(RejectReason::TooOld);
    }

    let liquidity = pair.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0);
    if liquidity < MIN_LIQUIDITY_USD {
        return Some(RejectReason::LowLiquidity);
    }

    let volume = pair.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0);
    if volume < MIN_VOLUME_24H_USD {
        return Some(RejectReason::LowVolume);
    }

    let cap = pair.market_cap.or(pair.fdv).unwrap_or(0.0);
    if cap > MAX_MARKET_CAP_USD {
        return Some(RejectReason::CapTooHigh);
    }

    None
}

/// Turn a surviving candidate into a stored launch. Missing numerics
/// default to zero; prices arrive as text and are parsed here.
pub fn normalize(pair: &RawPair, now: DateTime<Utc>) -> Launch {
    let created_at = pair
        .pair_created_at
        .and_then(ms_to_datetime)
        .unwrap_or(now);

    Launch {
        pair_address: pair.pair_address.clone(),
        token_address: pair.base_token.address.clone(),
        name: pair.base_token.name.clone().unwrap_or_default(),
        symbol: pair.base_token.symbol.clone().unwrap_or_default(),
        dex_id: pair.dex_id.clone().unwrap_or_default(),
        price_usd: pair
            .price_usd
            .as_deref()
            .and_then(|p| p.parse::<f64>().ok())
            .unwrap_or(0.0),
        market_cap: pair.market_cap.or(pair.fdv).unwrap_or(0.0),
        volume_24h: pair.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0),
        liquidity_usd: pair.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0),
        price_change_24h: pair
            .price_change
            .as_ref()
            .and_then(|c| c.h24)
            .unwrap_or(0.0),
        pair_created_at: created_at,
        dex_url: pair.url.clone().unwrap_or_default(),
        last_updated: now,
    }
}

/// Run the pipeline over one discovery batch
pub fn filter_pairs(pairs: Vec<RawPair>) -> (Vec<Launch>, FilterStats) {
    let now = Utc::now();
    let mut stats = FilterStats::default();
    let mut launches = Vec::new();

    for pair in &pairs {
        stats.processed += 1;
        match evaluate(pair, now) {
            None => {
                stats.passed += 1;
                launches.push(normalize(pair, now));
            }
            Some(reason) => {
                stats.record_rejection(reason);
                logger::debug(
                    LogTag::Filtering,
                    &format!("Rejected {} ({})", pair.pair_address, reason.as_str()),
                );
            }
        }
    }

    (launches, stats)
}

fn ms_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{LiquidityInfo, PriceChangeStats, RawToken, VolumeStats};
    use chrono::Duration;

    fn candidate(name: &str, symbol: &str, age: Duration) -> RawPair {
        let now = Utc::now();
        RawPair {
            chain_id: "solana".to_string(),
            dex_id: Some("raydium".to_string()),
            url: Some("https://dexscreener.com/solana/pool".to_string()),
            pair_address: "Pool".to_string(),
            base_token: RawToken {
                address: "Tok".to_string(),
                name: Some(name.to_string()),
                symbol: Some(symbol.to_string()),
            },
            quote_token: None,
            price_usd: Some("0.0042".to_string()),
            volume: Some(VolumeStats {
                h24: Some(25_000.0),
                h6: None,
                h1: None,
                m5: None,
            }),
            price_change: Some(PriceChangeStats {
                h24: Some(35.0),
                h6: None,
                h1: None,
                m5: None,
            }),
            liquidity: Some(LiquidityInfo {
                usd: Some(40_000.0),
                base: None,
                quote: None,
            }),
            market_cap: Some(500_000.0),
            fdv: Some(600_000.0),
            pair_created_at: Some((now - age).timestamp_millis()),
            info: None,
        }
    }

    #[test]
    fn healthy_candidate_passes() {
        let pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        assert_eq!(evaluate(&pair, Utc::now()), None);
    }

    #[test]
    fn missing_name_or_symbol_rejects() {
        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.base_token.name = None;
        assert_eq!(
            evaluate(&pair, Utc::now()),
            Some(RejectReason::MissingNameOrSymbol)
        );

        let mut pair = candidate("Moon Cat", "  ", Duration::hours(5));
        pair.base_token.symbol = Some("  ".to_string());
        assert_eq!(
            evaluate(&pair, Utc::now()),
            Some(RejectReason::MissingNameOrSymbol)
        );
    }

    #[test]
    fn blocklisted_symbols_reject_case_insensitively() {
        for symbol in ["USDC", "usdc", "wSoL"] {
            let pair = candidate("Some Token", symbol, Duration::hours(5));
            assert_eq!(
                evaluate(&pair, Utc::now()),
                Some(RejectReason::BlocklistedSymbol),
                "symbol {} should be blocked",
                symbol
            );
        }
    }

    #[test]
    fn wrapped_and_stablecoin_names_reject() {
        for name in ["Wrapped Bitcoin", "bridged USDT", "USD Coin", "Tether USD", "WETH Pool"] {
            let pair = candidate(name, "MCAT", Duration::hours(5));
            assert_eq!(
                evaluate(&pair, Utc::now()),
                Some(RejectReason::BlocklistedName),
                "name {} should be blocked",
                name
            );
        }
        // substring hits inside a word do not count
        let pair = candidate("Unwrapped Fun", "MCAT", Duration::hours(5));
        assert_eq!(evaluate(&pair, Utc::now()), None);
    }

    #[test]
    fn age_bounds_are_enforced() {
        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.pair_created_at = None;
        assert_eq!(
            evaluate(&pair, Utc::now()),
            Some(RejectReason::MissingCreatedAt)
        );

        let too_young = candidate("Moon Cat", "MCAT", Duration::minutes(10));
        assert_eq!(evaluate(&too_young, Utc::now()), Some(RejectReason::TooYoung));

        let too_old = candidate("Moon Cat", "MCAT", Duration::days(8));
        assert_eq!(evaluate(&too_old, Utc::now()), Some(RejectReason::TooOld));
    }

    #[test]
    fn age_bounds_count_partial_units() {
        // half an hour past the ceiling must reject even though the whole
        // hours match the limit
        let just_over = candidate(
            "Moon Cat",
            "MCAT",
            Duration::hours(MAX_AGE_HOURS) + Duration::minutes(30),
        );
        assert_eq!(evaluate(&just_over, Utc::now()), Some(RejectReason::TooOld));

        let just_under = candidate(
            "Moon Cat",
            "MCAT",
            Duration::hours(MAX_AGE_HOURS) - Duration::minutes(30),
        );
        assert_eq!(evaluate(&just_under, Utc::now()), None);

        let seconds_young = candidate(
            "Moon Cat",
            "MCAT",
            Duration::minutes(MIN_AGE_MINUTES) - Duration::seconds(30),
        );
        assert_eq!(
            evaluate(&seconds_young, Utc::now()),
            Some(RejectReason::TooYoung)
        );
    }

    #[test]
    fn liquidity_floor_rejects_regardless_of_other_fields() {
        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.liquidity = Some(LiquidityInfo {
            usd: Some(500.0),
            base: None,
            quote: None,
        });
        // stellar volume and cap do not recover it
        pair.volume.as_mut().unwrap().h24 = Some(9_000_000.0);
        pair.market_cap = Some(1_000_000.0);
        assert_eq!(
            evaluate(&pair, Utc::now()),
            Some(RejectReason::LowLiquidity)
        );

        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.liquidity = None;
        assert_eq!(
            evaluate(&pair, Utc::now()),
            Some(RejectReason::LowLiquidity)
        );
    }

    #[test]
    fn volume_floor_and_cap_ceiling_reject() {
        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.volume.as_mut().unwrap().h24 = Some(100.0);
        assert_eq!(evaluate(&pair, Utc::now()), Some(RejectReason::LowVolume));

        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.market_cap = Some(90_000_000.0);
        assert_eq!(evaluate(&pair, Utc::now()), Some(RejectReason::CapTooHigh));
    }

    #[test]
    fn fdv_is_the_cap_fallback() {
        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.market_cap = None;
        pair.fdv = Some(90_000_000.0);
        assert_eq!(evaluate(&pair, Utc::now()), Some(RejectReason::CapTooHigh));

        pair.fdv = Some(600_000.0);
        assert_eq!(evaluate(&pair, Utc::now()), None);

        let now = Utc::now();
        let launch = normalize(&pair, now);
        assert_eq!(launch.market_cap, 600_000.0);
    }

    #[test]
    fn normalization_parses_price_and_defaults_missing_numerics() {
        let mut pair = candidate("Moon Cat", "MCAT", Duration::hours(5));
        pair.price_usd = Some("not-a-number".to_string());
        pair.price_change = None;

        let now = Utc::now();
        let launch = normalize(&pair, now);
        assert_eq!(launch.price_usd, 0.0);
        assert_eq!(launch.price_change_24h, 0.0);
        assert_eq!(launch.symbol, "MCAT");
        assert_eq!(launch.last_updated, now);
    }

    #[test]
    fn batch_stats_count_passes_and_rejections() {
        let pairs = vec![
            candidate("Moon Cat", "MCAT", Duration::hours(5)),
            candidate("Wrapped Bitcoin", "XBTC", Duration::hours(5)),
            candidate("Tiny", "TINY", Duration::minutes(5)),
        ];

        let (launches, stats) = filter_pairs(pairs);
        assert_eq!(launches.len(), 1);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.rejections[&RejectReason::BlocklistedName], 1);
        assert_eq!(stats.rejections[&RejectReason::TooYoung], 1);
    }
}
