//! Launch table: upsert-merge, windowed multi-sort queries, trending
//! ranking and pruning.
use crate::db::models::{Launch, SortBy};
use crate::db::{parse_ts, Database};
use anyhow::Result;
use chrono::{Duration, Utc};
use rusqlite::{params, OptionalExtension, Row};

const LAUNCH_COLUMNS: &str = "pair_address, token_address, name, symbol, dex_id, \
     price_usd, market_cap, volume_24h, liquidity_usd, price_change_24h, \
     pair_created_at, dex_url, last_updated";

const UPSERT_SQL: &str = "INSERT INTO launches (pair_address, token_address, name, symbol, dex_id, \
     price_usd, market_cap, volume_24h, liquidity_usd, price_change_24h, \
     pair_created_at, dex_url, last_updated) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) \
     ON CONFLICT(pair_address) DO UPDATE SET \
        price_usd = excluded.price_usd, \
        market_cap = excluded.market_cap, \
        volume_24h = excluded.volume_24h, \
        liquidity_usd = excluded.liquidity_usd, \
        price_change_24h = excluded.price_change_24h, \
        last_updated = excluded.last_updated";

fn launch_from_row(row: &Row) -> rusqlite::Result<Launch> {
    let created: String = row.get(10)?;
    let updated: String = row.get(12)?;
    Ok(Launch {
        pair_address: row.get(0)?,
        token_address: row.get(1)?,
        name: row.get(2)?,
        symbol: row.get(3)?,
        dex_id: row.get(4)?,
        price_usd: row.get(5)?,
        market_cap: row.get(6)?,
        volume_24h: row.get(7)?,
        liquidity_usd: row.get(8)?,
        price_change_24h: row.get(9)?,
        pair_created_at: parse_ts(&created, 10)?,
        dex_url: row.get(11)?,
        last_updated: parse_ts(&updated, 12)?,
    })
}

impl Database {
    /// Insert or merge a single launch. On conflict only the mutable market
    /// fields and last_updated are overwritten; identity fields and
    /// pair_created_at keep their first-insert values.
    pub fn upsert_launch(&self, launch: &Launch) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            UPSERT_SQL,
            params![
                launch.pair_address,
                launch.token_address,
                launch.name,
                launch.symbol,
                launch.dex_id,
                launch.price_usd,
                launch.market_cap,
                launch.volume_24h,
                launch.liquidity_usd,
                launch.price_change_24h,
                launch.pair_created_at.to_rfc3339(),
                launch.dex_url,
                launch.last_updated.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Batched upsert applied atomically inside one transaction
    pub fn upsert_launches(&self, launches: &[Launch]) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for launch in launches {
            tx.execute(
                UPSERT_SQL,
                params![
                    launch.pair_address,
                    launch.token_address,
                    launch.name,
                    launch.symbol,
                    launch.dex_id,
                    launch.price_usd,
                    launch.market_cap,
                    launch.volume_24h,
                    launch.liquidity_usd,
                    launch.price_change_24h,
                    launch.pair_created_at.to_rfc3339(),
                    launch.dex_url,
                    launch.last_updated.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(launches.len())
    }

    /// Launches created inside the timeframe, sorted descending by the
    /// requested column. Zero-valued (missing upstream) fields sort last.
    pub fn query_launches(
        &self,
        timeframe_hours: i64,
        sort_by: SortBy,
        limit: usize,
    ) -> Result<Vec<Launch>> {
        let cutoff = (Utc::now() - Duration::hours(timeframe_hours)).to_rfc3339();
        let sql = format!(
            "SELECT {} FROM launches WHERE pair_created_at >= ?1 ORDER BY {} DESC LIMIT ?2",
            LAUNCH_COLUMNS,
            sort_by.column()
        );

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![cutoff, limit as i64], launch_from_row)?;

        let mut launches = Vec::new();
        for row in rows {
            launches.push(row?);
        }
        Ok(launches)
    }

    /// Launches from the last 24h with positive volume and liquidity,
    /// ranked by volume weighted by price momentum. A -100% 24h change
    /// zeroes the score, pushing collapsed tokens to the bottom.
    pub fn trending_launches(&self, limit: usize) -> Result<Vec<Launch>> {
        let cutoff = (Utc::now() - Duration::hours(24)).to_rfc3339();
        let sql = format!(
            "SELECT {} FROM launches \
             WHERE pair_created_at >= ?1 AND volume_24h > 0 AND liquidity_usd > 0 \
             ORDER BY volume_24h * ABS(price_change_24h / 100.0 + 1.0) DESC LIMIT ?2",
            LAUNCH_COLUMNS
        );

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![cutoff, limit as i64], launch_from_row)?;

        let mut launches = Vec::new();
        for row in rows {
            launches.push(row?);
        }
        Ok(launches)
    }

    /// The highest-volume pool for a token, if the token has been observed
    pub fn get_launch_by_token(&self, token_address: &str) -> Result<Option<Launch>> {
        let sql = format!(
            "SELECT {} FROM launches WHERE token_address = ?1 \
             ORDER BY volume_24h DESC LIMIT 1",
            LAUNCH_COLUMNS
        );

        let conn = self.conn.lock().unwrap();
        let launch = conn
            .query_row(&sql, params![token_address], launch_from_row)
            .optional()?;
        Ok(launch)
    }

    /// Delete launches older than the cutoff; returns the removed count
    pub fn prune_launches(&self, max_age_hours: i64) -> Result<usize> {
        let cutoff = (Utc::now() - Duration::hours(max_age_hours)).to_rfc3339();
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM launches WHERE pair_created_at < ?1",
            params![cutoff],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_launch(pair: &str, token: &str, age: Duration, volume: f64) -> Launch {
        Launch {
            pair_address: pair.to_string(),
            token_address: token.to_string(),
            name: "Test Token".to_string(),
            symbol: "TEST".to_string(),
            dex_id: "raydium".to_string(),
            price_usd: 0.001,
            market_cap: 150_000.0,
            volume_24h: volume,
            liquidity_usd: 20_000.0,
            price_change_24h: 12.5,
            pair_created_at: Utc::now() - age,
            dex_url: "https://dexscreener.com/solana/test".to_string(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn upsert_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let launch = sample_launch("PoolA", "TokA", Duration::hours(1), 9_000.0);

        db.upsert_launch(&launch).unwrap();
        db.upsert_launch(&launch).unwrap();

        let stored = db.query_launches(24, SortBy::Volume, 10).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].volume_24h, 9_000.0);
        assert_eq!(
            stored[0].pair_created_at.timestamp(),
            launch.pair_created_at.timestamp()
        );
    }

    #[test]
    fn merge_updates_market_fields_but_never_identity() {
        let db = Database::open_in_memory().unwrap();
        let first = sample_launch("PoolA", "TokA", Duration::hours(2), 9_000.0);
        db.upsert_launch(&first).unwrap();

        let mut second = sample_launch("PoolA", "TokOther", Duration::hours(50), 42_000.0);
        second.name = "Renamed".to_string();
        second.symbol = "REN".to_string();
        db.upsert_launch(&second).unwrap();

        let stored = db.get_launch_by_token("TokA").unwrap().unwrap();
        assert_eq!(stored.volume_24h, 42_000.0);
        assert_eq!(stored.name, "Test Token");
        assert_eq!(stored.symbol, "TEST");
        assert_eq!(stored.token_address, "TokA");
        // creation time kept from first insert
        assert_eq!(
            stored.pair_created_at.timestamp(),
            first.pair_created_at.timestamp()
        );
    }

    #[test]
    fn batched_upsert_stores_every_launch() {
        let db = Database::open_in_memory().unwrap();
        let launches: Vec<Launch> = (0..5)
            .map(|i| {
                sample_launch(
                    &format!("Pool{}", i),
                    &format!("Tok{}", i),
                    Duration::hours(1),
                    1_000.0 * (i + 1) as f64,
                )
            })
            .collect();

        let count = db.upsert_launches(&launches).unwrap();
        assert_eq!(count, 5);
        assert_eq!(db.query_launches(24, SortBy::Volume, 10).unwrap().len(), 5);
    }

    #[test]
    fn timeframe_query_honours_window_and_sort() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_launch(&sample_launch("P1", "T1", Duration::minutes(10), 100.0))
            .unwrap();
        db.upsert_launch(&sample_launch("P2", "T2", Duration::hours(2), 900.0))
            .unwrap();
        db.upsert_launch(&sample_launch("P3", "T3", Duration::hours(10), 500.0))
            .unwrap();
        db.upsert_launch(&sample_launch("P4", "T4", Duration::hours(30), 700.0))
            .unwrap();

        let recent = db.query_launches(6, SortBy::Volume, 10).unwrap();
        let pairs: Vec<&str> = recent.iter().map(|l| l.pair_address.as_str()).collect();
        assert_eq!(pairs, vec!["P2", "P1"]);
    }

    #[test]
    fn query_respects_limit() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..10 {
            db.upsert_launch(&sample_launch(
                &format!("P{}", i),
                &format!("T{}", i),
                Duration::hours(1),
                100.0 * i as f64,
            ))
            .unwrap();
        }

        assert_eq!(db.query_launches(24, SortBy::Volume, 3).unwrap().len(), 3);
    }

    #[test]
    fn trending_rewards_volume_and_momentum() {
        let db = Database::open_in_memory().unwrap();

        let mut big_pump = sample_launch("P1", "T1", Duration::hours(3), 10_000.0);
        big_pump.price_change_24h = 100.0; // score 20_000
        let mut flat = sample_launch("P2", "T2", Duration::hours(3), 15_000.0);
        flat.price_change_24h = 0.0; // score 15_000
        let mut collapsed = sample_launch("P3", "T3", Duration::hours(3), 50_000.0);
        collapsed.price_change_24h = -100.0; // score 0

        db.upsert_launches(&[big_pump, flat, collapsed]).unwrap();

        let trending = db.trending_launches(10).unwrap();
        let pairs: Vec<&str> = trending.iter().map(|l| l.pair_address.as_str()).collect();
        assert_eq!(pairs, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn trending_excludes_zero_volume_or_liquidity() {
        let db = Database::open_in_memory().unwrap();

        let mut no_volume = sample_launch("P1", "T1", Duration::hours(1), 0.0);
        no_volume.liquidity_usd = 10_000.0;
        let mut no_liquidity = sample_launch("P2", "T2", Duration::hours(1), 5_000.0);
        no_liquidity.liquidity_usd = 0.0;
        let ok = sample_launch("P3", "T3", Duration::hours(1), 5_000.0);

        db.upsert_launches(&[no_volume, no_liquidity, ok]).unwrap();

        let trending = db.trending_launches(10).unwrap();
        assert_eq!(trending.len(), 1);
        assert_eq!(trending[0].pair_address, "P3");
    }

    #[test]
    fn get_by_token_picks_highest_volume_pool() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_launch(&sample_launch("P1", "TokA", Duration::hours(1), 1_000.0))
            .unwrap();
        db.upsert_launch(&sample_launch("P2", "TokA", Duration::hours(1), 8_000.0))
            .unwrap();
        db.upsert_launch(&sample_launch("P3", "TokB", Duration::hours(1), 99_000.0))
            .unwrap();

        let best = db.get_launch_by_token("TokA").unwrap().unwrap();
        assert_eq!(best.pair_address, "P2");
        assert!(db.get_launch_by_token("TokZ").unwrap().is_none());
    }

    #[test]
    fn pruned_launches_disappear_from_queries() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_launch(&sample_launch("P1", "T1", Duration::hours(60), 1_000.0))
            .unwrap();
        db.upsert_launch(&sample_launch("P2", "T2", Duration::hours(2), 1_000.0))
            .unwrap();

        let removed = db.prune_launches(48).unwrap();
        assert_eq!(removed, 1);

        let remaining = db.query_launches(24 * 30, SortBy::Newest, 10).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].pair_address, "P2");
        assert!(db.get_launch_by_token("T1").unwrap().is_none());
    }
}
