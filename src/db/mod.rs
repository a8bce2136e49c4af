//! SQLite-backed launch store
//!
//! One connection behind a mutex: writers are serialized per table and
//! readers never observe a torn row. The store exclusively owns all
//! persisted records; other components go through its methods.
pub mod alerts;
pub mod launches;
pub mod models;
pub mod watchlist;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS launches (
                pair_address     TEXT PRIMARY KEY,
                token_address    TEXT NOT NULL,
                name             TEXT NOT NULL,
                symbol           TEXT NOT NULL,
                dex_id           TEXT NOT NULL,
                price_usd        REAL NOT NULL DEFAULT 0,
                market_cap       REAL NOT NULL DEFAULT 0,
                volume_24h       REAL NOT NULL DEFAULT 0,
                liquidity_usd    REAL NOT NULL DEFAULT 0,
                price_change_24h REAL NOT NULL DEFAULT 0,
                pair_created_at  TEXT NOT NULL,
                dex_url          TEXT NOT NULL DEFAULT '',
                last_updated     TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_launches_token ON launches (token_address);
            CREATE INDEX IF NOT EXISTS idx_launches_created ON launches (pair_created_at);

            CREATE TABLE IF NOT EXISTS watchlist (
                user_id       INTEGER NOT NULL,
                token_address TEXT NOT NULL,
                added_at      TEXT NOT NULL,
                PRIMARY KEY (user_id, token_address)
            );

            CREATE TABLE IF NOT EXISTS alerts (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id        INTEGER NOT NULL,
                token_address  TEXT NOT NULL,
                condition_type TEXT NOT NULL,
                operator       TEXT NOT NULL,
                threshold      REAL NOT NULL,
                triggered      INTEGER NOT NULL DEFAULT 0,
                created_at     TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_alerts_active ON alerts (triggered);",
        )
        .context("Failed to initialize database schema")?;
        Ok(())
    }
}

/// RFC3339 text column -> DateTime<Utc>, surfaced as a rusqlite error so row
/// mappers can use it inside query_map closures.
pub(crate) fn parse_ts(value: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
