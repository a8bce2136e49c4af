//! Per-user watchlist CRUD
use crate::db::models::WatchlistEntry;
use crate::db::{parse_ts, Database};
use crate::errors::ValidationError;
use anyhow::Result;
use chrono::Utc;
use rusqlite::params;

impl Database {
    /// Add a token to a user's watchlist. Returns false when the entry
    /// already exists (duplicate adds are not an error).
    pub fn add_watch(&self, user_id: i64, token_address: &str) -> Result<bool> {
        if token_address.trim().is_empty() {
            return Err(ValidationError::new("token address cannot be empty").into());
        }

        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO watchlist (user_id, token_address, added_at) \
             VALUES (?1, ?2, ?3)",
            params![user_id, token_address, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    /// Remove a token from a user's watchlist. Returns false on a miss.
    pub fn remove_watch(&self, user_id: i64, token_address: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM watchlist WHERE user_id = ?1 AND token_address = ?2",
            params![user_id, token_address],
        )?;
        Ok(removed > 0)
    }

    /// All watched tokens for a user, oldest first
    pub fn list_watchlist(&self, user_id: i64) -> Result<Vec<WatchlistEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, token_address, added_at FROM watchlist \
             WHERE user_id = ?1 ORDER BY added_at ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let added: String = row.get(2)?;
            Ok(WatchlistEntry {
                user_id: row.get(0)?,
                token_address: row.get(1)?,
                added_at: parse_ts(&added, 2)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
