//! Alert rule CRUD and the one-shot trigger transition
use crate::db::models::{Alert, ConditionType, Operator};
use crate::db::{parse_ts, Database};
use crate::errors::ValidationError;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};

fn alert_from_row(row: &Row) -> rusqlite::Result<Alert> {
    let condition: String = row.get(3)?;
    let operator: String = row.get(4)?;
    let created: String = row.get(7)?;

    let bad_text = |col: usize, what: &str| {
        rusqlite::Error::FromSqlConversionFailure(
            col,
            rusqlite::types::Type::Text,
            Box::new(ValidationError::new(format!("unknown {}", what))),
        )
    };

    Ok(Alert {
        id: row.get(0)?,
        user_id: row.get(1)?,
        token_address: row.get(2)?,
        condition_type: ConditionType::parse(&condition)
            .ok_or_else(|| bad_text(3, "condition type"))?,
        operator: Operator::parse(&operator).ok_or_else(|| bad_text(4, "operator"))?,
        threshold: row.get(5)?,
        triggered: row.get::<_, i64>(6)? != 0,
        created_at: parse_ts(&created, 7)?,
    })
}

const ALERT_COLUMNS: &str =
    "id, user_id, token_address, condition_type, operator, threshold, triggered, created_at";

impl Database {
    /// Create an armed alert. Thresholds must be finite and non-negative.
    pub fn create_alert(
        &self,
        user_id: i64,
        token_address: &str,
        condition_type: ConditionType,
        operator: Operator,
        threshold: f64,
    ) -> Result<Alert> {
        if token_address.trim().is_empty() {
            return Err(ValidationError::new("token address cannot be empty").into());
        }
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ValidationError::new(format!(
                "threshold must be a non-negative number, got {}",
                threshold
            ))
            .into());
        }

        let created_at = Utc::now();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO alerts (user_id, token_address, condition_type, operator, \
             threshold, triggered, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                user_id,
                token_address,
                condition_type.as_str(),
                operator.as_str(),
                threshold,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Alert {
            id: conn.last_insert_rowid(),
            user_id,
            token_address: token_address.to_string(),
            condition_type,
            operator,
            threshold,
            triggered: false,
            created_at,
        })
    }

    /// Delete an alert owned by the user. Returns false on a miss or when
    /// the alert belongs to someone else.
    pub fn delete_alert(&self, id: i64, user_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM alerts WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    /// All alerts for a user, triggered ones included
    pub fn list_alerts(&self, user_id: i64) -> Result<Vec<Alert>> {
        let sql = format!(
            "SELECT {} FROM alerts WHERE user_id = ?1 ORDER BY id ASC",
            ALERT_COLUMNS
        );
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], alert_from_row)?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?);
        }
        Ok(alerts)
    }

    /// Every armed alert across all users, evaluated each alert cycle
    pub fn active_alerts(&self) -> Result<Vec<Alert>> {
        let sql = format!(
            "SELECT {} FROM alerts WHERE triggered = 0 ORDER BY id ASC",
            ALERT_COLUMNS
        );
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], alert_from_row)?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row?);
        }
        Ok(alerts)
    }

    /// Flip an alert to triggered. The transition is one-way; returns false
    /// when the alert does not exist.
    pub fn mark_alert_triggered(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute("UPDATE alerts SET triggered = 1 WHERE id = ?1", params![id])?;
        Ok(updated > 0)
    }
}
