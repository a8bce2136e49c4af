//! Periodic alert evaluation
//!
//! Each tick scans every armed alert, compares the latest stored market
//! values against its condition and delivers a notification on match.
//! Triggering is one-shot: a delivered (or undeliverable) alert is marked
//! and never evaluated again. Per-alert failures are isolated.
use crate::db::models::{Alert, ConditionType, Operator};
use crate::db::Database;
use crate::global;
use crate::logger::{self, LogTag};
use crate::notifications::{NotificationSink, NotifyOutcome};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Clone)]
pub struct AlertEngine {
    db: Database,
    sink: Arc<dyn NotificationSink>,
    interval: Duration,
    running: Arc<AtomicBool>,
    // bumped on every start; a loop from an earlier start sees a stale
    // generation at its next wakeup and exits instead of racing the new one
    generation: Arc<AtomicU64>,
}

impl AlertEngine {
    pub fn new(db: Database, sink: Arc<dyn NotificationSink>, interval_seconds: u64) -> Self {
        Self {
            db,
            sink,
            interval: Duration::from_secs(interval_seconds.max(1)),
            running: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start the schedule. A start while already running is a no-op.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            logger::warn(LogTag::Alerts, "Start requested while already running");
            return;
        }
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let engine = self.clone();
        tokio::spawn(async move {
            logger::info(
                LogTag::Alerts,
                &format!("Evaluating alerts every {}s", engine.interval.as_secs()),
            );

            let mut ticker = tokio::time::interval(engine.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if engine.generation.load(Ordering::SeqCst) != my_generation
                    || !engine.running.load(Ordering::SeqCst)
                    || global::is_shutdown()
                {
                    break;
                }
                if let Err(e) = engine.run_cycle().await {
                    logger::error(LogTag::Alerts, &format!("Alert cycle failed: {}", e));
                }
            }

            logger::info(LogTag::Alerts, "Alert evaluation stopped");
        });
    }

    /// Prevent future ticks; an in-flight tick finishes on its own
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Evaluate every armed alert once. One bad alert never blocks the rest.
    pub async fn run_cycle(&self) -> Result<()> {
        let alerts = self.db.active_alerts()?;
        if alerts.is_empty() {
            return Ok(());
        }
        logger::debug(
            LogTag::Alerts,
            &format!("Evaluating {} active alerts", alerts.len()),
        );

        for alert in alerts {
            if let Err(e) = self.evaluate_alert(&alert).await {
                logger::error(
                    LogTag::Alerts,
                    &format!("Alert {} evaluation failed: {}", alert.id, e),
                );
            }
        }
        Ok(())
    }

    async fn evaluate_alert(&self, alert: &Alert) -> Result<()> {
        // token not yet observed is a skip, not an error
        let launch = match self.db.get_launch_by_token(&alert.token_address)? {
            Some(launch) => launch,
            None => return Ok(()),
        };

        let current = match alert.condition_type {
            ConditionType::Price => launch.price_usd,
            ConditionType::Volume => launch.volume_24h,
            ConditionType::MarketCap => launch.market_cap,
        };

        if !condition_met(alert.operator, current, alert.threshold) {
            return Ok(());
        }

        let message = format!(
            "🔔 <b>{}</b> ({})\n{} {} {} hit: current {:.6}\n{}",
            launch.symbol,
            launch.name,
            alert.condition_type.as_str(),
            alert.operator.as_str(),
            alert.threshold,
            current,
            launch.dex_url,
        );

        match self.sink.notify(alert.user_id, &message).await {
            NotifyOutcome::Delivered => {
                self.db.mark_alert_triggered(alert.id)?;
                logger::info(
                    LogTag::Alerts,
                    &format!("Alert {} triggered for user {}", alert.id, alert.user_id),
                );
            }
            NotifyOutcome::Unreachable(reason) => {
                // no point retrying a recipient that blocked delivery
                self.db.mark_alert_triggered(alert.id)?;
                logger::warn(
                    LogTag::Alerts,
                    &format!(
                        "Alert {} recipient unreachable, retired: {}",
                        alert.id, reason
                    ),
                );
            }
            NotifyOutcome::Failed(reason) => {
                logger::warn(
                    LogTag::Alerts,
                    &format!(
                        "Alert {} delivery failed, will retry next tick: {}",
                        alert.id, reason
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Compare a live market value against an alert threshold.
///
/// `=` uses a 1% tolerance band since exact equality against a live value
/// is unreachable; a zero threshold requires exact equality because a
/// zero-width band would match everything.
pub fn condition_met(operator: Operator, current: f64, threshold: f64) -> bool {
    match operator {
        Operator::Above => current > threshold,
        Operator::Below => current < threshold,
        Operator::Equal => {
            if threshold == 0.0 {
                current == 0.0
            } else {
                (current - threshold).abs() <= 0.01 * threshold
            }
        }
    }
}
