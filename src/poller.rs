//! Fixed-interval discovery pipeline driver
//!
//! Each tick runs discover -> filter -> upsert -> prune. Tick errors are
//! logged and never stop the schedule. The interval is fixed-rate: a tick
//! that would overlap a still-running one is skipped, so ticks never pile
//! up behind a slow cycle.
use crate::api::DexScreenerClient;
use crate::db::Database;
use crate::discovery::DiscoveryAggregator;
use crate::filter;
use crate::global;
use crate::logger::{self, LogTag};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Clone)]
pub struct Poller {
    api: Arc<DexScreenerClient>,
    db: Database,
    interval: Duration,
    prune_max_age_hours: i64,
    running: Arc<AtomicBool>,
    // bumped on every start; a loop from an earlier start sees a stale
    // generation at its next wakeup and exits instead of racing the new one
    generation: Arc<AtomicU64>,
}

impl Poller {
    pub fn new(
        api: Arc<DexScreenerClient>,
        db: Database,
        interval_seconds: u64,
        prune_max_age_hours: i64,
    ) -> Self {
        Self {
            api,
            db,
            interval: Duration::from_secs(interval_seconds.max(1)),
            prune_max_age_hours,
            running: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start the schedule. A start while already running is a no-op.
    /// The first tick fires immediately.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            logger::warn(LogTag::Poller, "Start requested while already running");
            return;
        }
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let poller = self.clone();
        tokio::spawn(async move {
            logger::info(
                LogTag::Poller,
                &format!("Polling every {}s", poller.interval.as_secs()),
            );

            let mut ticker = tokio::time::interval(poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if poller.generation.load(Ordering::SeqCst) != my_generation
                    || !poller.running.load(Ordering::SeqCst)
                    || global::is_shutdown()
                {
                    break;
                }
                if let Err(e) = poller.run_cycle().await {
                    logger::error(LogTag::Poller, &format!("Poll cycle failed: {}", e));
                }
            }

            logger::info(LogTag::Poller, "Polling stopped");
        });
    }

    /// Prevent future ticks; an in-flight tick finishes on its own
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// One discover -> filter -> store -> prune cycle
    pub async fn run_cycle(&self) -> Result<()> {
        let aggregator = DiscoveryAggregator::new(self.api.clone());
        let candidates = aggregator.discover().await;

        let (launches, stats) = filter::filter_pairs(candidates);
        logger::info(LogTag::Filtering, &stats.summary());

        let stored = self.db.upsert_launches(&launches)?;
        let pruned = self.db.prune_launches(self.prune_max_age_hours)?;
        logger::info(
            LogTag::Poller,
            &format!("Cycle done: {} launches stored, {} pruned", stored, pruned),
        );

        Ok(())
    }
}
