use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide shutdown flag. Set by the Ctrl-C handler; every background
/// loop checks it between ticks and exits cleanly.
pub static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Startup timestamp, used for uptime reporting
pub static STARTUP_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}
