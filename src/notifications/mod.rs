//! Notification delivery
//!
//! The alert engine talks to a `NotificationSink`; delivery transports are
//! swappable behind it. `Unreachable` means the recipient can never be
//! reached (blocked the bot, deleted the chat) and the alert should stop
//! retrying; `Failed` is transient and leaves the alert armed.
pub mod telegram;

use crate::logger::{self, LogTag};
use async_trait::async_trait;

pub use telegram::TelegramNotifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    /// Terminal for this recipient; do not retry
    Unreachable(String),
    /// Transient delivery failure; retry next tick
    Failed(String),
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, user_id: i64, message: &str) -> NotifyOutcome;
}

/// Console fallback used when no Telegram token is configured
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn notify(&self, user_id: i64, message: &str) -> NotifyOutcome {
        logger::info(
            LogTag::Notify,
            &format!("[user {}] {}", user_id, message),
        );
        NotifyOutcome::Delivered
    }
}
