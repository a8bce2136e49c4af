//! Telegram delivery transport
//!
//! Uses the teloxide crate for the Telegram Bot API. The alert user id is
//! the Telegram chat id, so delivery addresses the alert owner directly.
use crate::logger::{self, LogTag};
use crate::notifications::{NotificationSink, NotifyOutcome};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::requests::Request;
use teloxide::types::{ChatId, ParseMode};
use teloxide::{ApiError, RequestError};

pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    /// Create a notifier from a bot token issued by @BotFather
    pub fn new(bot_token: &str) -> Result<Self, String> {
        if bot_token.is_empty() {
            return Err("Bot token is empty".to_string());
        }

        Ok(Self {
            bot: Bot::new(bot_token),
        })
    }
}

/// Errors that mean this recipient can never be reached again
fn is_unreachable(error: &RequestError) -> bool {
    matches!(
        error,
        RequestError::Api(
            ApiError::BotBlocked
                | ApiError::ChatNotFound
                | ApiError::UserDeactivated
                | ApiError::BotKicked
        )
    )
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn notify(&self, user_id: i64, message: &str) -> NotifyOutcome {
        let result = self
            .bot
            .send_message(ChatId(user_id), message)
            .parse_mode(ParseMode::Html)
            .send()
            .await;

        match result {
            Ok(_) => {
                logger::debug(
                    LogTag::Notify,
                    &format!("Delivered Telegram message to {}", user_id),
                );
                NotifyOutcome::Delivered
            }
            Err(e) if is_unreachable(&e) => {
                logger::warn(
                    LogTag::Notify,
                    &format!("Recipient {} unreachable: {}", user_id, e),
                );
                NotifyOutcome::Unreachable(e.to_string())
            }
            Err(e) => {
                logger::error(
                    LogTag::Notify,
                    &format!("Telegram delivery to {} failed: {}", user_id, e),
                );
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}
