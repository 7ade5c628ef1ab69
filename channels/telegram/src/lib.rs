use async_trait::async_trait;
use common::HomeworkError;
use poller::ChatSender;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::debug;

/// Delivers notifications through the Telegram Bot API.
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

/// Numeric ids (including negative group ids) map to `ChatId`; anything
/// else is treated as a public channel username such as `@my_channel`.
pub fn recipient(chat_id: &str) -> Recipient {
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[async_trait]
impl ChatSender for TelegramSender {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), HomeworkError> {
        self.bot
            .send_message(recipient(chat_id), text)
            .await
            .map_err(|e| HomeworkError::Delivery(e.to_string()))?;

        debug!(chat_id, "Telegram accepted the message");
        Ok(())
    }
}
