//! Telegram channel adapter (stub).
//!
//! Implements the Channel trait for the Telegram Bot API. In production this
//! would use `teloxide` for long polling; currently a stub that can
//! receive/send messages via an in-process channel. Suggested-reply
//! keyboards map onto Telegram's one-shot `ReplyKeyboardMarkup`.

use async_trait::async_trait;
use rollcall_core::channel::{Channel, ChannelId, ChannelMessage, Reply};
use rollcall_core::error::ChannelError;
use tokio::sync::mpsc;
use tracing::info;

/// Telegram channel configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub bot_token: String,
    /// Allowed user IDs. Empty = deny all, ["*"] = allow all.
    pub allowed_users: Vec<String>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

/// Telegram channel adapter.
pub struct TelegramChannel {
    config: TelegramConfig,
    channel_id: ChannelId,
    /// Sender for injecting test messages.
    inject_tx: tokio::sync::Mutex<Option<mpsc::Sender<Result<ChannelMessage, ChannelError>>>>,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            channel_id: ChannelId("telegram".into()),
            inject_tx: tokio::sync::Mutex::new(None),
        }
    }

    /// Inject a message as if it came from Telegram (for testing).
    pub async fn inject_message(&self, msg: ChannelMessage) -> Result<(), ChannelError> {
        let guard = self.inject_tx.lock().await;
        if let Some(tx) = guard.as_ref() {
            tx.send(Ok(msg))
                .await
                .map_err(|_| ChannelError::ConnectionLost("Message channel closed".into()))
        } else {
            Err(ChannelError::ConnectionLost("Channel not started".into()))
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn id(&self) -> &ChannelId {
        &self.channel_id
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        info!("Telegram channel starting (stub mode)");
        let (tx, rx) = mpsc::channel(64);
        *self.inject_tx.lock().await = Some(tx);
        // In production: spawn teloxide long-polling loop here
        Ok(rx)
    }

    async fn send(&self, chat_id: &str, reply: &Reply) -> Result<(), ChannelError> {
        info!(
            chat_id = %chat_id,
            text_len = reply.text.len(),
            keyboard_rows = reply.keyboard.as_ref().map_or(0, |k| k.rows.len()),
            "Telegram send (stub)"
        );
        // In production: sendMessage with reply_markup = ReplyKeyboardMarkup
        // (one_time_keyboard) when a keyboard is present
        Ok(())
    }

    fn is_allowed(&self, sender_id: &str) -> bool {
        if self.config.allowed_users.is_empty() {
            return false;
        }
        if self.config.allowed_users.iter().any(|u| u == "*") {
            return true;
        }
        self.config.allowed_users.iter().any(|u| u == sender_id)
    }

    async fn stop(&self) -> Result<(), ChannelError> {
        info!("Telegram channel stopping");
        *self.inject_tx.lock().await = None;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ChannelError> {
        // In production: call getMe
        Ok(!self.config.bot_token.is_empty())
    }
}
