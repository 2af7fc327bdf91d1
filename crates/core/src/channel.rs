//! Channel trait — the abstraction over chat platforms.
//!
//! A Channel connects Rollcall to a messaging platform (Telegram, CLI, ...).
//! It receives text messages from users and sends replies back, optionally
//! with a one-shot suggested-reply keyboard.

use crate::error::ChannelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Unique identifier for a channel instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message received from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// The channel this message belongs to
    pub channel_id: ChannelId,

    /// Sender identifier (platform-specific user ID)
    pub sender_id: String,

    /// Human-readable sender name (if available)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    /// The text content
    pub content: String,

    /// The chat/group/DM identifier within the channel
    pub chat_id: String,
}

/// A one-shot suggested-reply keyboard: rows of tap-to-send labels.
///
/// Platforms without native keyboards render the labels as a text hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
}

impl ReplyKeyboard {
    /// One row containing all the given labels.
    pub fn single_row<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: vec![labels.into_iter().map(Into::into).collect()],
        }
    }

    /// One label per row (used for subject lists, which can be long).
    pub fn one_per_row<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: labels.into_iter().map(|l| vec![l.into()]).collect(),
        }
    }

    /// All labels in reading order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

/// An outbound reply: text plus an optional suggested-reply keyboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<ReplyKeyboard>,
}

impl Reply {
    /// A plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// A reply with a suggested-reply keyboard.
    pub fn with_keyboard(text: impl Into<String>, keyboard: ReplyKeyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// The core Channel trait.
///
/// Implementations handle platform-specific connection logic, message
/// formatting, and authentication.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "telegram", "cli").
    fn name(&self) -> &str;

    /// Unique ID for this channel instance.
    fn id(&self) -> &ChannelId;

    /// Start listening for incoming messages.
    ///
    /// Returns a receiver that yields incoming messages. The channel
    /// implementation handles polling or reading internally.
    async fn start(
        &self,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<ChannelMessage, ChannelError>>,
        ChannelError,
    >;

    /// Send a reply to a specific chat.
    async fn send(&self, chat_id: &str, reply: &Reply) -> std::result::Result<(), ChannelError>;

    /// Check if a sender is allowed (allowlist check).
    fn is_allowed(&self, sender_id: &str) -> bool;

    /// Stop the channel gracefully.
    async fn stop(&self) -> std::result::Result<(), ChannelError> {
        Ok(())
    }

    /// Health check — is the channel connected and operational?
    async fn health_check(&self) -> std::result::Result<bool, ChannelError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_message_creation() {
        let msg = ChannelMessage {
            channel_id: ChannelId("telegram".into()),
            sender_id: "12345".into(),
            sender_name: Some("Alice".into()),
            content: "/status".into(),
            chat_id: "67890".into(),
        };
        assert_eq!(msg.channel_id.0, "telegram");
        assert_eq!(msg.content, "/status");
    }

    #[test]
    fn keyboard_single_row() {
        let kb = ReplyKeyboard::single_row(["Theory", "Tutorial", "Lab"]);
        assert_eq!(kb.rows.len(), 1);
        assert_eq!(kb.labels().count(), 3);
    }

    #[test]
    fn keyboard_one_per_row() {
        let kb = ReplyKeyboard::one_per_row(["Algorithms", "Networks"]);
        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.rows[1], vec!["Networks".to_string()]);
    }

    #[test]
    fn reply_serialization_skips_empty_keyboard() {
        let plain = Reply::text("done");
        let json = serde_json::to_string(&plain).unwrap();
        assert!(!json.contains("keyboard"));

        let with_kb = Reply::with_keyboard("pick one", ReplyKeyboard::single_row(["A", "B"]));
        let json = serde_json::to_string(&with_kb).unwrap();
        assert!(json.contains("keyboard"));
    }
}
