//! Error types for the Rollcall domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Rollcall operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Record store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Channel errors ---
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Subject not found: '{name}' for user {owner}")]
    SubjectNotFound { owner: String, name: String },

    #[error("Subject already exists: '{name}'")]
    DuplicateSubject { name: String },

    /// A write would violate `attended <= conducted <= total_classes`.
    #[error("Counter consistency violation: {message}")]
    Consistency { message: String },
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Unauthorized sender: {sender_id} on {channel}")]
    Unauthorized { channel: String, sender_id: String },

    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_displays_correctly() {
        let err = Error::Store(StoreError::SubjectNotFound {
            owner: "42".into(),
            name: "Algorithms".into(),
        });
        assert!(err.to_string().contains("Algorithms"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn consistency_error_displays_correctly() {
        let err = Error::Store(StoreError::Consistency {
            message: "attended 11 exceeds conducted 10".into(),
        });
        assert!(err.to_string().contains("attended 11"));
    }

    #[test]
    fn channel_error_displays_correctly() {
        let err = Error::Channel(ChannelError::Unauthorized {
            channel: "telegram".into(),
            sender_id: "eve".into(),
        });
        assert!(err.to_string().contains("telegram"));
        assert!(err.to_string().contains("eve"));
    }
}
