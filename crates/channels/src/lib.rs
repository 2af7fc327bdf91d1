//! Chat channel implementations for Rollcall.
//!
//! Each channel connects to a chat platform and relays messages to and from
//! the dispatcher. Channels are trait-based and platform-agnostic.
//!
//! Available channels:
//! - **Telegram** — Telegram Bot API (stub, needs teloxide in production)
//! - **CLI** — Interactive terminal chat (stdin/stdout)
//! - **Registry** — Central channel manager and message router

pub mod cli;
pub mod registry;
pub mod telegram;

pub use cli::CliChannel;
pub use registry::ChannelRegistry;
pub use telegram::{TelegramChannel, TelegramConfig};
