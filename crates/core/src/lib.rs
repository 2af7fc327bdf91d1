//! # Rollcall Core
//!
//! Domain types, traits, and error definitions for the Rollcall attendance
//! assistant. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod channel;
pub mod error;
pub mod event;
pub mod store;
pub mod subject;
pub mod user;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChannelId, ChannelMessage, Reply, ReplyKeyboard};
pub use error::{ChannelError, Error, Result, StoreError};
pub use event::{AttendanceEvent, Outcome};
pub use store::RecordStore;
pub use subject::{ClassType, Subject};
pub use user::{User, UserId};
