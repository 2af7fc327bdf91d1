//! Command dispatcher: the conversational surface of Rollcall.
//!
//! Maps slash-commands to dialog starters or one-shot reports, routes free
//! text into the active dialog, and commits finished flows against the
//! engine and store. One inbound message in, at most one reply out.

pub mod command;
pub mod curriculum;
pub mod dispatcher;
pub mod report;

pub use command::Command;
pub use dispatcher::Dispatcher;
