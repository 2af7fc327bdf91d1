//! Record store backends for Rollcall.
//!
//! Implements the [`RecordStore`](rollcall_core::RecordStore) trait:
//! - **SQLite** — production backend, one database file per deployment
//! - **InMemory** — for tests and ephemeral sessions
//!
//! Both backends enforce the counter invariant
//! `attended <= conducted <= total_classes` on every write, and run
//! multi-statement commits (mark, undo) atomically.

pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use rollcall_core::StoreError;

/// Uniform write-boundary check shared by all backends.
pub(crate) fn check_counters(
    subject_name: &str,
    attended: u32,
    conducted: u32,
    total_classes: u32,
) -> Result<(), StoreError> {
    if attended > conducted {
        return Err(StoreError::Consistency {
            message: format!(
                "attended {attended} exceeds conducted {conducted} for '{subject_name}'"
            ),
        });
    }
    if conducted > total_classes {
        return Err(StoreError::Consistency {
            message: format!(
                "conducted {conducted} exceeds planned total {total_classes} for '{subject_name}'"
            ),
        });
    }
    Ok(())
}
