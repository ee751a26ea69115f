//! Persistence contract for employees and ticks.
//!
//! One [`AttendanceStore`] trait, two interchangeable drivers selected by
//! configuration:
//!
//! - [`sqlite::SqliteStore`] — relational, uniqueness backed by an index
//! - [`memory::MemoryStore`] — in-process, uniqueness under one lock
//!
//! `insert_tick_if_absent` is the only write and must be a single
//! conditional operation: two concurrent inserts of the same
//! (employee, date, slot) triple yield exactly one `Inserted`.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::tick::Tick;

pub const HISTORY_DEFAULT_LIMIT: usize = 200;
pub const HISTORY_MAX_LIMIT: usize = 500;

/// Backend fault (connectivity, auth, corruption). Surfaced to clients as
/// an internal error; everything else a store reports is a defined outcome.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Result of a conditional insert. A conflict is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Tick),
    AlreadyExists,
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Known employee names in stable sorted order.
    async fn list_employee_names(&self) -> Result<Vec<String>, StoreError>;

    async fn employee_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// All ticks for one employee on one date, timestamp ascending.
    async fn ticks_for(&self, employee: &str, date: &str) -> Result<Vec<Tick>, StoreError>;

    /// Up to `limit` ticks for the employee, most recent first, optionally
    /// filtered to one date. `limit` is clamped to [1, 500].
    async fn ticks_history(
        &self,
        employee: &str,
        date: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Tick>, StoreError>;

    /// Insert the tick only if no row with the same (employee, date, slot)
    /// exists. Atomic with respect to the uniqueness check.
    async fn insert_tick_if_absent(&self, tick: Tick) -> Result<InsertOutcome, StoreError>;

    /// One-time bootstrap; does nothing unless the employee set is empty.
    /// Idempotent, safe to call on every startup.
    async fn seed_default_employees_if_empty(&self, names: &[String]) -> Result<(), StoreError>;

    async fn count_ticks(&self) -> Result<u64, StoreError>;

    /// Full export, ordered by (date, employee, slot) ascending.
    async fn all_ticks_sorted(&self) -> Result<Vec<Tick>, StoreError>;
}

/// History limit policy: default 200, clamped to [1, 500].
pub fn clamp_history_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(HISTORY_DEFAULT_LIMIT)
        .clamp(1, HISTORY_MAX_LIMIT)
}
