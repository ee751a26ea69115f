use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::StoreError;

/// Rejection reasons for a tick attempt. A duplicate tick is not an error,
/// it is a defined outcome (`TickOutcome::Duplicate`).
#[derive(Debug, Error)]
pub enum TickError {
    #[error("missing or empty field: {0}")]
    InvalidInput(&'static str),

    #[error("unknown slot: {0}")]
    UnknownSlot(String),

    #[error("unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("ticks are not accepted today")]
    DateNotAllowed,

    /// Ticking before the slot's early window opens. Carries both instants
    /// so the caller can tell the client when to retry.
    #[error("too early for this slot")]
    TooEarly {
        earliest: DateTime<Utc>,
        slot_instant: DateTime<Utc>,
    },

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
