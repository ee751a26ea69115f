use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One recorded attendance punch. Immutable once created; at most one may
/// exist per (employee, date, slot), enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "employee": "Heang",
        "date": "2024-03-01",
        "slot": "08:00",
        "timestamp": "2024-03-01T01:02:03Z",
        "ip": "203.0.113.7",
        "userAgent": "Mozilla/5.0"
    })
)]
pub struct Tick {
    #[schema(example = "Heang")]
    pub employee: String,

    /// Calendar date in the configured local timezone, `YYYY-MM-DD`.
    #[schema(example = "2024-03-01", format = "date")]
    pub date: String,

    #[schema(example = "08:00")]
    pub slot: String,

    /// Absolute instant of the punch, serialized as ISO-8601 UTC.
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,

    #[schema(example = "203.0.113.7")]
    pub ip: String,

    #[schema(example = "Mozilla/5.0")]
    pub user_agent: String,
}
