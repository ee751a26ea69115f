pub mod admin;
pub mod meta;
pub mod ticks;

use actix_web::HttpResponse;
use chrono::SecondsFormat;
use serde_json::json;
use tracing::error;

use crate::error::TickError;

/// Maps a tick rejection to its HTTP shape. Everything except a store
/// fault is an expected, user-facing outcome.
pub(crate) fn rejection_response(err: TickError, early_minutes: i64) -> HttpResponse {
    match err {
        TickError::InvalidInput(field) => HttpResponse::BadRequest().json(json!({
            "error": format!("Missing {field}")
        })),
        TickError::UnknownSlot(_) => HttpResponse::BadRequest().json(json!({
            "error": "Invalid slot"
        })),
        TickError::UnknownEmployee(_) => HttpResponse::BadRequest().json(json!({
            "error": "Unknown employee"
        })),
        TickError::DateNotAllowed => HttpResponse::Forbidden().json(json!({
            "error": "Not allowed today",
            "detail": "This tracker is not accepting ticks today."
        })),
        TickError::TooEarly {
            earliest,
            slot_instant,
        } => HttpResponse::Forbidden().json(json!({
            "error": "Too early for this slot",
            "detail": format!("You can tick {early_minutes} minutes before the slot time."),
            "earliest": earliest.to_rfc3339_opts(SecondsFormat::Millis, true),
            "slotTime": slot_instant.to_rfc3339_opts(SecondsFormat::Millis, true)
        })),
        TickError::InvalidTimezone(_) | TickError::Store(_) => {
            error!(error = %err, "Tick failed on a backend fault");
            HttpResponse::InternalServerError().json(json!({
                "error": "Internal Server Error"
            }))
        }
    }
}
