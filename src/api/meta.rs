use actix_web::error::ErrorInternalServerError;
use actix_web::{HttpResponse, Responder, web};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::error;

use crate::service::TickService;

/// Rule metadata for clients, so the UI can render state without
/// re-deriving the business rules.
#[utoipa::path(
    get,
    path = "/api/meta",
    responses(
        (status = 200, description = "Current rules and slot catalog", body = Object, example = json!({
            "serverTime": "2024-03-01T01:00:00.000Z",
            "localDate": "2024-03-01",
            "allowedNow": true,
            "slots": [{ "key": "08:00", "label": "08:00 AM" }],
            "rules": { "days": "Every day", "earlyMinutes": 5, "timeZone": "Asia/Phnom_Penh" }
        }))
    ),
    tag = "Meta"
)]
pub async fn meta(service: web::Data<TickService>) -> impl Responder {
    let now = Utc::now();
    let rules = service.rules();
    HttpResponse::Ok().json(json!({
        "serverTime": now.to_rfc3339_opts(SecondsFormat::Millis, true),
        "localDate": rules.clock().local_date_string(now),
        "allowedNow": rules.date_allowed(now),
        "slots": rules.catalog().slots(),
        "rules": {
            "days": "Every day",
            "earlyMinutes": rules.early_minutes(),
            "timeZone": rules.clock().zone_name()
        }
    }))
}

/// Known employee names, sorted.
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employee name list", body = Object, example = json!({
            "employees": ["Chi Vorn", "Heang", "Riya"]
        })),
        (status = 500, description = "Store unavailable")
    ),
    tag = "Meta"
)]
pub async fn employees(service: web::Data<TickService>) -> actix_web::Result<impl Responder> {
    let employees = service.store().list_employee_names().await.map_err(|e| {
        error!(error = %e, "Failed to list employees");
        ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(json!({ "employees": employees })))
}
