use actix_web::error::ErrorInternalServerError;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::api::rejection_response;
use crate::model::tick::Tick;
use crate::service::{TickOutcome, TickService};
use crate::store::clamp_history_limit;

#[derive(Deserialize, ToSchema)]
pub struct TickRequest {
    #[schema(example = "Heang")]
    pub employee: String,
    #[schema(example = "12:00")]
    pub slot: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TodayQuery {
    pub employee: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryQuery {
    pub employee: String,
    pub date: Option<String>,
    pub limit: Option<usize>,
}

/// Record one attendance punch.
#[utoipa::path(
    post,
    path = "/api/tick",
    request_body = TickRequest,
    responses(
        (status = 200, description = "Tick recorded", body = Object, example = json!({
            "ok": true,
            "record": {
                "employee": "Heang", "date": "2024-03-01", "slot": "12:00",
                "timestamp": "2024-03-01T05:05:00Z", "ip": "203.0.113.7", "userAgent": ""
            }
        })),
        (status = 400, description = "Invalid input, unknown slot, or unknown employee"),
        (status = 403, description = "Date not allowed or too early for the slot"),
        (status = 409, description = "Already ticked for this slot today"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "Ticks"
)]
pub async fn record_tick(
    req: HttpRequest,
    service: web::Data<TickService>,
    payload: web::Json<TickRequest>,
) -> impl Responder {
    let now = Utc::now();
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("")
        .to_string();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match service
        .record_tick(&payload.employee, &payload.slot, now, &ip, &user_agent)
        .await
    {
        Ok(TickOutcome::Recorded(record)) => HttpResponse::Ok().json(json!({
            "ok": true,
            "record": record
        })),
        Ok(TickOutcome::Duplicate) => HttpResponse::Conflict().json(json!({
            "error": "Already ticked for this slot today"
        })),
        Err(err) => rejection_response(err, service.rules().early_minutes()),
    }
}

/// Ticks for one employee on the current local date, oldest first.
#[utoipa::path(
    get,
    path = "/api/ticks/today",
    params(
        ("employee", Query, description = "Employee name")
    ),
    responses(
        (status = 200, description = "Today's ticks", body = [Tick]),
        (status = 400, description = "Missing employee"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "Ticks"
)]
pub async fn ticks_today(
    service: web::Data<TickService>,
    query: web::Query<TodayQuery>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now();
    let date = service.rules().clock().local_date_string(now);

    let ticks = service
        .store()
        .ticks_for(&query.employee, &date)
        .await
        .map_err(|e| {
            error!(error = %e, employee = %query.employee, "Failed to fetch today's ticks");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "date": date,
        "employee": query.employee,
        "ticks": ticks
    })))
}

/// Tick history for one employee, most recent first.
#[utoipa::path(
    get,
    path = "/api/ticks/history",
    params(
        ("employee", Query, description = "Employee name"),
        ("date", Query, description = "Optional date filter, YYYY-MM-DD"),
        ("limit", Query, description = "Max rows, 1-500, default 200")
    ),
    responses(
        (status = 200, description = "Tick history", body = [Tick]),
        (status = 400, description = "Missing employee"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "Ticks"
)]
pub async fn ticks_history(
    service: web::Data<TickService>,
    query: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let limit = clamp_history_limit(query.limit);

    let ticks = service
        .store()
        .ticks_history(&query.employee, query.date.as_deref(), limit)
        .await
        .map_err(|e| {
            error!(error = %e, employee = %query.employee, "Failed to fetch tick history");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "employee": query.employee,
        "date": query.date,
        "limit": limit,
        "ticks": ticks
    })))
}
