use actix_web::error::ErrorInternalServerError;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::config::Config;
use crate::csv::render_export;
use crate::service::TickService;

#[derive(Debug, Deserialize)]
pub struct AdminKeyQuery {
    pub key: Option<String>,
}

/// Shared-secret gate. An empty ADMIN_KEY disables the gate (local
/// testing); the key is accepted from `?key=` or the `x-admin-key` header.
fn authorized(config: &Config, query: &AdminKeyQuery, req: &HttpRequest) -> bool {
    if config.admin_key.is_empty() {
        return true;
    }
    let provided = query
        .key
        .as_deref()
        .or_else(|| {
            req.headers()
                .get("x-admin-key")
                .and_then(|v| v.to_str().ok())
        })
        .unwrap_or("");
    provided == config.admin_key
}

/// Administrative summary page.
pub async fn admin_page(
    req: HttpRequest,
    config: web::Data<Config>,
    service: web::Data<TickService>,
    query: web::Query<AdminKeyQuery>,
) -> actix_web::Result<impl Responder> {
    if !authorized(&config, &query, &req) {
        return Ok(HttpResponse::Unauthorized().body("Unauthorized"));
    }

    let total = service.store().count_ticks().await.map_err(|e| {
        error!(error = %e, "Failed to count ticks");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let export_href = match query.key.as_deref() {
        Some(key) if !config.admin_key.is_empty() => {
            format!("{}/export.csv?key={key}", config.api_prefix)
        }
        _ => format!("{}/export.csv", config.api_prefix),
    };

    let html = format!(
        r#"<html>
  <head><title>Admin - Attendance Tick</title><meta name="viewport" content="width=device-width, initial-scale=1" /></head>
  <body style="font-family:system-ui;max-width:900px;margin:40px auto;padding:0 16px;">
    <h1>Admin</h1>
    <p>Total tick records: <b>{total}</b></p>
    <ul>
      <li><a href="{export_href}">Download CSV export</a></li>
    </ul>
    <p>Tip: Set <code>ADMIN_KEY</code> environment variable so only admins can export.</p>
  </body>
</html>"#
    );

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

/// Full tick export as CSV, sorted by (date, employee, slot).
#[utoipa::path(
    get,
    path = "/api/export.csv",
    params(
        ("key", Query, description = "Admin key, when ADMIN_KEY is configured")
    ),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv"),
        (status = 401, description = "Bad or missing admin key"),
        (status = 500, description = "Store unavailable")
    ),
    tag = "Admin"
)]
pub async fn export_csv(
    req: HttpRequest,
    config: web::Data<Config>,
    service: web::Data<TickService>,
    query: web::Query<AdminKeyQuery>,
) -> actix_web::Result<impl Responder> {
    if !authorized(&config, &query, &req) {
        return Ok(HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" })));
    }

    let ticks = service.store().all_ticks_sorted().await.map_err(|e| {
        error!(error = %e, "Failed to export ticks");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            r#"attachment; filename="attendance_ticks.csv""#,
        ))
        .body(render_export(&ticks)))
}
