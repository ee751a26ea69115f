use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod config;
mod csv;
mod docs;
mod error;
mod model;
mod routes;
mod rules;
mod service;
mod store;

use config::{Config, StoreBackend};
use model::slot::SlotCatalog;
use rules::clock::LocalClock;
use rules::eligibility::{TickRules, allow_every_day};
use service::TickService;
use store::AttendanceStore;
use store::memory::MemoryStore;
use store::sqlite::SqliteStore;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn AttendanceStore> = match config.store_backend {
        StoreBackend::Sqlite => {
            let url = config
                .database_url
                .clone()
                .context("DATABASE_URL must be set for the sqlite backend")?;
            Arc::new(
                SqliteStore::connect(&url)
                    .await
                    .context("Failed to connect to database")?,
            )
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    store
        .seed_default_employees_if_empty(&config.default_employees)
        .await
        .context("Failed to seed default employees")?;

    let clock = LocalClock::new(&config.time_zone)?;
    let rules = TickRules::new(
        SlotCatalog::new(config.slots.clone()),
        clock,
        config.early_minutes,
        allow_every_day(),
    );
    let service = TickService::new(store, rules);

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(service.clone()))
            .app_data(Data::new(config.clone()))
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
