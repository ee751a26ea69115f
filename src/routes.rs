use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

use crate::{
    api::{admin, meta, ticks},
    config::Config,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let tick_limiter = Arc::new(build_limiter(config.rate_tick_per_min));
    let read_limiter = Arc::new(build_limiter(config.rate_read_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::resource("/tick")
                    .wrap(tick_limiter.clone())
                    .route(web::post().to(ticks::record_tick)),
            )
            .service(
                web::resource("/meta")
                    .wrap(read_limiter.clone())
                    .route(web::get().to(meta::meta)),
            )
            .service(
                web::resource("/employees")
                    .wrap(read_limiter.clone())
                    .route(web::get().to(meta::employees)),
            )
            .service(
                web::scope("/ticks")
                    .service(
                        web::resource("/today")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(ticks::ticks_today)),
                    )
                    .service(
                        web::resource("/history")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(ticks::ticks_history)),
                    ),
            )
            .service(
                web::resource("/export.csv")
                    .wrap(read_limiter.clone())
                    .route(web::get().to(admin::export_csv)),
            ),
    );

    // Admin summary lives outside the API prefix.
    cfg.service(web::resource("/admin").route(web::get().to(admin::admin_page)));
}
