// Dashboard Web Server - main.rs
// dashboard-web/src/main.rs
use actix::Actor;
use actix_web::{web, App, HttpServer};
use common::{setup_tracing, Config};
use std::io;
use std::sync::Arc;

use dashboard_web::api::HttpBackend;
use dashboard_web::cache::QueryCacheActor;
use dashboard_web::middleware::SessionProvider;
use dashboard_web::static_files::{self, AssetsConfig};
use dashboard_web::{handlers, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load configuration first so the log level can come from it
    let config = Config::from_env();
    setup_tracing(&config.log_level);

    let server_addr = config.web_server_addr.clone();
    tracing::info!("Starting dashboard on {}", server_addr);
    tracing::info!("Backend API at {}", config.api_base_url);

    let backend = HttpBackend::new(&config.api_base_url)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let cache = QueryCacheActor::new()
        .with_ttl(config.cache.ttl_seconds)
        .with_cleanup_interval(config.cache.cleanup_interval_seconds)
        .start();

    let state = AppState::new(Arc::new(backend), cache, config);
    let policy = state.guard_policy();
    let secure_cookies = state.config.auth.secure_cookies;
    let assets = AssetsConfig::from(&state.config.static_files);
    let state_data = web::Data::new(state);

    HttpServer::new(move || {
        let assets = assets.clone();
        App::new()
            .app_data(state_data.clone())
            .wrap(SessionProvider::new(secure_cookies))
            .configure(move |cfg| static_files::configure(cfg, assets))
            .configure(|cfg| handlers::configure(cfg, policy))
    })
    .bind(&server_addr)?
    .run()
    .await
}
