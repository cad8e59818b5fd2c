// dashboard-web/src/static_files.rs
use actix_files::Files;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpRequest, HttpResponse};
use std::path::PathBuf;

/// URL prefix of stylesheets and other static assets
pub const ASSETS_PREFIX: &str = "/assets";

#[derive(Clone)]
pub struct AssetsConfig {
    pub root_path: PathBuf,
}

impl From<&common::StaticFilesConfig> for AssetsConfig {
    fn from(config: &common::StaticFilesConfig) -> Self {
        Self {
            root_path: PathBuf::from(&config.path),
        }
    }
}

// Unmatched routes get a plain page instead of an empty body
async fn not_found(req: HttpRequest) -> HttpResponse {
    tracing::debug!("No route for {} {}", req.method(), req.path());
    HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(r#"<!DOCTYPE html><html><body><h1>Page not found</h1><p><a href="/dashboard">Back to the dashboard</a></p></body></html>"#)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: AssetsConfig) {
    if !config.root_path.is_dir() {
        tracing::warn!("Static assets directory {:?} does not exist", config.root_path);
    }
    cfg.service(
        Files::new(ASSETS_PREFIX, &config.root_path)
            .prefer_utf8(true)
            .use_etag(true)
            .use_last_modified(true),
    )
    .default_service(web::route().to(not_found));
}
