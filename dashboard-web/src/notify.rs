// dashboard-web/src/notify.rs
//! One-shot notifications carried across a redirect in a `flash` cookie.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::{Deserialize, Serialize};

use crate::store::{decode_value, encode_value};

pub const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// The notification left by the previous response, if any
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let cookie = req.cookie(FLASH_KEY)?;
        let raw = decode_value(cookie.value())?;
        serde_json::from_str(&raw).ok()
    }

    fn cookie(&self) -> Option<Cookie<'static>> {
        let raw = serde_json::to_string(self).ok()?;
        Some(
            Cookie::build(FLASH_KEY, encode_value(&raw))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish(),
        )
    }
}

/// `303 See Other` to `location`, optionally leaving a notification behind
pub fn redirect(location: &str, flash: Option<Flash>) -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location));
    if let Some(cookie) = flash.as_ref().and_then(Flash::cookie) {
        builder.cookie(cookie);
    }
    builder.finish()
}

/// Render an HTML page, consuming the pending notification.
///
/// `notice` takes precedence over a notification from the previous request.
pub fn page(
    req: &HttpRequest,
    status: StatusCode,
    notice: Option<Flash>,
    render: impl FnOnce(Option<&Flash>) -> String,
) -> HttpResponse {
    let pending = Flash::from_request(req);
    let shown = notice.or_else(|| pending.clone());

    let mut builder = HttpResponseBuilder::new(status);
    builder.content_type(ContentType::html());
    let mut response = builder.body(render(shown.as_ref()));

    if req.cookie(FLASH_KEY).is_some() {
        let removal = Cookie::build(FLASH_KEY, "").path("/").finish();
        if let Err(e) = response.add_removal_cookie(&removal) {
            tracing::warn!("Failed to clear flash cookie: {}", e);
        }
    }
    response
}
