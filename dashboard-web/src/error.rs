// dashboard-web/src/error.rs
use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use common::routes::Route;
use common::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// A protected handler ran without a session
    #[error("not signed in")]
    SignedOut,
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Auth(AuthError::AuthRejected) => StatusCode::UNAUTHORIZED,
            DashboardError::SignedOut => StatusCode::SEE_OTHER,
            DashboardError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self.status_code() {
            StatusCode::SEE_OTHER => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, Route::Login.path()))
                .finish(),
            status => HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(self.to_string()),
        }
    }
}
