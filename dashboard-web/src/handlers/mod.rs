// dashboard-web/src/handlers/mod.rs
pub mod auth;
pub mod dashboard;
pub mod projects;
pub mod tasks;
pub mod users;

use actix_web::{web, HttpResponse};
use common::guard::GuardPolicy;
use common::models::Session;
use common::routes::Route;

use crate::api::ApiError;
use crate::error::DashboardError;
use crate::middleware::{RouteGuard, SessionHandle};
use crate::notify::{self, Flash};
use crate::resources::Resources;
use crate::state::AppState;

/// The active session and the resource hooks bound to its token
pub(crate) fn signed_in(
    session: &SessionHandle,
    state: &AppState,
) -> Result<(Session, Resources), DashboardError> {
    let current = session.require()?;
    let resources = Resources::new(state, &current.token);
    Ok((current, resources))
}

/// Sign out when the backend no longer accepts the session's token
pub(crate) async fn sign_out_if_rejected(
    session: &SessionHandle,
    resources: &Resources,
    err: &ApiError,
) -> Option<HttpResponse> {
    if !err.is_unauthorized() {
        return None;
    }
    tracing::warn!("Backend refused the session token, signing out");
    resources.forget_session().await;
    session.clear();
    Some(notify::redirect(
        &Route::Login.path(),
        Some(Flash::error("Your session has ended. Please sign in again.")),
    ))
}

/// Response for a failed mutation: back to `back` with an error notification
pub(crate) async fn failure(
    session: &SessionHandle,
    resources: &Resources,
    err: ApiError,
    back: &str,
    message: &str,
) -> HttpResponse {
    if let Some(response) = sign_out_if_rejected(session, resources, &err).await {
        return response;
    }
    tracing::error!("{}: {}", message, err);
    notify::redirect(back, Some(Flash::error(message)))
}

pub fn configure(cfg: &mut web::ServiceConfig, policy: GuardPolicy) {
    cfg.route("/login", web::get().to(auth::login_page))
        .route("/login", web::post().to(auth::login))
        .route("/register", web::get().to(auth::register_page))
        .route("/register", web::post().to(auth::register))
        .route("/logout", web::post().to(auth::logout))
        .service(
            web::scope("")
                .wrap(RouteGuard::new(policy))
                .route("/", web::get().to(dashboard::index))
                .route("/dashboard", web::get().to(dashboard::dashboard))
                .route("/projects", web::get().to(projects::list))
                .route("/projects", web::post().to(projects::create))
                .route("/projects/{id}", web::get().to(projects::show))
                .route("/projects/{id}", web::post().to(projects::update))
                .route("/projects/{id}/delete", web::post().to(projects::delete))
                .route("/projects/{id}/tasks", web::post().to(projects::create_task))
                .route("/tasks/{id}", web::post().to(tasks::update))
                .route("/tasks/{id}/status", web::post().to(tasks::update_status))
                .route("/tasks/{id}/delete", web::post().to(tasks::delete))
                .route("/tasks/{id}/comments", web::post().to(tasks::add_comment))
                .route("/comments/{id}", web::post().to(tasks::update_comment))
                .route("/comments/{id}/delete", web::post().to(tasks::delete_comment))
                .route("/users", web::get().to(users::list))
                .route("/users/{id}", web::post().to(users::update)),
        );
}
