// dashboard-web/src/handlers/users.rs
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use common::models::Session;
use common::routes::Route;

use super::{failure, sign_out_if_rejected, signed_in};
use crate::error::DashboardError;
use crate::forms::UserForm;
use crate::middleware::SessionHandle;
use crate::notify::{self, Flash};
use crate::state::AppState;
use crate::views;

/// User management is for administrators only
fn forbidden(current: &Session) -> Option<HttpResponse> {
    if current.user.is_admin() {
        return None;
    }
    tracing::warn!("User {} ({}) tried to manage users", current.user.id, current.user.role);
    Some(notify::redirect(
        &Route::Dashboard.path(),
        Some(Flash::error("Only administrators can manage users")),
    ))
}

pub async fn list(
    req: HttpRequest,
    session: SessionHandle,
    state: web::Data<AppState>,
) -> Result<HttpResponse, DashboardError> {
    let (current, resources) = signed_in(&session, &state)?;
    if let Some(response) = forbidden(&current) {
        return Ok(response);
    }

    let (users, notice) = match resources.users().await {
        Ok(users) => (users, None),
        Err(e) => {
            if let Some(response) = sign_out_if_rejected(&session, &resources, &e).await {
                return Ok(response);
            }
            tracing::error!("Failed to load users: {}", e);
            (Vec::new(), Some(Flash::error("Failed to load users")))
        }
    };

    Ok(notify::page(&req, StatusCode::OK, notice, |flash| {
        views::users::list(&current.user, &users, flash)
    }))
}

pub async fn update(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, DashboardError> {
    let (current, resources) = signed_in(&session, &state)?;
    if let Some(response) = forbidden(&current) {
        return Ok(response);
    }
    let id = path.into_inner();
    let back = Route::Users.path();

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => return Ok(notify::redirect(&back, Some(Flash::error(errors.summary())))),
    };

    Ok(match resources.update_user(&id, &update).await {
        Ok(updated) => {
            tracing::info!("User {} updated by {}", updated.id, current.user.id);
            if updated.id == current.user.id {
                // keep the stored profile in step with the backend
                if let Err(e) = session.set_user(Some(updated)) {
                    tracing::warn!("Failed to refresh own profile: {}", e);
                }
            }
            notify::redirect(&back, Some(Flash::success("User updated")))
        }
        Err(e) => failure(&session, &resources, e, &back, "Failed to update user").await,
    })
}
