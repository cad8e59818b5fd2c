// dashboard-web/src/handlers/dashboard.rs
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use common::routes::Route;
use futures_util::future::join;

use super::{sign_out_if_rejected, signed_in};
use crate::error::DashboardError;
use crate::middleware::SessionHandle;
use crate::notify::{self, Flash};
use crate::state::AppState;
use crate::views;
use crate::views::dashboard::Summary;

pub async fn index() -> HttpResponse {
    notify::redirect(&Route::Dashboard.path(), None)
}

pub async fn dashboard(
    req: HttpRequest,
    session: SessionHandle,
    state: web::Data<AppState>,
) -> Result<HttpResponse, DashboardError> {
    let (current, resources) = signed_in(&session, &state)?;

    let (projects, tasks) = join(resources.projects(), resources.tasks()).await;
    let (summary, notice) = match (projects, tasks) {
        (Ok(projects), Ok(tasks)) => (Some(Summary::new(projects.len(), &tasks)), None),
        (Err(e), _) | (_, Err(e)) => {
            if let Some(response) = sign_out_if_rejected(&session, &resources, &e).await {
                return Ok(response);
            }
            tracing::error!("Failed to load dashboard summary: {}", e);
            (None, Some(Flash::error("Failed to load project summary")))
        }
    };

    Ok(notify::page(&req, StatusCode::OK, notice, |flash| {
        views::dashboard::page(&current.user, summary.as_ref(), flash)
    }))
}
