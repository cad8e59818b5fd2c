// dashboard-web/src/handlers/tasks.rs
//! Task and comment mutations. Each one returns to the owning project's page.

use actix_web::{web, HttpResponse};
use common::models::{Task, TaskPayload, TaskStatus};
use common::routes::Route;

use super::{failure, signed_in};
use crate::error::DashboardError;
use crate::forms::{CommentForm, CommentRef, StatusForm, TaskForm};
use crate::middleware::SessionHandle;
use crate::notify::{self, Flash};
use crate::resources::Resources;
use crate::state::AppState;

/// The task with `id`, or the response to send when it cannot be found
async fn find_task(
    session: &SessionHandle,
    resources: &Resources,
    id: &str,
) -> Result<Task, HttpResponse> {
    match resources.task(id).await {
        Ok(Some(task)) => Ok(task),
        Ok(None) => {
            tracing::warn!("Task {} not found", id);
            Err(notify::redirect(&Route::Projects.path(), Some(Flash::error("Task not found"))))
        }
        Err(e) => Err(failure(session, resources, e, &Route::Projects.path(), "Failed to load task").await),
    }
}

pub async fn update(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<TaskForm>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();
    let task = match find_task(&session, &resources, &id).await {
        Ok(task) => task,
        Err(response) => return Ok(response),
    };
    let back = Route::Project(task.project_id.clone()).path();

    let payload = match form.validate(&task.project_id) {
        Ok(payload) => payload,
        Err(errors) => return Ok(notify::redirect(&back, Some(Flash::error(errors.summary())))),
    };

    Ok(match resources.update_task(&id, &payload).await {
        Ok(_) => notify::redirect(&back, Some(Flash::success("Task updated"))),
        Err(e) => failure(&session, &resources, e, &back, "Failed to update task").await,
    })
}

pub async fn update_status(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();
    let task = match find_task(&session, &resources, &id).await {
        Ok(task) => task,
        Err(response) => return Ok(response),
    };
    let back = Route::Project(task.project_id.clone()).path();

    let status = match form.status.parse::<TaskStatus>() {
        Ok(status) => status,
        Err(e) => return Ok(notify::redirect(&back, Some(Flash::error(e)))),
    };
    if status == task.status {
        return Ok(notify::redirect(&back, None));
    }

    let payload = TaskPayload::with_status(&task, status);
    Ok(match resources.update_task(&id, &payload).await {
        Ok(_) => {
            tracing::info!("Task {} moved from {} to {}", id, task.status, status);
            notify::redirect(&back, Some(Flash::success("Task status updated")))
        }
        Err(e) => failure(&session, &resources, e, &back, "Failed to update task status").await,
    })
}

pub async fn delete(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();
    let task = match find_task(&session, &resources, &id).await {
        Ok(task) => task,
        Err(response) => return Ok(response),
    };
    let back = Route::Project(task.project_id).path();

    Ok(match resources.delete_task(&id).await {
        Ok(()) => notify::redirect(&back, Some(Flash::success("Task deleted"))),
        Err(e) => failure(&session, &resources, e, &back, "Failed to delete task").await,
    })
}

pub async fn add_comment(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let task_id = path.into_inner();
    let task = match find_task(&session, &resources, &task_id).await {
        Ok(task) => task,
        Err(response) => return Ok(response),
    };
    let back = Route::Project(task.project_id).path();

    let comment = match form.validate(&task_id) {
        Ok(comment) => comment,
        Err(errors) => return Ok(notify::redirect(&back, Some(Flash::error(errors.summary())))),
    };

    Ok(match resources.create_comment(&comment).await {
        Ok(_) => notify::redirect(&back, Some(Flash::success("Comment added"))),
        Err(e) => failure(&session, &resources, e, &back, "Failed to add comment").await,
    })
}

fn comment_page(target: &CommentRef) -> String {
    match target.project_id.as_deref().filter(|id| !id.is_empty()) {
        Some(project_id) => Route::Project(project_id.to_string()).path(),
        None => Route::Projects.path(),
    }
}

pub async fn update_comment(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<CommentRef>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();
    let back = comment_page(&form);

    let content = form.content.trim();
    if content.is_empty() {
        return Ok(notify::redirect(&back, Some(Flash::error("Comment cannot be empty"))));
    }

    Ok(match resources.update_comment(&form.task_id, &id, content).await {
        Ok(_) => notify::redirect(&back, Some(Flash::success("Comment updated"))),
        Err(e) => failure(&session, &resources, e, &back, "Failed to update comment").await,
    })
}

pub async fn delete_comment(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<CommentRef>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();
    let back = comment_page(&form);

    Ok(match resources.delete_comment(&form.task_id, &id).await {
        Ok(()) => notify::redirect(&back, Some(Flash::success("Comment deleted"))),
        Err(e) => failure(&session, &resources, e, &back, "Failed to delete comment").await,
    })
}
