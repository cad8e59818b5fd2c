// dashboard-web/src/handlers/projects.rs
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use common::routes::Route;
use futures_util::future::try_join_all;

use super::{failure, sign_out_if_rejected, signed_in};
use crate::api::ApiError;
use crate::error::DashboardError;
use crate::forms::{FieldErrors, ProjectForm, TaskForm};
use crate::middleware::SessionHandle;
use crate::notify::{self, Flash};
use crate::state::AppState;
use crate::views;

pub async fn list(
    req: HttpRequest,
    session: SessionHandle,
    state: web::Data<AppState>,
) -> Result<HttpResponse, DashboardError> {
    let (current, resources) = signed_in(&session, &state)?;

    let (projects, notice) = match resources.projects().await {
        Ok(projects) => (projects, None),
        Err(e) => {
            if let Some(response) = sign_out_if_rejected(&session, &resources, &e).await {
                return Ok(response);
            }
            tracing::error!("Failed to load projects: {}", e);
            (Vec::new(), Some(Flash::error("Failed to load projects")))
        }
    };

    Ok(notify::page(&req, StatusCode::OK, notice, |flash| {
        views::projects::list(&current.user, &projects, &ProjectForm::default(), &FieldErrors::default(), flash)
    }))
}

pub async fn create(
    req: HttpRequest,
    session: SessionHandle,
    state: web::Data<AppState>,
    form: web::Form<ProjectForm>,
) -> Result<HttpResponse, DashboardError> {
    let (current, resources) = signed_in(&session, &state)?;
    let form = form.into_inner();

    let project = match form.validate() {
        Ok(project) => project,
        Err(errors) => {
            let projects = resources.projects().await.unwrap_or_default();
            return Ok(notify::page(&req, StatusCode::BAD_REQUEST, None, |flash| {
                views::projects::list(&current.user, &projects, &form, &errors, flash)
            }));
        }
    };

    Ok(match resources.create_project(&project).await {
        Ok(created) => {
            tracing::info!("Project {} created by {}", created.id, current.user.id);
            notify::redirect(&Route::Project(created.id).path(), Some(Flash::success("Project created")))
        }
        Err(e) => failure(&session, &resources, e, &Route::Projects.path(), "Failed to create project").await,
    })
}

pub async fn show(
    req: HttpRequest,
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, DashboardError> {
    let (current, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();

    let project = match resources.project(&id).await {
        Ok(project) => project,
        Err(ApiError::Status { status: 404, .. }) => {
            return Ok(notify::redirect(&Route::Projects.path(), Some(Flash::error("Project not found"))));
        }
        Err(e) => {
            return Ok(failure(&session, &resources, e, &Route::Projects.path(), "Failed to load project").await);
        }
    };

    let loaded = match resources.project_tasks(&id).await {
        Ok(tasks) => {
            let comments = try_join_all(tasks.iter().map(|task| resources.task_comments(&task.id))).await;
            comments.map(|comments| tasks.into_iter().zip(comments).collect::<Vec<_>>())
        }
        Err(e) => Err(e),
    };

    let (tasks, notice) = match loaded {
        Ok(tasks) => (tasks, None),
        Err(e) => {
            if let Some(response) = sign_out_if_rejected(&session, &resources, &e).await {
                return Ok(response);
            }
            tracing::error!("Failed to load tasks of project {}: {}", id, e);
            (Vec::new(), Some(Flash::error("Failed to load tasks")))
        }
    };

    Ok(notify::page(&req, StatusCode::OK, notice, |flash| {
        views::projects::detail(&current.user, &project, &tasks, flash)
    }))
}

pub async fn update(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<ProjectForm>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();
    let back = Route::Project(id.clone()).path();

    let update = match form.validate_update() {
        Ok(update) => update,
        Err(errors) => return Ok(notify::redirect(&back, Some(Flash::error(errors.summary())))),
    };

    Ok(match resources.update_project(&id, &update).await {
        Ok(_) => notify::redirect(&back, Some(Flash::success("Project updated"))),
        Err(e) => failure(&session, &resources, e, &back, "Failed to update project").await,
    })
}

pub async fn delete(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, DashboardError> {
    let (current, resources) = signed_in(&session, &state)?;
    let id = path.into_inner();

    Ok(match resources.delete_project(&id).await {
        Ok(()) => {
            tracing::info!("Project {} deleted by {}", id, current.user.id);
            notify::redirect(&Route::Projects.path(), Some(Flash::success("Project deleted")))
        }
        Err(e) => {
            let back = Route::Project(id).path();
            failure(&session, &resources, e, &back, "Failed to delete project").await
        }
    })
}

pub async fn create_task(
    session: SessionHandle,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<TaskForm>,
) -> Result<HttpResponse, DashboardError> {
    let (_, resources) = signed_in(&session, &state)?;
    let project_id = path.into_inner();
    let back = Route::Project(project_id.clone()).path();

    let task = match form.validate(&project_id) {
        Ok(task) => task,
        Err(errors) => return Ok(notify::redirect(&back, Some(Flash::error(errors.summary())))),
    };

    Ok(match resources.create_task(&task).await {
        Ok(_) => notify::redirect(&back, Some(Flash::success("Task created"))),
        Err(e) => failure(&session, &resources, e, &back, "Failed to create task").await,
    })
}
