// dashboard-web/src/api/mod.rs
//! Client side of the backend REST API.

pub mod http;

use async_trait::async_trait;
use common::models::{
    Comment, Credentials, LoginResponse, NewComment, NewProject, Project, ProjectUpdate,
    Registration, Task, TaskPayload, UserProfile, UserUpdate,
};
use thiserror::Error;

pub use http::HttpBackend;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Login credentials declined
    #[error("invalid email or password")]
    Rejected,
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The backend no longer accepts the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

/// Operations the dashboard needs from the backend.
///
/// Every call except `login` and `register` carries the session's bearer token.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<UserProfile, ApiError>;

    async fn projects(&self, token: &str) -> Result<Vec<Project>, ApiError>;
    async fn project(&self, token: &str, id: &str) -> Result<Project, ApiError>;
    async fn create_project(&self, token: &str, project: &NewProject) -> Result<Project, ApiError>;
    async fn update_project(&self, token: &str, id: &str, update: &ProjectUpdate) -> Result<Project, ApiError>;
    async fn delete_project(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn tasks(&self, token: &str) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, token: &str, task: &TaskPayload) -> Result<Task, ApiError>;
    async fn update_task(&self, token: &str, id: &str, task: &TaskPayload) -> Result<Task, ApiError>;
    async fn delete_task(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn task_comments(&self, token: &str, task_id: &str) -> Result<Vec<Comment>, ApiError>;
    async fn create_comment(&self, token: &str, comment: &NewComment) -> Result<Comment, ApiError>;
    async fn update_comment(&self, token: &str, id: &str, content: &str) -> Result<Comment, ApiError>;
    async fn delete_comment(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn users(&self, token: &str) -> Result<Vec<UserProfile>, ApiError>;
    async fn update_user(&self, token: &str, id: &str, update: &UserUpdate) -> Result<UserProfile, ApiError>;
}
