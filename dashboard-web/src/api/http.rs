// dashboard-web/src/api/http.rs
use async_trait::async_trait;
use common::models::{
    Comment, Credentials, LoginResponse, NewComment, NewProject, Project, ProjectUpdate,
    Registration, Task, TaskPayload, UserProfile, UserUpdate,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use super::{ApiError, Backend};

/// [`Backend`] over HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("invalid API base URL `{}`: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!("API base URL `{}` cannot be a base", base_url)));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// `base_url` joined with `segments`, each percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str], token: Option<&str>) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Backend request failed: {}", e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("request failed").to_string()
        });
        tracing::warn!("Backend answered {}: {}", status, message);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Pull a human readable message out of an error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let builder = self.request(Method::POST, &["auth", "login"], None).json(credentials);
        match self.fetch(builder).await {
            Err(ApiError::Status { status, .. })
                if status == StatusCode::BAD_REQUEST.as_u16()
                    || status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                Err(ApiError::Rejected)
            }
            other => other,
        }
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile, ApiError> {
        let builder = self.request(Method::POST, &["auth", "register"], None).json(registration);
        self.fetch(builder).await
    }

    async fn projects(&self, token: &str) -> Result<Vec<Project>, ApiError> {
        self.fetch(self.request(Method::GET, &["projects"], Some(token))).await
    }

    async fn project(&self, token: &str, id: &str) -> Result<Project, ApiError> {
        self.fetch(self.request(Method::GET, &["projects", id], Some(token))).await
    }

    async fn create_project(&self, token: &str, project: &NewProject) -> Result<Project, ApiError> {
        let builder = self.request(Method::POST, &["projects"], Some(token)).json(project);
        self.fetch(builder).await
    }

    async fn update_project(&self, token: &str, id: &str, update: &ProjectUpdate) -> Result<Project, ApiError> {
        let builder = self.request(Method::PUT, &["projects", id], Some(token)).json(update);
        self.fetch(builder).await
    }

    async fn delete_project(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &["projects", id], Some(token))).await?;
        Ok(())
    }

    async fn tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        self.fetch(self.request(Method::GET, &["tasks"], Some(token))).await
    }

    async fn create_task(&self, token: &str, task: &TaskPayload) -> Result<Task, ApiError> {
        let builder = self.request(Method::POST, &["tasks"], Some(token)).json(task);
        self.fetch(builder).await
    }

    async fn update_task(&self, token: &str, id: &str, task: &TaskPayload) -> Result<Task, ApiError> {
        let builder = self.request(Method::PUT, &["tasks", id], Some(token)).json(task);
        self.fetch(builder).await
    }

    async fn delete_task(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &["tasks", id], Some(token))).await?;
        Ok(())
    }

    async fn task_comments(&self, token: &str, task_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.fetch(self.request(Method::GET, &["comments", "task", task_id], Some(token))).await
    }

    async fn create_comment(&self, token: &str, comment: &NewComment) -> Result<Comment, ApiError> {
        let builder = self.request(Method::POST, &["comments"], Some(token)).json(comment);
        self.fetch(builder).await
    }

    async fn update_comment(&self, token: &str, id: &str, content: &str) -> Result<Comment, ApiError> {
        let builder = self
            .request(Method::PUT, &["comments", id], Some(token))
            .json(&json!({ "content": content }));
        self.fetch(builder).await
    }

    async fn delete_comment(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &["comments", id], Some(token))).await?;
        Ok(())
    }

    async fn users(&self, token: &str) -> Result<Vec<UserProfile>, ApiError> {
        self.fetch(self.request(Method::GET, &["users"], Some(token))).await
    }

    async fn update_user(&self, token: &str, id: &str, update: &UserUpdate) -> Result<UserProfile, ApiError> {
        let builder = self.request(Method::PATCH, &["users", id], Some(token)).json(update);
        self.fetch(builder).await
    }
}
