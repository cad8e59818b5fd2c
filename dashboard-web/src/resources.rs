// dashboard-web/src/resources.rs
//! Resource hooks: backend calls bound to one session's token, with cached
//! reads and invalidation after every mutation.

use actix::Addr;
use common::models::{
    Comment, NewComment, NewProject, Project, ProjectUpdate, Task, TaskPayload, UserProfile,
    UserUpdate,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::api::{ApiError, Backend};
use crate::cache::{
    comments_key, project_key, CacheLookup, DropSession, GetCached, Invalidate, PutCached,
    QueryCacheActor, PROJECTS, TASKS, USERS,
};
use crate::state::AppState;
use crate::utils::token_fingerprint;

pub struct Resources {
    backend: Arc<dyn Backend>,
    cache: Addr<QueryCacheActor>,
    token: String,
    fingerprint: String,
}

impl Resources {
    pub fn new(state: &AppState, token: &str) -> Self {
        Self {
            backend: state.backend.clone(),
            cache: state.cache.clone(),
            token: token.to_string(),
            fingerprint: token_fingerprint(token),
        }
    }

    async fn cached<T, F, Fut>(&self, key: String, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let lookup = GetCached {
            fingerprint: self.fingerprint.clone(),
            key: key.clone(),
        };
        let generation = match self.cache.send(lookup).await {
            Ok(CacheLookup {
                value: Some(value),
                generation,
            }) => match serde_json::from_value(value) {
                Ok(hit) => return Ok(hit),
                Err(e) => {
                    tracing::warn!("Discarding unreadable cache entry `{}`: {}", key, e);
                    Some(generation)
                }
            },
            Ok(CacheLookup { value: None, generation }) => Some(generation),
            Err(e) => {
                tracing::warn!("Query cache unavailable: {}", e);
                None
            }
        };

        let fresh = fetch().await?;

        let Some(generation) = generation else {
            return Ok(fresh);
        };
        match serde_json::to_value(&fresh) {
            Ok(value) => self.cache.do_send(PutCached {
                fingerprint: self.fingerprint.clone(),
                key,
                value,
                generation,
            }),
            Err(e) => tracing::warn!("Not caching `{}`: {}", key, e),
        }
        Ok(fresh)
    }

    async fn invalidate(&self, prefixes: &[String]) {
        for prefix in prefixes {
            if let Err(e) = self.cache.send(Invalidate { prefix: prefix.clone() }).await {
                tracing::warn!("Failed to invalidate `{}`: {}", prefix, e);
            }
        }
    }

    /// Forget everything cached for this session
    pub async fn forget_session(&self) {
        let msg = DropSession {
            fingerprint: self.fingerprint.clone(),
        };
        match self.cache.send(msg).await {
            Ok(removed) => tracing::debug!("Dropped {} cached queries for session", removed),
            Err(e) => tracing::warn!("Failed to drop session cache: {}", e),
        }
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ApiError> {
        self.cached(PROJECTS.to_string(), || self.backend.projects(&self.token)).await
    }

    pub async fn project(&self, id: &str) -> Result<Project, ApiError> {
        self.cached(project_key(id), || self.backend.project(&self.token, id)).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project, ApiError> {
        let created = self.backend.create_project(&self.token, project).await?;
        self.invalidate(&[PROJECTS.to_string()]).await;
        Ok(created)
    }

    pub async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project, ApiError> {
        let updated = self.backend.update_project(&self.token, id, update).await?;
        self.invalidate(&[PROJECTS.to_string()]).await;
        Ok(updated)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        self.backend.delete_project(&self.token, id).await?;
        self.invalidate(&[PROJECTS.to_string(), TASKS.to_string()]).await;
        Ok(())
    }

    pub async fn tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.cached(TASKS.to_string(), || self.backend.tasks(&self.token)).await
    }

    /// Tasks belonging to `project_id`
    pub async fn project_tasks(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        let tasks = self.tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.project_id == project_id).collect())
    }

    pub async fn task(&self, id: &str) -> Result<Option<Task>, ApiError> {
        let tasks = self.tasks().await?;
        Ok(tasks.into_iter().find(|t| t.id == id))
    }

    pub async fn create_task(&self, task: &TaskPayload) -> Result<Task, ApiError> {
        let created = self.backend.create_task(&self.token, task).await?;
        self.invalidate(&[TASKS.to_string()]).await;
        Ok(created)
    }

    pub async fn update_task(&self, id: &str, task: &TaskPayload) -> Result<Task, ApiError> {
        let updated = self.backend.update_task(&self.token, id, task).await?;
        self.invalidate(&[TASKS.to_string()]).await;
        Ok(updated)
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.backend.delete_task(&self.token, id).await?;
        self.invalidate(&[TASKS.to_string(), comments_key(id)]).await;
        Ok(())
    }

    pub async fn task_comments(&self, task_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.cached(comments_key(task_id), || self.backend.task_comments(&self.token, task_id)).await
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        let created = self.backend.create_comment(&self.token, comment).await?;
        self.invalidate(&[comments_key(&comment.task_id)]).await;
        Ok(created)
    }

    pub async fn update_comment(&self, task_id: &str, id: &str, content: &str) -> Result<Comment, ApiError> {
        let updated = self.backend.update_comment(&self.token, id, content).await?;
        self.invalidate(&[comments_key(task_id)]).await;
        Ok(updated)
    }

    pub async fn delete_comment(&self, task_id: &str, id: &str) -> Result<(), ApiError> {
        self.backend.delete_comment(&self.token, id).await?;
        self.invalidate(&[comments_key(task_id)]).await;
        Ok(())
    }

    pub async fn users(&self) -> Result<Vec<UserProfile>, ApiError> {
        self.cached(USERS.to_string(), || self.backend.users(&self.token)).await
    }

    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<UserProfile, ApiError> {
        let updated = self.backend.update_user(&self.token, id, update).await?;
        self.invalidate(&[USERS.to_string()]).await;
        Ok(updated)
    }
}
