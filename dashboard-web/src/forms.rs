// dashboard-web/src/forms.rs
//! Form bodies posted by the pages, and the checks run before anything
//! reaches the backend.

use common::models::{
    Credentials, NewComment, NewProject, ProjectUpdate, Registration, Role, TaskPayload,
    TaskStatus, UserUpdate,
};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

/// Field name to message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All messages on one line, for a notification
    pub fn summary(&self) -> String {
        self.0.values().cloned().collect::<Vec<_>>().join(". ")
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Loose `local@domain.tld` check
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Location the guard turned the user away from
    #[serde(default)]
    pub from: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = self.email.trim();
        if !is_email(email) {
            errors.add("email", "Invalid email");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
        }
        errors.into_result(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = self.name.trim();
        let email = self.email.trim();
        if name.chars().count() < MIN_NAME_LEN {
            errors.add("name", format!("Name must be at least {} characters", MIN_NAME_LEN));
        }
        if !is_email(email) {
            errors.add("email", "Invalid email");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
        }
        let role = self.role.parse::<Role>();
        if role.is_err() {
            errors.add("role", "Choose a role");
        }
        match role {
            Ok(role) => errors.into_result(Registration {
                name: name.to_string(),
                email: email.to_string(),
                password: self.password.clone(),
                role,
            }),
            Err(_) => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<NewProject, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Project name is required");
        }
        errors.into_result(NewProject {
            name: name.to_string(),
            description: non_blank(&self.description),
        })
    }

    pub fn validate_update(&self) -> Result<ProjectUpdate, FieldErrors> {
        let project = self.validate()?;
        Ok(ProjectUpdate {
            name: Some(project.name),
            description: project.description,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
}

impl TaskForm {
    /// Payload for a task in `project_id`
    pub fn validate(&self, project_id: &str) -> Result<TaskPayload, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        }
        let status = match non_blank(&self.status) {
            None => TaskStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                errors.add("status", e);
                TaskStatus::default()
            }),
        };
        errors.into_result(TaskPayload {
            title: title.to_string(),
            description: non_blank(&self.description),
            status,
            project_id: project_id.to_string(),
            assigned_to_id: non_blank(&self.assigned_to_id),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub content: String,
}

impl CommentForm {
    pub fn validate(&self, task_id: &str) -> Result<NewComment, FieldErrors> {
        let mut errors = FieldErrors::default();
        let content = self.content.trim();
        if content.is_empty() {
            errors.add("content", "Comment cannot be empty");
        }
        errors.into_result(NewComment {
            content: content.to_string(),
            task_id: task_id.to_string(),
        })
    }
}

/// Edit or delete of an existing comment. The hidden fields say which
/// page and cache entry it belongs to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentRef {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserForm {
    pub fn validate(&self) -> Result<UserUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = self.name.trim();
        let email = self.email.trim();
        if name.chars().count() < MIN_NAME_LEN {
            errors.add("name", format!("Name must be at least {} characters", MIN_NAME_LEN));
        }
        if !is_email(email) {
            errors.add("email", "Invalid email");
        }
        match self.role.parse::<Role>() {
            Ok(role) => errors.into_result(UserUpdate {
                name: name.to_string(),
                email: email.to_string(),
                role,
            }),
            Err(_) => {
                errors.add("role", "Choose a role");
                Err(errors)
            }
        }
    }
}
