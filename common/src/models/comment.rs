// common/src/models/comment.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id_from_string_or_number;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub task_id: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<CommentAuthor>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn author_name(&self) -> &str {
        self.author.as_ref().map(|a| a.name.as_str()).unwrap_or("User")
    }
}

/// `POST /comments` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    pub task_id: String,
}
