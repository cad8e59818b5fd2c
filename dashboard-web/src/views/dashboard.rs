// dashboard-web/src/views/dashboard.rs
use common::models::{Task, TaskStatus, UserProfile};

use super::{escape, layout};
use crate::notify::Flash;

/// Per-status task counts shown on the welcome page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub projects: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl Summary {
    pub fn new(projects: usize, tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        Self {
            projects,
            pending: count(TaskStatus::Pending),
            in_progress: count(TaskStatus::InProgress),
            completed: count(TaskStatus::Completed),
        }
    }
}

pub fn page(user: &UserProfile, summary: Option<&Summary>, flash: Option<&Flash>) -> String {
    let stats = match summary {
        Some(s) => format!(
            r#"<ul class="summary">
<li>{} projects</li>
<li class="status-PENDING">{} pending</li>
<li class="status-IN_PROGRESS">{} in progress</li>
<li class="status-COMPLETED">{} completed</li>
</ul>"#,
            s.projects, s.pending, s.in_progress, s.completed
        ),
        None => String::new(),
    };
    let content = format!(
        r#"<h2>Welcome to the Dashboard</h2>
<p>Hello <strong>{}</strong>! You are logged in as <strong>{}</strong>.</p>
{}"#,
        escape(&user.name),
        user.role.as_str(),
        stats
    );
    layout("Dashboard", user, flash, &content)
}
