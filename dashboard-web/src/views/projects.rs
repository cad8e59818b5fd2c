// dashboard-web/src/views/projects.rs
use common::models::{Comment, Project, Task, TaskStatus, UserProfile};
use common::routes::Route;
use std::fmt::Write;

use super::{escape, field_error, layout, post_button, submit_button};
use crate::forms::{FieldErrors, ProjectForm};
use crate::notify::Flash;

fn project_form(action: &str, form: &ProjectForm, errors: &FieldErrors, label: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Name <input type="text" name="name" value="{name}" required></label>
{name_error}
<label>Description <textarea name="description">{description}</textarea></label>
{submit}
</form>"#,
        action = escape(action),
        name = escape(&form.name),
        name_error = field_error(errors, "name"),
        description = escape(form.description.as_deref().unwrap_or_default()),
        submit = submit_button(label),
    )
}

pub fn list(
    user: &UserProfile,
    projects: &[Project],
    form: &ProjectForm,
    errors: &FieldErrors,
    flash: Option<&Flash>,
) -> String {
    let mut cards = String::new();
    for project in projects {
        let _ = write!(
            cards,
            r#"<div class="card"><h3><a href="{}">{}</a></h3><p>{}</p></div>"#,
            escape(&Route::Project(project.id.clone()).path()),
            escape(&project.name),
            escape(project.description.as_deref().unwrap_or("No description")),
        );
    }
    if projects.is_empty() {
        cards.push_str("<p>No projects yet.</p>");
    }
    let content = format!(
        r#"<h2>Projects</h2>
{}
<div class="card"><h3>New project</h3>{}</div>"#,
        cards,
        project_form(&Route::Projects.path(), form, errors, "Create project"),
    );
    layout("Projects", user, flash, &content)
}

fn status_options(selected: TaskStatus) -> String {
    TaskStatus::ALL
        .iter()
        .map(|status| {
            let mark = if *status == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, status.as_str(), mark, status.as_str())
        })
        .collect()
}

fn comment_list(task: &Task, comments: &[Comment]) -> String {
    let mut html = String::from(r#"<ul class="comments">"#);
    for comment in comments {
        let hidden = [("task_id", task.id.as_str()), ("project_id", task.project_id.as_str())];
        let target = Route::Comment(comment.id.clone());
        let _ = write!(
            html,
            r#"<li><strong>{author}</strong>: {content} {delete}
<details><summary>Edit</summary><form method="post" action="{update}">
<input type="hidden" name="task_id" value="{task_id}"><input type="hidden" name="project_id" value="{project_id}">
<textarea name="content">{content}</textarea>{save}</form></details></li>"#,
            author = escape(comment.author_name()),
            content = escape(&comment.content),
            delete = post_button(&target.action("delete"), "Delete", &hidden),
            update = escape(&target.path()),
            task_id = escape(&task.id),
            project_id = escape(&task.project_id),
            save = submit_button("Save"),
        );
    }
    html.push_str("</ul>");
    let _ = write!(
        html,
        r#"<form method="post" action="{}"><textarea name="content" placeholder="Add a comment"></textarea>{}</form>"#,
        escape(&Route::Task(task.id.clone()).action("comments")),
        submit_button("Comment"),
    );
    html
}

fn task_card(task: &Task, comments: &[Comment]) -> String {
    let target = Route::Task(task.id.clone());
    format!(
        r#"<div class="card task">
<h4>{title} <span class="status-{status}">{status}</span></h4>
<p>{description}</p>
<form class="inline" method="post" action="{status_action}"><select name="status">{options}</select>{update}</form>
{delete}
<details><summary>Edit</summary>
<form method="post" action="{update_action}">
<label>Title <input type="text" name="title" value="{title}" required></label>
<label>Description <textarea name="description">{description}</textarea></label>
<label>Status <select name="status">{options}</select></label>
<label>Assignee <input type="text" name="assigned_to_id" value="{assignee}"></label>
{save}
</form>
</details>
{comments}
</div>"#,
        title = escape(&task.title),
        status = task.status.as_str(),
        description = escape(task.description.as_deref().unwrap_or_default()),
        status_action = escape(&target.action("status")),
        update_action = escape(&target.path()),
        options = status_options(task.status),
        update = submit_button("Update"),
        delete = post_button(&target.action("delete"), "Delete", &[]),
        assignee = escape(task.assigned_to_id.as_deref().unwrap_or_default()),
        save = submit_button("Save task"),
        comments = comment_list(task, comments),
    )
}

pub fn detail(
    user: &UserProfile,
    project: &Project,
    tasks: &[(Task, Vec<Comment>)],
    flash: Option<&Flash>,
) -> String {
    let route = Route::Project(project.id.clone());
    let path = route.path();
    let edit = ProjectForm {
        name: project.name.clone(),
        description: project.description.clone(),
    };

    let mut task_cards = String::new();
    for (task, comments) in tasks {
        task_cards.push_str(&task_card(task, comments));
    }
    if tasks.is_empty() {
        task_cards.push_str("<p>No tasks in this project.</p>");
    }

    let content = format!(
        r#"<p><a href="{back}">&larr; Projects</a></p>
<h2>{name}</h2>
<p>{description}</p>
<details><summary>Edit project</summary>{edit}</details>
{delete}
<h3>Tasks</h3>
{tasks}
<div class="card"><h3>New task</h3>
<form method="post" action="{task_action}">
<label>Title <input type="text" name="title" required></label>
<label>Description <textarea name="description"></textarea></label>
<label>Status <select name="status">{options}</select></label>
<label>Assignee <input type="text" name="assigned_to_id"></label>
{submit}
</form></div>"#,
        back = Route::Projects.path(),
        name = escape(&project.name),
        description = escape(project.description.as_deref().unwrap_or_default()),
        edit = project_form(&path, &edit, &FieldErrors::default(), "Save project"),
        delete = post_button(&route.action("delete"), "Delete project", &[]),
        tasks = task_cards,
        task_action = escape(&route.action("tasks")),
        options = status_options(TaskStatus::default()),
        submit = submit_button("Create task"),
    );
    layout(&project.name, user, flash, &content)
}
