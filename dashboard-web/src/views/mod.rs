// dashboard-web/src/views/mod.rs
//! Server-rendered HTML for the dashboard pages.

pub mod auth;
pub mod dashboard;
pub mod projects;
pub mod users;

use common::models::UserProfile;
use common::routes::Route;
use std::fmt::Write;

use crate::forms::FieldErrors;
use crate::notify::{Flash, FlashLevel};

/// Escape text for HTML element content and quoted attribute values
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn flash_banner(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => {
            let class = match flash.level {
                FlashLevel::Success => "flash-success",
                FlashLevel::Error => "flash-error",
            };
            format!(r#"<div class="flash {}" role="status">{}</div>"#, class, escape(&flash.message))
        }
        None => String::new(),
    }
}

pub(crate) fn field_error(errors: &FieldErrors, field: &str) -> String {
    match errors.get(field) {
        Some(message) => format!(r#"<p class="field-error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

/// Submit control that disables itself once its form is submitted
pub(crate) fn submit_button(label: &str) -> String {
    format!(
        r#"<button type="submit" onclick="this.disabled=true;this.form.submit();">{}</button>"#,
        escape(label)
    )
}

/// Inline form posting to `action` with a single button
pub(crate) fn post_button(action: &str, label: &str, hidden: &[(&str, &str)]) -> String {
    let mut fields = String::new();
    for (name, value) in hidden {
        let _ = write!(
            fields,
            r#"<input type="hidden" name="{}" value="{}">"#,
            escape(name),
            escape(value)
        );
    }
    format!(
        r#"<form class="inline" method="post" action="{}">{}{}</form>"#,
        escape(action),
        fields,
        submit_button(label)
    )
}

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{} · TeamTasker</title>
<link rel="stylesheet" href="/assets/dashboard.css">
</head>
<body>
{}
</body>
</html>"#,
        escape(title),
        body
    )
}

/// Page outside the session: login and registration
pub fn public_page(title: &str, flash: Option<&Flash>, content: &str) -> String {
    let body = format!(
        r#"<main class="auth">{}{}</main>"#,
        flash_banner(flash),
        content
    );
    document(title, &body)
}

/// Page inside the session, with the navigation bar
pub fn layout(title: &str, user: &UserProfile, flash: Option<&Flash>, content: &str) -> String {
    let mut nav = format!(
        r#"<a href="{}">Dashboard</a> <a href="{}">Projects</a>"#,
        Route::Dashboard.path(),
        Route::Projects.path()
    );
    if user.is_admin() {
        let _ = write!(nav, r#" <a href="{}">Users</a>"#, Route::Users.path());
    }
    let body = format!(
        r#"<header class="navbar"><h1>TeamTasker</h1><nav>{} <span class="who">{} ({})</span> {}</nav></header>
<main>{}{}</main>"#,
        nav,
        escape(&user.name),
        escape(user.role.label()),
        post_button(&Route::Logout.path(), "Logout", &[]),
        flash_banner(flash),
        content
    );
    document(title, &body)
}
