// dashboard-web/src/views/auth.rs
use common::models::Role;
use common::routes::Route;

use super::{escape, field_error, public_page, submit_button};
use crate::forms::{FieldErrors, LoginForm, RegisterForm};
use crate::notify::Flash;

pub fn login(form: &LoginForm, errors: &FieldErrors, flash: Option<&Flash>) -> String {
    let from = match form.from.as_deref() {
        Some(from) if !from.is_empty() => {
            format!(r#"<input type="hidden" name="from" value="{}">"#, escape(from))
        }
        _ => String::new(),
    };
    let content = format!(
        r#"<h2>Sign in</h2>
<form method="post" action="{action}">
{from}
<label>Email <input type="email" name="email" value="{email}" required></label>
{email_error}
<label>Password <input type="password" name="password" required></label>
{password_error}
{submit}
</form>
<p>No account yet? <a href="{register}">Register</a></p>"#,
        action = Route::Login.path(),
        from = from,
        email = escape(&form.email),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
        submit = submit_button("Login"),
        register = Route::Register.path(),
    );
    public_page("Login", flash, &content)
}

pub(crate) fn role_options(selected: &str) -> String {
    Role::ALL
        .iter()
        .map(|role| {
            let mark = if role.as_str() == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, role.as_str(), mark, role.label())
        })
        .collect()
}

pub fn register(form: &RegisterForm, errors: &FieldErrors, flash: Option<&Flash>) -> String {
    let content = format!(
        r#"<h2>Create an account</h2>
<form method="post" action="{action}">
<label>Name <input type="text" name="name" value="{name}" required></label>
{name_error}
<label>Email <input type="email" name="email" value="{email}" required></label>
{email_error}
<label>Password <input type="password" name="password" required></label>
{password_error}
<label>Role <select name="role"><option value="">Select a role</option>{roles}</select></label>
{role_error}
{submit}
</form>
<p>Already registered? <a href="{login}">Sign in</a></p>"#,
        action = Route::Register.path(),
        name = escape(&form.name),
        name_error = field_error(errors, "name"),
        email = escape(&form.email),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
        roles = role_options(&form.role),
        role_error = field_error(errors, "role"),
        submit = submit_button("Register"),
        login = Route::Login.path(),
    );
    public_page("Register", flash, &content)
}
