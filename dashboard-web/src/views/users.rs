// dashboard-web/src/views/users.rs
use common::models::UserProfile;
use common::routes::Route;
use std::fmt::Write;

use super::auth::role_options;
use super::{escape, layout, submit_button};
use crate::notify::Flash;

/// Admin-only user management table
pub fn list(admin: &UserProfile, users: &[UserProfile], flash: Option<&Flash>) -> String {
    let mut rows = String::new();
    for user in users {
        let _ = write!(
            rows,
            r#"<tr>
<td>{name}</td><td>{email}</td><td>{role}</td>
<td><form class="inline" method="post" action="{action}">
<input type="text" name="name" value="{name}">
<input type="email" name="email" value="{email}">
<select name="role">{roles}</select>
{save}
</form></td>
</tr>"#,
            action = escape(&Route::User(user.id.clone()).path()),
            name = escape(&user.name),
            email = escape(&user.email),
            role = user.role.label(),
            roles = role_options(user.role.as_str()),
            save = submit_button("Save"),
        );
    }
    let content = format!(
        r#"<h2>Users</h2>
<table class="card">
<thead><tr><th>Name</th><th>Email</th><th>Role</th><th></th></tr></thead>
<tbody>{}</tbody>
</table>"#,
        rows
    );
    layout("Users", admin, flash, &content)
}
