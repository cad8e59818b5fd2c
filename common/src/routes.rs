// common/src/routes.rs
use url::{form_urlencoded, Url};

/// Pages of the dashboard and the targets its forms post to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Logout,
    Dashboard,
    Projects,
    Project(String),
    Task(String),
    Comment(String),
    Users,
    User(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Logout => "/logout".to_string(),
            Route::Project(id) => format!("/projects/{}", encode_segment(id)),
            Route::Task(id) => format!("/tasks/{}", encode_segment(id)),
            Route::Comment(id) => format!("/comments/{}", encode_segment(id)),
            Route::Users => "/users".to_string(),
            Route::User(id) => format!("/users/{}", encode_segment(id)),
        }
    }

    /// Sub-resource of this route, e.g. `/tasks/7/status`
    pub fn action(&self, name: &str) -> String {
        format!("{}/{}", self.path(), encode_segment(name))
    }
}

// Percent-encodes `segment` as exactly one path segment
fn encode_segment(segment: &str) -> String {
    let mut url = match Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return String::new(),
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

/// `/login?from=<requested>`; the requested location rides along for return-after-login
pub fn login_with_origin(from: &str) -> String {
    if from.is_empty() {
        return Route::Login.path();
    }
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("from", from)
        .finish();
    format!("{}?{}", Route::Login.path(), query)
}

/// Only same-site absolute paths outside the auth pages may be redirected to
pub fn is_safe_origin(from: &str) -> bool {
    if !from.starts_with('/') || from.starts_with("//") || from.starts_with("/\\") {
        return false;
    }
    if from.chars().any(|c| c.is_control()) {
        return false;
    }
    let path = from.split(['?', '#']).next().unwrap_or_default();
    let auth_pages = [Route::Login.path(), Route::Register.path()];
    !auth_pages.iter().any(|page| path == page || path.starts_with(&format!("{}/", page)))
}
