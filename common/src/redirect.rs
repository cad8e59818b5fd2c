// common/src/redirect.rs
use crate::models::Role;
use crate::routes::{is_safe_origin, Route};

/// Where a freshly signed-in user of `role` lands
pub fn role_landing(role: Role) -> Route {
    match role {
        Role::Admin => Route::Dashboard,
        Role::ProjectManager => Route::Projects,
        Role::Developer => Route::Projects,
        Role::Tester => Route::Projects,
        Role::Viewer => Route::Dashboard,
    }
}

/// Landing route for a raw role claim. Unrecognized roles go to the dashboard.
pub fn landing_route(role_claim: &str) -> Route {
    match role_claim.parse::<Role>() {
        Ok(role) => role_landing(role),
        Err(_) => {
            tracing::warn!("Unrecognized role `{}`, landing on dashboard", role_claim);
            Route::Dashboard
        }
    }
}

/// The single location to redirect to after a successful login.
///
/// A safe `from` location wins when `return_to_origin` is on.
pub fn post_login_destination(role_claim: &str, from: Option<&str>, return_to_origin: bool) -> String {
    match from {
        Some(from) if return_to_origin && is_safe_origin(from) => from.to_string(),
        _ => landing_route(role_claim).path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_landing() {
        let expected = [
            ("ADMIN", Route::Dashboard),
            ("PROJECT_MANAGER", Route::Projects),
            ("DEVELOPER", Route::Projects),
            ("TESTER", Route::Projects),
            ("VIEWER", Route::Dashboard),
        ];
        for (claim, route) in expected {
            assert_eq!(landing_route(claim), route, "role {}", claim);
        }
        for role in Role::ALL {
            assert_eq!(landing_route(role.as_str()), role_landing(role));
        }
    }

    #[test]
    fn test_unknown_roles_fall_back_to_dashboard() {
        for claim in ["", "admin", "Developer", "SUPERUSER", "PROJECT MANAGER", "💥"] {
            assert_eq!(landing_route(claim), Route::Dashboard, "role {:?}", claim);
        }
    }

    #[test]
    fn test_post_login_destination() {
        assert_eq!(post_login_destination("DEVELOPER", None, true), "/projects");
        assert_eq!(post_login_destination("DEVELOPER", Some("/users"), true), "/users");
        assert_eq!(post_login_destination("DEVELOPER", Some("/users"), false), "/projects");
        assert_eq!(post_login_destination("ADMIN", Some("https://evil.example"), true), "/dashboard");
        assert_eq!(post_login_destination("ADMIN", Some("/login"), true), "/dashboard");
    }
}
