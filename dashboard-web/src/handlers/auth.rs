// dashboard-web/src/handlers/auth.rs
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use common::guard::GuardPolicy;
use common::models::{LoginResponse, UserProfile};
use common::redirect::post_login_destination;
use common::routes::Route;
use common::{unix_now, AuthError};
use serde::Deserialize;

use crate::api::ApiError;
use crate::forms::{FieldErrors, LoginForm, RegisterForm};
use crate::middleware::SessionHandle;
use crate::notify::{self, Flash};
use crate::resources::Resources;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    from: Option<String>,
}

/// Store the session only if the route guard will accept its token
fn start_session(
    session: &SessionHandle,
    policy: GuardPolicy,
    user: UserProfile,
    token: String,
) -> Result<(), AuthError> {
    policy.admit(&token, unix_now())?;
    session.set_session(user, token)?;
    Ok(())
}

pub async fn login_page(
    req: HttpRequest,
    session: SessionHandle,
    state: web::Data<AppState>,
    query: web::Query<LoginQuery>,
) -> HttpResponse {
    let from = query.into_inner().from;

    if let Some(current) = session.current() {
        let destination = post_login_destination(
            current.user.role.as_str(),
            from.as_deref(),
            state.config.auth.return_to_origin,
        );
        return notify::redirect(&destination, None);
    }

    let form = LoginForm {
        from,
        ..Default::default()
    };
    notify::page(&req, StatusCode::OK, None, |flash| {
        views::auth::login(&form, &FieldErrors::default(), flash)
    })
}

pub async fn login(
    req: HttpRequest,
    session: SessionHandle,
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> HttpResponse {
    let form = form.into_inner();
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            return notify::page(&req, StatusCode::BAD_REQUEST, None, |flash| {
                views::auth::login(&form, &errors, flash)
            })
        }
    };

    match state.backend.login(&credentials).await {
        Ok(LoginResponse { token, user }) => {
            let destination = post_login_destination(
                user.role.as_str(),
                form.from.as_deref(),
                state.config.auth.return_to_origin,
            );
            let user_id = user.id.clone();
            match start_session(&session, state.guard_policy(), user, token) {
                Ok(()) => {
                    tracing::info!("User {} signed in, redirecting to {}", user_id, destination);
                    notify::redirect(&destination, Some(Flash::success("Login successful")))
                }
                Err(e) => {
                    tracing::error!("Login for user {} produced an unusable session: {}", user_id, e);
                    let status = match e {
                        AuthError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
                        _ => StatusCode::BAD_GATEWAY,
                    };
                    let form = LoginForm {
                        password: String::new(),
                        ..form
                    };
                    notify::page(
                        &req,
                        status,
                        Some(Flash::error("Login failed: the session could not be started")),
                        |flash| views::auth::login(&form, &FieldErrors::default(), flash),
                    )
                }
            }
        }
        Err(ApiError::Rejected) => {
            tracing::warn!("Login for {} failed: {}", credentials.email, AuthError::AuthRejected);
            let form = LoginForm {
                password: String::new(),
                ..form
            };
            notify::page(
                &req,
                StatusCode::UNAUTHORIZED,
                Some(Flash::error("Invalid email or password")),
                |flash| views::auth::login(&form, &FieldErrors::default(), flash),
            )
        }
        Err(e) => {
            tracing::error!("Login request failed: {}", e);
            notify::page(
                &req,
                StatusCode::BAD_GATEWAY,
                Some(Flash::error("Login is unavailable right now, please try again")),
                |flash| views::auth::login(&form, &FieldErrors::default(), flash),
            )
        }
    }
}

pub async fn register_page(req: HttpRequest) -> HttpResponse {
    notify::page(&req, StatusCode::OK, None, |flash| {
        views::auth::register(&RegisterForm::default(), &FieldErrors::default(), flash)
    })
}

pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
) -> HttpResponse {
    let form = form.into_inner();
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => {
            return notify::page(&req, StatusCode::BAD_REQUEST, None, |flash| {
                views::auth::register(&form, &errors, flash)
            })
        }
    };

    match state.backend.register(&registration).await {
        Ok(user) => {
            tracing::info!("Registered user {} as {}", user.id, user.role);
            notify::redirect(
                &Route::Login.path(),
                Some(Flash::success("Registration successful. Please sign in.")),
            )
        }
        Err(e) => {
            tracing::warn!("Registration for {} failed: {}", registration.email, e);
            let (status, message) = match e {
                ApiError::Status { status, message } if status < 500 => {
                    (StatusCode::BAD_REQUEST, format!("Registration failed: {}", message))
                }
                _ => (StatusCode::BAD_GATEWAY, "Registration failed, please try again".to_string()),
            };
            notify::page(&req, status, Some(Flash::error(message)), |flash| {
                views::auth::register(&form, &FieldErrors::default(), flash)
            })
        }
    }
}

pub async fn logout(session: SessionHandle, state: web::Data<AppState>) -> HttpResponse {
    if let Some(token) = session.token() {
        Resources::new(&state, &token).forget_session().await;
    }
    session.clear();
    notify::redirect(&Route::Login.path(), Some(Flash::success("You have been signed out")))
}
