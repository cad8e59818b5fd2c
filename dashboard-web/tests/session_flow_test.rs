// dashboard-web/tests/session_flow_test.rs
use actix::Actor;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, HttpResponse};
use async_trait::async_trait;
use common::models::{
    Comment, Credentials, LoginResponse, NewComment, NewProject, Project, ProjectUpdate,
    Registration, Role, Task, TaskPayload, UserProfile, UserUpdate,
};
use common::token_store::{TOKEN_KEY, USER_KEY};
use common::{unix_now, Config};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dashboard_web::api::{ApiError, Backend};
use dashboard_web::cache::QueryCacheActor;
use dashboard_web::handlers;
use dashboard_web::middleware::{RouteGuard, SessionHandle, SessionProvider};
use dashboard_web::store::{decode_value, encode_value};
use dashboard_web::AppState;

fn mint(role: &str, exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "id": "u1", "email": "a@b.com", "role": role, "iat": exp - 3600, "exp": exp }),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

fn profile(role: Role) -> UserProfile {
    UserProfile {
        id: "u1".into(),
        name: "Ann".into(),
        email: "a@b.com".into(),
        role,
    }
}

fn unauthorized() -> ApiError {
    ApiError::Status {
        status: 401,
        message: "Unauthorized".into(),
    }
}

/// In-memory backend with one account: a@b.com / secret1
struct FakeBackend {
    role: Role,
    name: String,
    token: String,
    revoked: AtomicBool,
    projects: Mutex<Vec<Project>>,
    login_calls: AtomicUsize,
    project_list_calls: AtomicUsize,
}

impl FakeBackend {
    fn new(role: Role) -> Self {
        Self {
            role,
            name: "Ann".into(),
            token: mint(role.as_str(), unix_now() + 3600),
            revoked: AtomicBool::new(false),
            projects: Mutex::new(vec![Project {
                id: "p1".into(),
                name: "Apollo".into(),
                description: Some("Moon shot".into()),
                created_at: None,
            }]),
            login_calls: AtomicUsize::new(0),
            project_list_calls: AtomicUsize::new(0),
        }
    }

    fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn check(&self, token: &str) -> Result<(), ApiError> {
        if token != self.token || self.revoked.load(Ordering::SeqCst) {
            return Err(unauthorized());
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if credentials.email == "a@b.com" && credentials.password == "secret1" {
            Ok(LoginResponse {
                token: self.token.clone(),
                user: UserProfile {
                    name: self.name.clone(),
                    ..profile(self.role)
                },
            })
        } else {
            Err(ApiError::Rejected)
        }
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile, ApiError> {
        if registration.email == "a@b.com" {
            return Err(ApiError::Status {
                status: 409,
                message: "Email already registered".into(),
            });
        }
        Ok(UserProfile {
            id: "u2".into(),
            name: registration.name.clone(),
            email: registration.email.clone(),
            role: registration.role,
        })
    }

    async fn projects(&self, token: &str) -> Result<Vec<Project>, ApiError> {
        self.check(token)?;
        self.project_list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn project(&self, token: &str, id: &str) -> Result<Project, ApiError> {
        self.check(token)?;
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: "Project not found".into(),
            })
    }

    async fn create_project(&self, token: &str, project: &NewProject) -> Result<Project, ApiError> {
        self.check(token)?;
        let mut projects = self.projects.lock().unwrap();
        let created = Project {
            id: format!("p{}", projects.len() + 1),
            name: project.name.clone(),
            description: project.description.clone(),
            created_at: None,
        };
        projects.push(created.clone());
        Ok(created)
    }

    async fn update_project(&self, token: &str, id: &str, update: &ProjectUpdate) -> Result<Project, ApiError> {
        self.check(token)?;
        let mut projects = self.projects.lock().unwrap();
        let project = projects.iter_mut().find(|p| p.id == id).ok_or(ApiError::Status {
            status: 404,
            message: "Project not found".into(),
        })?;
        if let Some(name) = &update.name {
            project.name = name.clone();
        }
        project.description = update.description.clone();
        Ok(project.clone())
    }

    async fn delete_project(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.check(token)?;
        self.projects.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        self.check(token)?;
        Ok(Vec::new())
    }

    async fn create_task(&self, token: &str, _task: &TaskPayload) -> Result<Task, ApiError> {
        self.check(token)?;
        Err(ApiError::Status {
            status: 500,
            message: "tasks are read-only here".into(),
        })
    }

    async fn update_task(&self, token: &str, _id: &str, _task: &TaskPayload) -> Result<Task, ApiError> {
        self.check(token)?;
        Err(ApiError::Status {
            status: 404,
            message: "Task not found".into(),
        })
    }

    async fn delete_task(&self, token: &str, _id: &str) -> Result<(), ApiError> {
        self.check(token)
    }

    async fn task_comments(&self, token: &str, _task_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.check(token)?;
        Ok(Vec::new())
    }

    async fn create_comment(&self, token: &str, _comment: &NewComment) -> Result<Comment, ApiError> {
        self.check(token)?;
        Err(ApiError::Transport("offline".into()))
    }

    async fn update_comment(&self, token: &str, _id: &str, _content: &str) -> Result<Comment, ApiError> {
        self.check(token)?;
        Err(ApiError::Transport("offline".into()))
    }

    async fn delete_comment(&self, token: &str, _id: &str) -> Result<(), ApiError> {
        self.check(token)
    }

    async fn users(&self, token: &str) -> Result<Vec<UserProfile>, ApiError> {
        self.check(token)?;
        Ok(vec![profile(self.role)])
    }

    async fn update_user(&self, token: &str, id: &str, update: &UserUpdate) -> Result<UserProfile, ApiError> {
        self.check(token)?;
        Ok(UserProfile {
            id: id.to_string(),
            name: update.name.clone(),
            email: update.email.clone(),
            role: update.role,
        })
    }
}

fn state(backend: Arc<FakeBackend>, config: Config) -> web::Data<AppState> {
    let cache = QueryCacheActor::new().start();
    web::Data::new(AppState::new(backend, cache, config))
}

macro_rules! dashboard {
    ($state:expr) => {{
        let state = $state;
        let policy = state.guard_policy();
        test::init_service(
            App::new()
                .app_data(state)
                .wrap(SessionProvider::new(false))
                .configure(|cfg| handlers::configure(cfg, policy)),
        )
        .await
    }};
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Session cookies set or removed by `resp`
fn session_cookies<B>(resp: &ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .filter(|c| c.name() == TOKEN_KEY || c.name() == USER_KEY)
        .map(|c| c.into_owned())
        .collect()
}

fn stored_cookies(token: &str, user: &UserProfile) -> [Cookie<'static>; 2] {
    [
        Cookie::new(TOKEN_KEY, encode_value(token)),
        Cookie::new(USER_KEY, encode_value(&serde_json::to_string(user).unwrap())),
    ]
}

async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn login_form(password: &str) -> [(&'static str, String); 2] {
    [("email", "a@b.com".to_string()), ("password", password.to_string())]
}

#[actix_web::test]
async fn test_login_stores_session_and_lands_by_role() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(login_form("secret1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/projects");

    let cookies = session_cookies(&resp);
    assert_eq!(cookies.len(), 2);
    let token = cookies.iter().find(|c| c.name() == TOKEN_KEY).unwrap();
    assert_eq!(decode_value(token.value()).as_deref(), Some(backend.token.as_str()));
    let user = cookies.iter().find(|c| c.name() == USER_KEY).unwrap();
    let user: UserProfile = serde_json::from_str(&decode_value(user.value()).unwrap()).unwrap();
    assert_eq!(user, profile(Role::Developer));

    // the next page load sees the same session
    let mut req = test::TestRequest::get().uri("/projects");
    for cookie in cookies {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Apollo"));
    assert!(body.contains("Ann"));
}

#[actix_web::test]
async fn test_admin_lands_on_dashboard() {
    let backend = Arc::new(FakeBackend::new(Role::Admin));
    let app = dashboard!(state(backend, Config::default()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(login_form("secret1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/dashboard");
}

#[actix_web::test]
async fn test_protected_route_without_session_redirects_to_login() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend, Config::default()));

    for (uri, expected) in [
        ("/dashboard", "/login?from=%2Fdashboard"),
        ("/projects/7?tab=tasks", "/login?from=%2Fprojects%2F7%3Ftab%3Dtasks"),
        ("/users", "/login?from=%2Fusers"),
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&resp), expected);
    }

    // public pages stay reachable
    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/register").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_login_returns_to_requested_page() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let req = test::TestRequest::get().uri("/login?from=%2Fprojects%2Fp1").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains(r#"name="from" value="/projects/p1""#));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([
            ("email", "a@b.com"),
            ("password", "secret1"),
            ("from", "/projects/p1"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/projects/p1");

    // off-site origins are ignored
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([
            ("email", "a@b.com"),
            ("password", "secret1"),
            ("from", "//evil.example/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/projects");
}

#[actix_web::test]
async fn test_rejected_login_leaves_session_untouched() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend, Config::default()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(login_form("wrong-password"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookies(&resp).is_empty());
    let body = body_text(resp).await;
    assert!(body.contains("Invalid email or password"));
}

#[actix_web::test]
async fn test_invalid_login_form_never_reaches_backend() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "not-an-email"), ("password", "123")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.login_calls.load(Ordering::SeqCst), 0);
    let body = body_text(resp).await;
    assert!(body.contains("Invalid email"));
    assert!(body.contains("Password must be at least 6 characters"));
}

#[actix_web::test]
async fn test_logout_clears_both_cookies() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let mut req = test::TestRequest::post().uri("/logout");
    for cookie in stored_cookies(&backend.token, &profile(Role::Developer)) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let removed = session_cookies(&resp);
    assert_eq!(removed.len(), 2);
    assert!(removed.iter().all(|c| c.value().is_empty()));

    // the next navigation carries only what logout left behind
    let mut req = test::TestRequest::get().uri("/projects");
    for cookie in removed {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?from=%2Fprojects");
    assert_eq!(backend.project_list_calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_login_refuses_token_the_guard_would_reject() {
    for token in ["opaque-token".to_string(), mint("DEVELOPER", unix_now() - 60)] {
        let backend = Arc::new(FakeBackend::new(Role::Developer).with_token(&token));
        let app = dashboard!(state(backend.clone(), Config::default()));

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(login_form("secret1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(session_cookies(&resp).is_empty());
        let body = body_text(resp).await;
        assert!(body.contains("Login failed"));
        assert!(!body.contains("Login successful"));
    }
}

#[actix_web::test]
async fn test_login_that_cannot_be_stored_keeps_session_untouched() {
    // the profile no longer fits in a cookie
    let backend = Arc::new(FakeBackend::new(Role::Developer).with_name(&"A".repeat(4000)));
    let app = dashboard!(state(backend, Config::default()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(login_form("secret1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(session_cookies(&resp).iter().all(|c| c.value().is_empty()));
    let body = body_text(resp).await;
    assert!(body.contains("Login failed"));
}

#[actix_web::test]
async fn test_blocked_form_post_does_not_become_return_target() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let req = test::TestRequest::post().uri("/projects/p1/delete").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(backend.projects.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_expired_token_is_cleared_and_redirected() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend, Config::default()));

    let expired = mint("DEVELOPER", unix_now() - 60);
    let mut req = test::TestRequest::get().uri("/dashboard");
    for cookie in stored_cookies(&expired, &profile(Role::Developer)) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?from=%2Fdashboard");
    let removed = session_cookies(&resp);
    assert_eq!(removed.len(), 2);
    assert!(removed.iter().all(|c| c.value().is_empty()));
}

#[actix_web::test]
async fn test_presence_is_enough_when_expiry_is_not_enforced() {
    let backend = Arc::new(FakeBackend::new(Role::Viewer).with_token("opaque-token"));
    let mut config = Config::default();
    config.auth.enforce_expiry = false;
    let app = dashboard!(state(backend, config));

    let mut req = test::TestRequest::get().uri("/dashboard");
    for cookie in stored_cookies("opaque-token", &profile(Role::Viewer)) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("You are logged in as <strong>VIEWER</strong>"));
}

#[actix_web::test]
async fn test_half_stored_session_is_wiped() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let req = test::TestRequest::get()
        .uri("/projects")
        .cookie(Cookie::new(TOKEN_KEY, encode_value(&backend.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login?from=%2Fprojects");
    assert!(session_cookies(&resp).iter().all(|c| c.value().is_empty()));
}

#[actix_web::test]
async fn test_backend_rejecting_token_signs_out() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));
    backend.revoked.store(true, Ordering::SeqCst);

    let mut req = test::TestRequest::get().uri("/projects");
    for cookie in stored_cookies(&backend.token, &profile(Role::Developer)) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(session_cookies(&resp).len(), 2);
}

#[actix_web::test]
async fn test_user_management_is_admin_only() {
    let backend = Arc::new(FakeBackend::new(Role::Tester));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let mut req = test::TestRequest::get().uri("/users");
    for cookie in stored_cookies(&backend.token, &profile(Role::Tester)) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
}

#[actix_web::test]
async fn test_admin_updating_self_refreshes_stored_profile() {
    let backend = Arc::new(FakeBackend::new(Role::Admin));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let mut req = test::TestRequest::post()
        .uri("/users/u1")
        .set_form([("name", "Annie"), ("email", "a@b.com"), ("role", "ADMIN")]);
    for cookie in stored_cookies(&backend.token, &profile(Role::Admin)) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(location(&resp), "/users");

    let cookies = session_cookies(&resp);
    assert_eq!(cookies.len(), 1);
    let user: UserProfile = serde_json::from_str(&decode_value(cookies[0].value()).unwrap()).unwrap();
    assert_eq!(user.name, "Annie");
}

#[actix_web::test]
async fn test_project_list_is_cached_until_a_mutation() {
    let backend = Arc::new(FakeBackend::new(Role::ProjectManager));
    let app = dashboard!(state(backend.clone(), Config::default()));
    let cookies = stored_cookies(&backend.token, &profile(Role::ProjectManager));

    for _ in 0..2 {
        let mut req = test::TestRequest::get().uri("/projects");
        for cookie in cookies.clone() {
            req = req.cookie(cookie);
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(backend.project_list_calls.load(Ordering::SeqCst), 1);

    let mut req = test::TestRequest::post()
        .uri("/projects")
        .set_form([("name", "Gemini"), ("description", "")]);
    for cookie in cookies.clone() {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(location(&resp), "/projects/p2");

    let mut req = test::TestRequest::get().uri("/projects");
    for cookie in cookies {
        req = req.cookie(cookie);
    }
    let body = body_text(test::call_service(&app, req.to_request()).await).await;
    assert!(body.contains("Gemini"));
    assert_eq!(backend.project_list_calls.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn test_failed_mutation_leaves_error_notification() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend.clone(), Config::default()));

    let mut req = test::TestRequest::post()
        .uri("/projects/p1/tasks")
        .set_form([("title", "Write docs")]);
    for cookie in stored_cookies(&backend.token, &profile(Role::Developer)) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(location(&resp), "/projects/p1");
    let flash = resp.response().cookies().find(|c| c.name() == "flash").unwrap();
    let flash = decode_value(flash.value()).unwrap();
    assert!(flash.contains("Failed to create task"));
}

#[actix_web::test]
async fn test_register_redirects_to_login() {
    let backend = Arc::new(FakeBackend::new(Role::Developer));
    let app = dashboard!(state(backend, Config::default()));

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form([
            ("name", "Bob"),
            ("email", "bob@b.com"),
            ("password", "secret1"),
            ("role", "TESTER"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login");
    assert!(session_cookies(&resp).is_empty());

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form([
            ("name", "Ann"),
            ("email", "a@b.com"),
            ("password", "secret1"),
            ("role", "TESTER"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_text(resp).await;
    assert!(body.contains("Email already registered"));
}

#[actix_web::test]
async fn test_session_outside_provider_is_an_error() {
    let app = test::init_service(App::new().route(
        "/whoami",
        web::get().to(|session: SessionHandle| async move {
            HttpResponse::Ok().body(session.user().map(|u| u.name).unwrap_or_default())
        }),
    ))
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let auth = Config::default().auth;
    let app = test::init_service(
        App::new().service(
            web::scope("")
                .wrap(RouteGuard::new((&auth).into()))
                .route("/dashboard", web::get().to(|| async { HttpResponse::Ok().finish() })),
        ),
    )
    .await;
    let err = test::try_call_service(&app, test::TestRequest::get().uri("/dashboard").to_request())
        .await
        .unwrap_err();
    assert_eq!(err.as_response_error().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
