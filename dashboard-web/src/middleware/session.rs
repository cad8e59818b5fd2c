// dashboard-web/src/middleware/session.rs
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use common::guard::{check_access, GuardDecision, GuardPolicy};
use common::models::{Session, UserProfile};
use common::session::AuthSession;
use common::{AuthError, SessionError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::DashboardError;
use crate::store::CookieStore;

/// The request's auth session. Obtain it only as a handler argument (or from
/// request extensions) below [`SessionProvider`].
#[derive(Clone)]
pub struct SessionHandle {
    inner: Rc<RefCell<AuthSession<CookieStore>>>,
}

impl SessionHandle {
    pub fn new(session: AuthSession<CookieStore>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(session)),
        }
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.borrow().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.borrow().token().map(str::to_string)
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.borrow().current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().is_authenticated()
    }

    /// The active session, or [`DashboardError::SignedOut`]
    pub fn require(&self) -> Result<Session, DashboardError> {
        self.current().ok_or(DashboardError::SignedOut)
    }

    pub fn set_session(&self, user: UserProfile, token: String) -> Result<(), SessionError> {
        self.inner.borrow_mut().set_session(user, token)
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    pub fn set_user(&self, user: Option<UserProfile>) -> Result<(), SessionError> {
        self.inner.borrow_mut().set_user(user)
    }

    pub fn check_access(&self, requested: &str, policy: GuardPolicy, now: i64) -> GuardDecision {
        let session = self.inner.borrow();
        check_access(&*session, requested, policy, now)
    }

    fn flush_into<B>(&self, response: &mut HttpResponse<B>) {
        self.inner.borrow_mut().store_mut().flush_into(response);
    }
}

impl FromRequest for SessionHandle {
    type Error = DashboardError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let handle = req.extensions().get::<SessionHandle>().cloned();
        ready(handle.ok_or_else(|| {
            tracing::error!("Session requested outside SessionProvider on {}", req.path());
            DashboardError::Auth(AuthError::ContextUnavailable)
        }))
    }
}

/// Loads the session from the browser's cookies before the handler runs and
/// writes its changes back onto the response.
#[derive(Debug, Clone, Default)]
pub struct SessionProvider {
    secure_cookies: bool,
}

impl SessionProvider {
    pub fn new(secure_cookies: bool) -> Self {
        Self { secure_cookies }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionProvider
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionProviderMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionProviderMiddleware {
            service,
            secure_cookies: self.secure_cookies,
        }))
    }
}

pub struct SessionProviderMiddleware<S> {
    service: S,
    secure_cookies: bool,
}

impl<S, B> Service<ServiceRequest> for SessionProviderMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let store = CookieStore::from_request(req.request(), self.secure_cookies);
        let session = SessionHandle::new(AuthSession::load(store));
        req.extensions_mut().insert(session.clone());

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            session.flush_into(res.response_mut());
            Ok(res)
        })
    }
}
