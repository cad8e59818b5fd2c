// dashboard-web/src/middleware/guard.rs
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage, HttpResponse,
};
use common::guard::{GuardDecision, GuardPolicy};
use common::models::SessionState;
use common::{unix_now, AuthError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::error::DashboardError;
use crate::middleware::session::SessionHandle;

/// Wraps the protected part of the dashboard. Requests without a usable
/// session are sent to `/login?from=<requested>` and never reach a handler.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    policy: GuardPolicy,
}

impl RouteGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        Self { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RouteGuardMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware {
            service,
            policy: self.policy,
        }))
    }
}

pub struct RouteGuardMiddleware<S> {
    service: S,
    policy: GuardPolicy,
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = req.extensions().get::<SessionHandle>().cloned();
        let session = match session {
            Some(session) => session,
            None => {
                tracing::error!("RouteGuard installed without SessionProvider on {}", req.path());
                return Box::pin(async {
                    Err(DashboardError::Auth(AuthError::ContextUnavailable).into())
                });
            }
        };

        let requested = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.path().to_string());
        // a 303 after login replays as GET, so only pages can be returned to
        let origin = if [Method::GET, Method::HEAD].contains(req.method()) {
            requested.as_str()
        } else {
            ""
        };

        let decision = session.check_access(origin, self.policy, unix_now());

        if let GuardDecision::RedirectToLogin { state, .. } = &decision {
            if matches!(state, SessionState::Expired | SessionState::Invalid) {
                tracing::info!("Clearing {:?} session before redirecting to login", state);
                session.clear();
            }
            tracing::warn!("Blocked unauthenticated {} {}", req.method(), requested);

            let location = decision.location().unwrap_or_default();
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
