use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::{GuardDecision, Redirection, RouteGuardConfig, evaluate};
use crate::{AppState, session::Session};

/// Response header carrying the user-facing notification for a guard redirect.
pub const GUARD_NOTICE_HEADER: &str = "x-guard-notice";

/// GuardedRoute
///
/// Middleware state for one guarded router: the shared application state (to resolve
/// the session) plus the route's guard declaration.
#[derive(Clone)]
pub struct GuardedRoute {
    pub app: AppState,
    pub config: Arc<RouteGuardConfig>,
}

impl GuardedRoute {
    pub fn new(app: AppState, config: RouteGuardConfig) -> Self {
        Self {
            app,
            config: Arc::new(config),
        }
    }
}

impl IntoResponse for Redirection {
    /// 303 to the target, with the notification text in `x-guard-notice`.
    fn into_response(self) -> Response {
        (
            [(
                HeaderName::from_static(GUARD_NOTICE_HEADER),
                HeaderValue::from_static(self.reason.message()),
            )],
            Redirect::to(&self.to),
        )
            .into_response()
    }
}

/// guard_middleware
///
/// Resolves the request's session and applies the route's guard. `Render` forwards the
/// request untouched; every other decision short-circuits. Each HTTP request is its own
/// transition, so the notification header is attached to every redirect response.
pub async fn guard_middleware(
    State(route): State<GuardedRoute>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let session = match Session::from_request_parts(&mut parts, &route.app).await {
        Ok(session) => session,
        Err(never) => match never {},
    };

    let decision = evaluate(&session, &route.config);
    tracing::debug!(uri = %parts.uri, ?decision, "guard decision");

    match decision {
        GuardDecision::Render => next.run(Request::from_parts(parts, body)).await,
        GuardDecision::Loading => {
            (StatusCode::SERVICE_UNAVAILABLE, [(header::RETRY_AFTER, "1")]).into_response()
        }
        GuardDecision::Redirect(redirection) => {
            tracing::info!(
                uri = %parts.uri,
                target_path = %redirection.to,
                reason = ?redirection.reason,
                "guard redirect"
            );
            redirection.into_response()
        }
    }
}
