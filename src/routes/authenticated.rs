use crate::{
    AppState,
    guard::{GuardedRoute, RouteGuardConfig, guard_middleware},
    handlers,
};
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

/// Authenticated Router Module
///
/// The messaging feature. Any signed-in user passes the guard; anonymous callers are
/// redirected to the login page. Ownership (recipient-only reads) is enforced by the
/// repository.
pub fn authenticated_routes(state: AppState) -> Router<AppState> {
    let guard = GuardedRoute::new(state, RouteGuardConfig::authenticated());

    Router::new()
        // GET /inbox
        .route("/inbox", get(handlers::get_inbox))
        // POST /messages
        .route("/messages", post(handlers::send_message))
        // PATCH /messages/{id}/read
        .route("/messages/{id}/read", patch(handlers::mark_message_read))
        .route_layer(middleware::from_fn_with_state(guard, guard_middleware))
}
