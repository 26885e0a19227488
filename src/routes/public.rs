use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Unguarded endpoints: liveness, registration, and the session projection clients
/// poll to decide what to render.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /register
        // Signs up a candidate or employer through the identity provider.
        .route("/register", post(handlers::register_user))
        // GET /session
        // Who is calling, if anyone. Never rejects.
        .route("/session", get(handlers::get_session))
}
