use crate::{
    AppState,
    guard::{GuardedRoute, RouteGuardConfig, guard_middleware},
    handlers,
    models::Role,
};
use axum::{Router, middleware, routing::get};

/// Admin Router Module
///
/// Nested under `/admin`. Non-admins are redirected to their own dashboard (admins have
/// no dashboard of their own yet, so the fallback for unknown roles is `/`). Handlers
/// repeat the role check.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    let guard = GuardedRoute::new(state, RouteGuardConfig::for_roles([Role::Admin]));

    Router::new()
        // GET /admin/stats
        .route("/stats", get(handlers::get_admin_stats))
        .route_layer(middleware::from_fn_with_state(guard, guard_middleware))
}
