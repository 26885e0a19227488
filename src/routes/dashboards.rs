use crate::{
    AppState,
    guard::{
        CANDIDATE_DASHBOARD_PATH, EMPLOYER_DASHBOARD_PATH, GuardedRoute, RouteGuardConfig,
        guard_middleware,
    },
    handlers,
    models::Role,
};
use axum::{Router, middleware, routing::get};

/// Dashboards Router Module
///
/// One router per role, each behind its own guard. A signed-in user who opens the
/// other role's dashboard is bounced to their own.
pub fn dashboard_routes(state: AppState) -> Router<AppState> {
    let candidate =
        GuardedRoute::new(state.clone(), RouteGuardConfig::for_roles([Role::Candidate]));
    let employer = GuardedRoute::new(state, RouteGuardConfig::for_roles([Role::Employer]));

    let candidate_routes = Router::new()
        .route(CANDIDATE_DASHBOARD_PATH, get(handlers::get_candidate_dashboard))
        .route_layer(middleware::from_fn_with_state(candidate, guard_middleware));

    let employer_routes = Router::new()
        .route(EMPLOYER_DASHBOARD_PATH, get(handlers::get_employer_dashboard))
        .route_layer(middleware::from_fn_with_state(employer, guard_middleware));

    candidate_routes.merge(employer_routes)
}
