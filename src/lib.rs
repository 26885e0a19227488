use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod session;

// Routing segregated by access level (public, authenticated, dashboards, admin).
pub mod routes;
use routes::{admin, authenticated, dashboards, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use guard::{GuardDecision, RouteGuardConfig, evaluate};
pub use repository::{PostgresRepository, RepositoryState};
pub use session::{Session, SessionStore};

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers and `ToSchema`
/// models, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_session, handlers::register_user,
        handlers::get_candidate_dashboard, handlers::get_employer_dashboard,
        handlers::get_admin_stats, handlers::get_inbox, handlers::send_message,
        handlers::mark_message_read
    ),
    components(
        schemas(
            models::Role, models::User, models::Message, models::InboxEntry,
            models::RegisterUserRequest, models::SendMessageRequest, models::InboxCounts,
            models::DashboardSummary, models::AdminDashboardStats,
            session::Session, session::SessionUser,
        )
    ),
    tags(
        (name = "job-portal", description = "Job Portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single shared container for the services every request may need.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer.
    pub repo: RepositoryState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing tree. Each protected group carries its own guard layer;
/// observability and CORS layers wrap everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(guard::GUARD_NOTICE_HEADER)]);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes(state.clone()))
        .merge(dashboards::dashboard_routes(state.clone()))
        .nest("/admin", admin::admin_routes(state.clone()))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// Builds the per-request span so every log line of a request shares its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
