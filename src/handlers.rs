use crate::{
    AppState,
    auth::AuthUser,
    models::{
        AdminDashboardStats, DashboardSummary, InboxEntry, Message, RegisterUserRequest, Role,
        SendMessageRequest, User,
    },
    session::Session,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

/// Maximum number of messages returned by `GET /inbox`.
pub const INBOX_PAGE_SIZE: i64 = 50;
/// Number of recent messages embedded in a dashboard.
pub const DASHBOARD_RECENT_MESSAGES: i64 = 5;

/// Minimal body of the identity provider's signup response.
#[derive(Deserialize)]
struct SignupResponse {
    id: Uuid,
}

// --- Session ---

/// get_session
///
/// [Public Route] The auth-state projection consumed by clients: whether the caller is
/// signed in, and as whom. Never fails; anonymous callers get an empty session.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Current session", body = Session))
)]
pub async fn get_session(session: Session) -> Json<Session> {
    Json(session)
}

/// register_user
///
/// [Public Route] Creates the account at the identity provider, then mirrors it into
/// `profiles` under the provider's user id. Only candidates and employers can sign up;
/// admins are provisioned out of band.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Registered", body = User),
        (status = 400, description = "Rejected by the identity provider or role not allowed")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<User>, StatusCode> {
    if payload.role == Role::Admin {
        return Err(StatusCode::BAD_REQUEST);
    }

    let (Some(provider_url), Some(provider_key)) = (
        state.config.auth_provider_url.as_deref(),
        state.config.auth_provider_key.as_deref(),
    ) else {
        tracing::error!("registration attempted without an identity provider configured");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    let client = reqwest::Client::new();
    let signup_url = format!("{}/auth/v1/signup", provider_url.trim_end_matches('/'));

    let response = client
        .post(signup_url)
        .header("apikey", provider_key)
        .json(&serde_json::json!({ "email": payload.email, "password": payload.password }))
        .send()
        .await
        .map_err(|e| {
            tracing::error!("identity provider unreachable: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !response.status().is_success() {
        // Existing email, weak password, etc.
        return Err(StatusCode::BAD_REQUEST);
    }

    let account = response.json::<SignupResponse>().await.map_err(|e| {
        tracing::error!("unexpected signup response: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let new_user = User {
        id: account.id,
        email: payload.email,
        role: payload.role.as_str().to_string(),
    };

    state
        .repo
        .create_user(new_user)
        .await
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// --- Dashboards ---

async fn build_dashboard(
    state: &AppState,
    user: &AuthUser,
    role: Role,
) -> Result<Json<DashboardSummary>, StatusCode> {
    // The guard already enforces this; handlers check again so they stay safe if mounted elsewhere.
    if user.role != Some(role) {
        return Err(StatusCode::FORBIDDEN);
    }

    let inbox = state.repo.get_inbox_counts(user.id).await;
    let recent_messages = state
        .repo
        .get_inbox(user.id, DASHBOARD_RECENT_MESSAGES)
        .await;

    Ok(Json(DashboardSummary {
        user_id: user.id,
        role,
        inbox,
        recent_messages,
    }))
}

/// get_candidate_dashboard
///
/// [Candidate Route] Inbox summary for a candidate.
#[utoipa::path(
    get,
    path = "/dashboard/candidate",
    responses(
        (status = 200, description = "Candidate dashboard", body = DashboardSummary),
        (status = 303, description = "Redirected by the access guard")
    )
)]
pub async fn get_candidate_dashboard(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, StatusCode> {
    build_dashboard(&state, &user, Role::Candidate).await
}

/// get_employer_dashboard
///
/// [Employer Route] Inbox summary for an employer.
#[utoipa::path(
    get,
    path = "/dashboard/employer",
    responses(
        (status = 200, description = "Employer dashboard", body = DashboardSummary),
        (status = 303, description = "Redirected by the access guard")
    )
)]
pub async fn get_employer_dashboard(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, StatusCode> {
    build_dashboard(&state, &user, Role::Employer).await
}

/// get_admin_stats
///
/// [Admin Route] Platform counters.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Stats", body = AdminDashboardStats),
        (status = 303, description = "Redirected by the access guard")
    )
)]
pub async fn get_admin_stats(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, StatusCode> {
    if role != Some(Role::Admin) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_stats().await))
}

// --- Messaging ---

/// get_inbox
///
/// [Authenticated Route] Received messages, newest first.
#[utoipa::path(
    get,
    path = "/inbox",
    responses((status = 200, description = "My inbox", body = [InboxEntry]))
)]
pub async fn get_inbox(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<InboxEntry>> {
    Json(state.repo.get_inbox(id, INBOX_PAGE_SIZE).await)
}

/// send_message
///
/// [Authenticated Route] Sends a direct message. Candidates and employers can message
/// each other freely; the body must not be blank and the recipient must exist.
#[utoipa::path(
    post,
    path = "/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Sent", body = Message),
        (status = 400, description = "Blank body or message to self"),
        (status = 404, description = "Unknown recipient")
    )
)]
pub async fn send_message(
    AuthUser { id: sender_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), StatusCode> {
    if payload.body.trim().is_empty() || payload.recipient_id == sender_id {
        return Err(StatusCode::BAD_REQUEST);
    }

    if state.repo.get_user(payload.recipient_id).await.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    match state.repo.send_message(sender_id, payload).await {
        Some(message) => Ok((StatusCode::CREATED, Json(message))),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// mark_message_read
///
/// [Authenticated Route] Marks one received message as read. Only the recipient may.
#[utoipa::path(
    patch,
    path = "/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Marked as read"),
        (status = 404, description = "Not Found or Not Yours")
    )
)]
pub async fn mark_message_read(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.repo.mark_message_read(id, user_id).await {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}
