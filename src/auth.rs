use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::{Role, User},
    repository::RepositoryState,
    session::{Session, SessionUser},
};

/// Header accepted in `Env::Local` in place of a bearer token.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// Claims
///
/// Payload expected inside a session JWT issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID, the primary key of `public.profiles`.
    pub sub: Uuid,
    /// Expiration time. Always validated.
    pub exp: usize,
    /// Issued at.
    pub iat: usize,
}

/// AuthUser
///
/// Resolved identity of an authenticated request. Handlers behind the guard take it as
/// an argument to learn who is calling.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    /// `None` when the stored role is missing or not one of the known roles.
    pub role: Option<Role>,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        let role = user.parsed_role();
        Self {
            id: user.id,
            email: user.email,
            role,
        }
    }
}

/// resolve_user
///
/// Shared identity resolution used by both extractors:
/// 1. Local bypass through the `x-user-id` header (only in `Env::Local`).
/// 2. Bearer token extraction and JWT validation.
/// 3. Profile lookup, so deleted users lose access even with a live token.
///
/// Any failure is reported as `401 Unauthorized`.
async fn resolve_user(
    parts: &Parts,
    repo: &RepositoryState,
    config: &AppConfig,
) -> Result<User, StatusCode> {
    if config.env == Env::Local {
        let bypass_id = parts
            .headers
            .get(DEV_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok());

        if let Some(user_id) = bypass_id {
            if let Some(user) = repo.get_user(user_id).await {
                return Ok(user);
            }
        }
        // Fall through to the standard JWT flow.
    }

    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => tracing::debug!("rejected expired session token"),
            other => tracing::debug!(error = ?other, "rejected invalid session token"),
        }
        StatusCode::UNAUTHORIZED
    })?;

    repo.get_user(token_data.claims.sub)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Rejects with `401 Unauthorized` when the request carries no valid identity.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        resolve_user(parts, &repo, &config).await.map(AuthUser::from)
    }
}

/// Never rejects: a request without a valid identity is simply an anonymous session.
/// On the server the profile lookup completes before the guard runs, so the session
/// is never in the loading state here.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        Ok(match resolve_user(parts, &repo, &config).await {
            Ok(user) => Session::authenticated(SessionUser::from(&user)),
            Err(_) => Session::anonymous(),
        })
    }
}
