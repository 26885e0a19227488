use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Role, User};

/// SessionUser
///
/// The part of the signed-in user the guard and the clients care about.
/// `role` is `None` when the stored role is missing or unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub role: Option<Role>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.parsed_role(),
        }
    }
}

/// Session
///
/// Current authentication and profile resolution state. Read-only for the guard;
/// owned by whoever resolves identity (the `Session` extractor on the server,
/// a `SessionStore` in event-driven callers).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub is_authenticated: bool,
    pub is_loading_profile: bool,
    pub current_user: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            is_loading_profile: true,
            ..Self::default()
        }
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            is_authenticated: true,
            is_loading_profile: false,
            current_user: Some(user),
        }
    }

    /// Role of the current user, if any. A missing user and a malformed role look the same.
    pub fn role(&self) -> Option<Role> {
        self.current_user.as_ref().and_then(|user| user.role)
    }
}

/// SessionStore
///
/// Publishes session transitions to any number of observers over a `watch` channel.
/// Only real changes are published, so observers never wake up for a no-op.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Starts in the loading state: the profile is resolved asynchronously after start.
    pub fn new() -> Self {
        Self::with_session(Session::loading())
    }

    pub fn with_session(initial: Session) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Marks the profile as being (re)fetched, e.g. right after a login request.
    pub fn begin_profile_load(&self) {
        let mut next = self.current();
        next.is_loading_profile = true;
        self.publish(next);
    }

    pub fn profile_loaded(&self, user: SessionUser) {
        tracing::debug!(user_id = %user.id, role = ?user.role, "session profile resolved");
        self.publish(Session::authenticated(user));
    }

    pub fn sign_out(&self) {
        tracing::debug!("session cleared by sign-out");
        self.publish(Session::anonymous());
    }

    /// Called when the backing API client reports an authentication failure
    /// (expired or revoked token).
    pub fn auth_failed(&self) {
        tracing::warn!("session cleared after authentication failure");
        self.publish(Session::anonymous());
    }

    fn publish(&self, next: Session) {
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
