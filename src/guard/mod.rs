//! Route access guard.
//!
//! Decides, for one protected view, whether to render it, show a loading placeholder
//! while the session resolves, or send the user elsewhere. The decision itself is a pure
//! function of `(Session, RouteGuardConfig)`; the side effects (notification and
//! navigation) live in [`GuardController`], which fires them once per transition.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::{models::Role, session::Session};

pub mod controller;
pub mod middleware;

pub use controller::{GuardController, GuardKey, GuardedView, NavigateOptions, Navigator, Notifier};
pub use middleware::{GUARD_NOTICE_HEADER, GuardedRoute, guard_middleware};

pub const LOGIN_PATH: &str = "/login";
pub const CANDIDATE_DASHBOARD_PATH: &str = "/dashboard/candidate";
pub const EMPLOYER_DASHBOARD_PATH: &str = "/dashboard/employer";
pub const ROOT_PATH: &str = "/";

/// AccessDenied
///
/// Why a guarded view was refused. Never propagated as an error across the guard
/// boundary: it travels inside a [`Redirection`] and is shown to the user as a
/// transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AccessDenied {
    /// Not signed in.
    #[error("Authentication required. Please sign in to continue.")]
    Unauthenticated,
    /// Signed in, but the role is not allowed on this route.
    #[error("Insufficient permission to access this page.")]
    Forbidden,
}

impl AccessDenied {
    /// Static form of the `Display` text, usable as a header value.
    pub fn message(&self) -> &'static str {
        match self {
            AccessDenied::Unauthenticated => "Authentication required. Please sign in to continue.",
            AccessDenied::Forbidden => "Insufficient permission to access this page.",
        }
    }
}

/// RouteGuardConfig
///
/// Per-route declaration of who may see a view. Immutable for the lifetime of one
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteGuardConfig {
    /// When false the guard never blocks or redirects.
    pub require_auth: bool,
    /// `None` lets any authenticated user through. An empty set lets nobody through.
    pub allowed_roles: Option<BTreeSet<Role>>,
    /// Where unauthenticated users are sent.
    pub redirect_target: String,
}

impl Default for RouteGuardConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_roles: None,
            redirect_target: LOGIN_PATH.to_string(),
        }
    }
}

impl RouteGuardConfig {
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn for_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: Some(roles.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_target = target.into();
        self
    }

    fn permits(&self, role: Option<Role>) -> bool {
        match &self.allowed_roles {
            None => true,
            Some(allowed) => role.is_some_and(|role| allowed.contains(&role)),
        }
    }
}

/// Where the user is sent, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub to: String,
    pub reason: AccessDenied,
}

/// GuardDecision
///
/// One of the four observable outcomes of the guard. `Loading` is the resolving state;
/// the others are final for the current inputs and are recomputed when they change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Loading,
    Redirect(Redirection),
}

impl GuardDecision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardDecision::Redirect(_))
    }
}

/// Landing page for a user whose role is not allowed on the requested route.
pub fn role_home(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Candidate) => CANDIDATE_DASHBOARD_PATH,
        Some(Role::Employer) => EMPLOYER_DASHBOARD_PATH,
        // TODO: send admins to an admin landing page once the frontend ships one.
        Some(Role::Admin) | None => ROOT_PATH,
    }
}

/// evaluate
///
/// The guard contract. Pure and deterministic: identical inputs always give an
/// identical decision, and nothing is emitted here.
pub fn evaluate(session: &Session, config: &RouteGuardConfig) -> GuardDecision {
    if !config.require_auth {
        return GuardDecision::Render;
    }

    // Never redirect before the session has resolved.
    if session.is_loading_profile {
        return GuardDecision::Loading;
    }

    if !session.is_authenticated {
        return GuardDecision::Redirect(Redirection {
            to: config.redirect_target.clone(),
            reason: AccessDenied::Unauthenticated,
        });
    }

    let role = session.role();
    if !config.permits(role) {
        return GuardDecision::Redirect(Redirection {
            to: role_home(role).to_string(),
            reason: AccessDenied::Forbidden,
        });
    }

    GuardDecision::Render
}
