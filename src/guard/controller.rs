use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::watch;

use super::{GuardDecision, RouteGuardConfig, evaluate};
use crate::{models::Role, session::Session};

/// Options accepted by [`Navigator::go_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

/// Navigator
///
/// Imperative navigation collaborator. Fire-and-forget.
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str, options: NavigateOptions);
}

/// Notifier
///
/// Transient user-visible notification collaborator (toast, banner). Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn go_to(&self, path: &str, options: NavigateOptions) {
        (**self).go_to(path, options)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify_error(&self, message: &str) {
        (**self).notify_error(message)
    }
}

/// GuardKey
///
/// Projection of every input the decision depends on. Two evaluations with equal keys
/// are the same transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuardKey {
    require_auth: bool,
    is_loading_profile: bool,
    is_authenticated: bool,
    role: Option<Role>,
    allowed_roles: Option<BTreeSet<Role>>,
    redirect_target: String,
}

impl GuardKey {
    pub fn new(session: &Session, config: &RouteGuardConfig) -> Self {
        Self {
            require_auth: config.require_auth,
            is_loading_profile: session.is_loading_profile,
            is_authenticated: session.is_authenticated,
            role: session.role(),
            allowed_roles: config.allowed_roles.clone(),
            redirect_target: config.redirect_target.clone(),
        }
    }
}

/// GuardController
///
/// Stateful wrapper around [`evaluate`] for re-render driven callers. Remembers the
/// last handled [`GuardKey`] and performs the redirect side effects (one notification,
/// one navigation) only when the key changes. Re-evaluating with unchanged inputs
/// returns the same decision and emits nothing.
pub struct GuardController<N, E> {
    navigator: N,
    notifier: E,
    last_key: Option<GuardKey>,
}

impl<N: Navigator, E: Notifier> GuardController<N, E> {
    pub fn new(navigator: N, notifier: E) -> Self {
        Self {
            navigator,
            notifier,
            last_key: None,
        }
    }

    pub fn evaluate(&mut self, session: &Session, config: &RouteGuardConfig) -> GuardDecision {
        let key = GuardKey::new(session, config);
        let decision = evaluate(session, config);

        if self.last_key.as_ref() == Some(&key) {
            tracing::trace!(?decision, "guard inputs unchanged, side effects suppressed");
            return decision;
        }

        tracing::debug!(?decision, "guard transition");
        if let GuardDecision::Redirect(redirection) = &decision {
            tracing::info!(
                target_path = %redirection.to,
                reason = ?redirection.reason,
                "guard redirect"
            );
            self.notifier.notify_error(redirection.reason.message());
            self.navigator
                .go_to(&redirection.to, NavigateOptions { replace: true });
        }

        self.last_key = Some(key);
        decision
    }

    /// Forgets the last transition, e.g. when the guarded view is torn down and mounted again.
    pub fn reset(&mut self) {
        self.last_key = None;
    }
}

/// GuardedView
///
/// Keeps one guarded view in sync with a session source. Evaluates once on start and
/// again on every published session change, handing each decision to `on_render`.
/// `watch` only keeps the latest value, so intermediate sessions published faster than
/// the view runs are skipped.
pub struct GuardedView<N, E> {
    controller: GuardController<N, E>,
    config: RouteGuardConfig,
}

impl<N: Navigator, E: Notifier> GuardedView<N, E> {
    pub fn new(config: RouteGuardConfig, controller: GuardController<N, E>) -> Self {
        Self { controller, config }
    }

    /// Runs until every session publisher is dropped and returns the final decision.
    pub async fn run<F>(mut self, mut sessions: watch::Receiver<Session>, mut on_render: F) -> GuardDecision
    where
        F: FnMut(&GuardDecision),
    {
        let session = sessions.borrow_and_update().clone();
        let mut decision = self.controller.evaluate(&session, &self.config);
        on_render(&decision);

        while sessions.changed().await.is_ok() {
            let session = sessions.borrow_and_update().clone();
            decision = self.controller.evaluate(&session, &self.config);
            on_render(&decision);
        }

        decision
    }
}
