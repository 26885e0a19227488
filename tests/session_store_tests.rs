use job_portal::{
    guard::{
        AccessDenied, GuardController, GuardDecision, GuardedView, LOGIN_PATH, NavigateOptions,
        Navigator, Notifier, Redirection, RouteGuardConfig,
    },
    models::Role,
    session::{Session, SessionStore, SessionUser},
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Navigator for Recorder {
    fn go_to(&self, path: &str, _options: NavigateOptions) {
        self.events.lock().unwrap().push(format!("go_to {path}"));
    }
}

impl Notifier for Recorder {
    fn notify_error(&self, message: &str) {
        self.events.lock().unwrap().push(format!("notify {message}"));
    }
}

fn profile(role: Role) -> SessionUser {
    SessionUser {
        id: Uuid::from_u128(9),
        email: "view@jobs.test".to_string(),
        role: Some(role),
    }
}

// --- SessionStore lifecycle ---

#[tokio::test]
async fn test_store_starts_loading() {
    let store = SessionStore::new();
    assert_eq!(store.current(), Session::loading());
}

#[tokio::test]
async fn test_store_lifecycle_transitions() {
    let store = SessionStore::new();
    let mut rx = store.subscribe();

    store.profile_loaded(profile(Role::Candidate));
    rx.changed().await.unwrap();
    let session = rx.borrow_and_update().clone();
    assert!(session.is_authenticated);
    assert!(!session.is_loading_profile);
    assert_eq!(session.role(), Some(Role::Candidate));

    store.begin_profile_load();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_loading_profile);

    store.sign_out();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), Session::anonymous());
}

#[tokio::test]
async fn test_auth_failure_clears_session() {
    let store = SessionStore::with_session(Session::authenticated(profile(Role::Employer)));

    store.auth_failed();

    assert_eq!(store.current(), Session::anonymous());
}

#[tokio::test]
async fn test_unchanged_session_is_not_republished() {
    let store = SessionStore::with_session(Session::anonymous());
    let mut rx = store.subscribe();

    store.sign_out();

    assert!(!rx.has_changed().unwrap());
}

// --- GuardedView ---

#[tokio::test]
async fn test_view_goes_from_loading_straight_to_render() {
    let store = SessionStore::new();
    let recorder = Arc::new(Recorder::default());
    let controller = GuardController::new(recorder.clone(), recorder.clone());
    let view = GuardedView::new(RouteGuardConfig::for_roles([Role::Candidate]), controller);

    let (tx, mut renders) = mpsc::unbounded_channel();
    let handle = tokio::spawn(view.run(store.subscribe(), move |decision| {
        let _ = tx.send(decision.clone());
    }));

    assert_eq!(renders.recv().await, Some(GuardDecision::Loading));

    store.profile_loaded(profile(Role::Candidate));
    assert_eq!(renders.recv().await, Some(GuardDecision::Render));

    drop(store);
    let last = handle.await.unwrap();

    assert_eq!(last, GuardDecision::Render);
    assert!(recorder.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_view_redirects_once_after_sign_out() {
    let store = SessionStore::with_session(Session::authenticated(profile(Role::Employer)));
    let recorder = Arc::new(Recorder::default());
    let controller = GuardController::new(recorder.clone(), recorder.clone());
    let view = GuardedView::new(RouteGuardConfig::authenticated(), controller);

    let (tx, mut renders) = mpsc::unbounded_channel();
    let handle = tokio::spawn(view.run(store.subscribe(), move |decision| {
        let _ = tx.send(decision.clone());
    }));

    assert_eq!(renders.recv().await, Some(GuardDecision::Render));

    store.sign_out();
    let expected = GuardDecision::Redirect(Redirection {
        to: LOGIN_PATH.to_string(),
        reason: AccessDenied::Unauthenticated,
    });
    assert_eq!(renders.recv().await, Some(expected.clone()));

    // No-op publish: the view is not woken and nothing fires twice.
    store.sign_out();
    drop(store);

    assert_eq!(handle.await.unwrap(), expected);
    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            format!("notify {}", AccessDenied::Unauthenticated.message()),
            format!("go_to {LOGIN_PATH}"),
        ]
    );
}
