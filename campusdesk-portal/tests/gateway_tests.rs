//! Sign-in and sign-out flows

mod common;

use async_trait::async_trait;
use campusdesk_core::{CampusError, CampusResult};
use campusdesk_portal::{
    AuthApi, Credentials, HttpAuthApi, LoginPayload, Role, Route, SessionGateway, SessionUser,
};
use common::{
    api_client, memory_portal, spawn_backend, unreachable_backend, user, Backend, GOOD_TOKEN,
    PASSWORD,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Accepts any sign-in; sign-out always fails
#[derive(Default)]
struct FailingLogoutApi {
    logout_calls: AtomicUsize,
}

#[async_trait]
impl AuthApi for FailingLogoutApi {
    async fn login(&self, _credentials: &Credentials) -> CampusResult<LoginPayload> {
        Ok(LoginPayload {
            user: user(Role::Faculty),
            access_token: "t-faculty".to_string(),
        })
    }

    async fn logout(&self, access_token: Option<&str>) -> CampusResult<()> {
        assert_eq!(access_token, Some("t-faculty"));
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Err(CampusError::api("Internal Server Error", Some(500), "test"))
    }

    async fn current_user(&self, _access_token: &str) -> CampusResult<SessionUser> {
        Err(campusdesk_core::auth_error!("token revoked", "test"))
    }
}

#[tokio::test]
async fn logout_clears_session_even_when_backend_fails() {
    let api = Arc::new(FailingLogoutApi::default());
    let gateway = SessionGateway::new(api.clone());
    let (mut portal, _, _) = memory_portal();

    gateway
        .login(
            &mut portal.session,
            &mut portal.router,
            &Credentials::new("f@uni.edu", "pw"),
        )
        .await
        .unwrap();
    assert_eq!(portal.router.current(), Route::Dashboard);

    gateway.logout(&mut portal.session, &mut portal.router).await;

    assert_eq!(api.logout_calls.load(Ordering::SeqCst), 1);
    assert!(!portal.session.is_authenticated());
    assert!(portal.session.user().is_none());
    assert!(portal.session.access_token().is_none());
    assert_eq!(portal.router.current_path(), "/login");
}

#[tokio::test]
async fn logout_against_unreachable_backend_still_signs_out() {
    let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(api_client(
        &unreachable_backend(),
    ))));
    let (mut portal, storage, _) = memory_portal();
    portal.session.login(user(Role::Admin), "t-admin");
    portal.open(Route::Terms);

    gateway.logout(&mut portal.session, &mut portal.router).await;

    assert!(!portal.session.is_authenticated());
    assert_eq!(portal.router.current(), Route::Login);

    // The cleared session is what a reload sees
    let reloaded = campusdesk_portal::SessionStore::init(Arc::new(storage), "auth-storage");
    assert!(!reloaded.is_authenticated());
}

#[tokio::test]
async fn revoked_token_on_refresh_signs_out() {
    let gateway = SessionGateway::new(Arc::new(FailingLogoutApi::default()));
    let (mut portal, _, _) = memory_portal();
    portal.session.login(user(Role::Faculty), "t-faculty");

    let err = gateway
        .refresh_profile(&mut portal.session, &mut portal.router)
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::Authentication { .. }));
    assert!(!portal.session.is_authenticated());
    assert_eq!(portal.router.current(), Route::Login);
}

#[tokio::test]
async fn login_over_http_goes_to_role_home() {
    let backend = Backend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(api_client(&base_url))));
    let (mut portal, _, _) = memory_portal();

    let home = gateway
        .login(
            &mut portal.session,
            &mut portal.router,
            &Credentials::new("student7@uni.edu", PASSWORD),
        )
        .await
        .unwrap();

    assert_eq!(home, Route::StudentDashboard);
    assert_eq!(portal.router.current(), Route::StudentDashboard);
    assert_eq!(portal.session.role(), Some(Role::Student));
    assert_eq!(portal.session.access_token(), Some(GOOD_TOKEN));
    assert_eq!(
        portal.session.user().map(|u| u.user_id.as_str()),
        Some("u-42")
    );

    gateway.logout(&mut portal.session, &mut portal.router).await;
    assert_eq!(*backend.logouts.lock().unwrap(), 1);
}

#[tokio::test]
async fn rejected_login_leaves_session_untouched() {
    let base_url = spawn_backend(Backend::default()).await;
    let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(api_client(&base_url))));
    let (mut portal, _, _) = memory_portal();

    let err = gateway
        .login(
            &mut portal.session,
            &mut portal.router,
            &Credentials::new("admin@uni.edu", "wrong"),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid email or password"));
    assert!(!portal.session.is_authenticated());
    assert_eq!(portal.router.current(), Route::Login);
}

#[tokio::test]
async fn login_against_unreachable_backend_is_a_network_error() {
    let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(api_client(
        &unreachable_backend(),
    ))));
    let (mut portal, _, _) = memory_portal();

    let err = gateway
        .login(
            &mut portal.session,
            &mut portal.router,
            &Credentials::new("admin@uni.edu", PASSWORD),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CampusError::Network { .. }));
    assert!(err.is_recoverable());
    assert!(!portal.session.is_authenticated());
}

#[tokio::test]
async fn refresh_profile_replaces_user_and_keeps_token() {
    let base_url = spawn_backend(Backend::default()).await;
    let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(api_client(&base_url))));
    let (mut portal, _, _) = memory_portal();
    portal.session.login(user(Role::Admin), GOOD_TOKEN);

    gateway
        .refresh_profile(&mut portal.session, &mut portal.router)
        .await
        .unwrap();

    let refreshed = portal.session.user().unwrap();
    assert_eq!(refreshed.name.as_deref(), Some("Registrar"));
    assert_eq!(refreshed.user_id, "u-42");
    assert_eq!(portal.session.access_token(), Some(GOOD_TOKEN));
}

#[test]
fn credentials_debug_hides_password() {
    let credentials = Credentials::new("a@uni.edu", "hunter2");
    let rendered = format!("{:?}", credentials);
    assert!(rendered.contains("a@uni.edu"));
    assert!(!rendered.contains("hunter2"));
}
