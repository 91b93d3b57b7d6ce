//! Session gate against a live backend.
//!
//! The session cookie lives in the client's jar, so these tests cover the
//! whole path from cookie to navigation chrome.

use halltek_integration_tests::FakeBackend;
use halltek_storefront::session::{
    LOGIN_REQUIRED_NOTICE, NavChrome, Navigation, SessionGate, SessionState,
};

#[tokio::test]
async fn test_anonymous_visitor_is_redirected_to_login() {
    let backend = FakeBackend::start().await;
    let mut gate = SessionGate::new(backend.client(), "login.html");

    gate.refresh().await;

    assert_eq!(gate.state(), &SessionState::Anonymous);
    assert_eq!(backend.session_calls(), 1);
    assert_eq!(
        gate.on_gated_click("rewards.html"),
        Navigation::Redirect {
            location: "login.html?next=rewards.html".to_string(),
            notice: LOGIN_REQUIRED_NOTICE,
        }
    );
}

#[tokio::test]
async fn test_session_cookie_authenticates() {
    let backend = FakeBackend::start().await;
    let mut gate = SessionGate::new(backend.logged_in_client("asha"), "login.html");

    gate.refresh().await;

    assert_eq!(
        gate.state(),
        &SessionState::Authenticated {
            username: Some("asha".to_string())
        }
    );
    assert_eq!(
        gate.chrome(),
        NavChrome::Logout {
            label: "Logout (asha)".to_string()
        }
    );
    assert_eq!(gate.on_gated_click("rewards.html"), Navigation::Proceed);
}

#[tokio::test]
async fn test_logout_invalidates_and_requeries() {
    let backend = FakeBackend::start().await;
    let mut gate = SessionGate::new(backend.logged_in_client("asha"), "login.html");
    gate.refresh().await;
    assert!(gate.is_authenticated());
    assert_eq!(backend.active_sessions(), 1);

    gate.logout().await;

    assert_eq!(backend.logout_calls(), 1);
    assert_eq!(backend.session_calls(), 2);
    assert_eq!(backend.active_sessions(), 0);
    assert_eq!(gate.state(), &SessionState::Anonymous);
    assert_eq!(
        gate.chrome(),
        NavChrome::Login {
            href: "login.html".to_string()
        }
    );
}
