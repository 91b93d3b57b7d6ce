//! Session gate state machine.

use tracing::{debug, info, instrument};

use super::SessionApi;
use crate::error::{StorefrontError, clear_sentry_user, set_sentry_user};

/// Notice shown when a gated link is clicked without a session.
pub const LOGIN_REQUIRED_NOTICE: &str = "Please log in to access rewards.";

/// Authentication state as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not logged in, not yet known, or the last query failed.
    #[default]
    Anonymous,
    Authenticated { username: Option<String> },
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// The single navigation affordance shown for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavChrome {
    Login { href: String },
    Logout { label: String },
}

/// Outcome of clicking a gated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Follow the link normally.
    Proceed,
    /// Cancel the navigation and go to the login entry point instead.
    Redirect {
        location: String,
        notice: &'static str,
    },
}

/// Reflects the backend session in navigation and guards gated links.
///
/// The gate starts [`SessionState::Anonymous`] and only changes state when a
/// session query completes. A slow query is indistinguishable from being
/// logged out, and a failed query counts as logged out.
///
/// Failures are fail-closed for gated links (the visitor is sent to login)
/// and fail-open for everything else (nothing but the gated link is blocked).
#[derive(Debug)]
pub struct SessionGate<A> {
    api: A,
    state: SessionState,
    login_path: String,
}

impl<A: SessionApi> SessionGate<A> {
    /// Create a gate in the anonymous state.
    pub fn new(api: A, login_path: impl Into<String>) -> Self {
        Self {
            api,
            state: SessionState::Anonymous,
            login_path: login_path.into(),
        }
    }

    /// Query the backend and update the state.
    ///
    /// Any failure leaves the gate anonymous.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> &SessionState {
        let next = match self.api.session_status().await {
            Ok(status) if status.is_authenticated() => SessionState::Authenticated {
                username: status.username.filter(|u| !u.is_empty()),
            },
            Ok(_) => SessionState::Anonymous,
            Err(e) => {
                StorefrontError::from(e).report("Session query");
                SessionState::Anonymous
            }
        };
        self.transition(next);
        &self.state
    }

    /// Invalidate the session, then re-query rather than assume success.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> &SessionState {
        if let Err(e) = self.api.logout().await {
            StorefrontError::from(e).report("Logout");
        }
        self.refresh().await
    }

    fn transition(&mut self, next: SessionState) {
        if next == self.state {
            debug!(state = ?self.state, "Session state unchanged");
            return;
        }

        match &next {
            SessionState::Authenticated {
                username: Some(username),
            } => set_sentry_user(username),
            SessionState::Authenticated { username: None } => {}
            SessionState::Anonymous => clear_sentry_user(),
        }
        info!(from = ?self.state, to = ?next, "Session state changed");
        self.state = next;
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Login or logout affordance; never both, never neither.
    #[must_use]
    pub fn chrome(&self) -> NavChrome {
        match &self.state {
            SessionState::Anonymous => NavChrome::Login {
                href: self.login_path.clone(),
            },
            SessionState::Authenticated {
                username: Some(username),
            } => NavChrome::Logout {
                label: format!("Logout ({username})"),
            },
            SessionState::Authenticated { username: None } => NavChrome::Logout {
                label: "Logout".to_string(),
            },
        }
    }

    /// Decide what a click on a gated link to `destination` does.
    #[must_use]
    pub fn on_gated_click(&self, destination: &str) -> Navigation {
        if self.is_authenticated() {
            return Navigation::Proceed;
        }
        Navigation::Redirect {
            location: self.login_redirect(destination),
            notice: LOGIN_REQUIRED_NOTICE,
        }
    }

    /// Login entry point carrying `destination` as `next=`.
    #[must_use]
    pub fn login_redirect(&self, destination: &str) -> String {
        let separator = if self.login_path.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}next={}",
            self.login_path,
            urlencoding::encode(destination)
        )
    }

    /// Backend client, mainly for inspection in tests.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }
}
