//! Session-aware navigation.
//!
//! The backend owns authentication; the storefront only asks whether the
//! current visitor is logged in and reflects the answer in navigation.
//!
//! - [`SessionApi`] - the two backend calls the gate needs
//! - [`SessionGate`] - state machine, nav chrome, and rewards gating

mod gate;

pub use gate::{LOGIN_REQUIRED_NOTICE, NavChrome, Navigation, SessionGate, SessionState};

use halltek_core::SessionStatus;

use crate::api::ApiError;

/// Backend calls used by the session gate.
///
/// Implemented by [`crate::api::ApiClient`]; tests substitute fakes.
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    /// Fetch the current session status (`GET /api/session`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    async fn session_status(&self) -> Result<SessionStatus, ApiError>;

    /// Invalidate the current session (`GET /logout`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn logout(&self) -> Result<(), ApiError>;
}
