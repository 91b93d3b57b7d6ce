//! Integration tests for the Halltek storefront client.
//!
//! The tests drive the real [`ApiClient`] against [`FakeBackend`], an axum
//! server on an ephemeral localhost port that speaks the three endpoints the
//! storefront uses:
//!
//! ```text
//! GET /api/session   - { authenticated, username? } for the session cookie
//! GET /logout        - forgets the session and clears the cookie
//! GET /api/products  - the configured listing, or a configured error status
//! ```
//!
//! Sessions are opaque tokens in a `session` cookie. [`FakeBackend::login`]
//! mints one and [`FakeBackend::session_jar`] puts it in a cookie jar the
//! client can use.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p halltek-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use halltek_storefront::api::ApiClient;
use halltek_storefront::config::StorefrontConfig;
use reqwest::cookie::Jar;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

#[derive(Default)]
struct BackendState {
    /// Active session token -> username.
    sessions: Mutex<HashMap<String, String>>,
    products: Mutex<Value>,
    /// Non-zero makes `/api/products` fail with this status.
    products_status: AtomicU16,
    next_token: AtomicUsize,
    session_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    product_calls: AtomicUsize,
}

impl BackendState {
    fn username_for(&self, headers: &HeaderMap) -> Option<String> {
        let token = session_token(headers)?;
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&token)
            .cloned()
    }
}

/// Storefront backend stand-in running on a background task.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/session", get(session))
            .route("/logout", get(logout))
            .route("/api/products", get(products))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake backend address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL of the running server.
    ///
    /// # Panics
    ///
    /// Never in practice: the address is a bound socket.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Bound address is a valid URL")
    }

    /// Storefront configuration pointing at this backend.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::new(self.base_url())
    }

    /// Client with an empty cookie jar.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("Failed to build API client")
    }

    /// Client whose jar already holds a session for `username`.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn logged_in_client(&self, username: &str) -> ApiClient {
        ApiClient::with_cookie_jar(&self.config(), self.session_jar(username))
            .expect("Failed to build API client")
    }

    /// Start a session for `username` and return its token.
    #[must_use]
    pub fn login(&self, username: &str) -> String {
        let token = format!(
            "tok-{}",
            self.state.next_token.fetch_add(1, Ordering::SeqCst)
        );
        self.state
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), username.to_string());
        token
    }

    /// Cookie jar carrying a fresh session for `username`.
    #[must_use]
    pub fn session_jar(&self, username: &str) -> Arc<Jar> {
        let token = self.login(username);
        let jar = Jar::default();
        jar.add_cookie_str(
            &format!("{SESSION_COOKIE}={token}; Path=/"),
            &self.base_url(),
        );
        Arc::new(jar)
    }

    /// Replace the product listing body.
    pub fn set_products(&self, body: Value) {
        *self
            .state
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = body;
    }

    /// Make `/api/products` fail with `status`, or succeed again with `None`.
    pub fn fail_products(&self, status: Option<u16>) {
        self.state
            .products_status
            .store(status.unwrap_or(0), Ordering::SeqCst);
    }

    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.state
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn session_calls(&self) -> usize {
        self.state.session_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn logout_calls(&self) -> usize {
        self.state.logout_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn product_calls(&self) -> usize {
        self.state.product_calls.load(Ordering::SeqCst)
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

async fn session(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Json<Value> {
    state.session_calls.fetch_add(1, Ordering::SeqCst);
    Json(state.username_for(&headers).map_or_else(
        || json!({ "authenticated": false }),
        |username| json!({ "authenticated": true, "username": username }),
    ))
}

async fn logout(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(token) = session_token(&headers) {
        state
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&token);
    }
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"))],
        "logged out",
    )
        .into_response()
}

async fn products(State(state): State<Arc<BackendState>>) -> Response {
    state.product_calls.fetch_add(1, Ordering::SeqCst);
    let status = state.products_status.load(Ordering::SeqCst);
    if status != 0 {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "backend unavailable").into_response();
    }
    let body = state
        .products
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    Json(body).into_response()
}
