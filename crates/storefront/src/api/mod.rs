//! Backend API client.
//!
//! Talks to the storefront backend over HTTP with `reqwest`. The session
//! credential is a cookie, so the client keeps a cookie jar and every
//! request carries it automatically.
//!
//! # Endpoints
//!
//! ```text
//! GET /api/session   - { authenticated, username? }
//! GET /logout        - invalidates the session
//! GET /api/products  - product list (bare array or { products: [...] })
//! ```
//!
//! Product listings are cached with `moka`; session status never is.
//! No request is retried and no timeout is applied.

use std::sync::Arc;

use halltek_core::SessionStatus;
use moka::future::Cache;
use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::catalog::{Product, ProductSource, normalize_listing};
use crate::config::StorefrontConfig;
use crate::session::SessionApi;

const PRODUCTS_CACHE_KEY: &str = "products";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body was not what we expected.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the storefront backend.
///
/// Cheap to clone; clones share the cookie store and the product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, Vec<Product>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new backend client with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::with_cookie_jar(config, Arc::new(Jar::default()))
    }

    /// Create a backend client that reads and writes cookies in `jar`.
    ///
    /// Lets a host carry a session cookie obtained elsewhere (for example
    /// from the login form) into the storefront.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_cookie_jar(config: &StorefrontConfig, jar: Arc<Jar>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_provider(jar)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                cache,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Issue a GET and fail on non-success status.
    async fn get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Fetch the current session status.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a session object.
    #[instrument(skip(self))]
    pub async fn session_status(&self) -> Result<SessionStatus, ApiError> {
        let response = self.get("/api/session").await?;
        response
            .json::<SessionStatus>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Invalidate the current session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.get("/logout").await?;
        debug!("Logout request completed");
        Ok(())
    }

    /// Fetch and normalize the product listing.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let response = self.get("/api/products").await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let products = normalize_listing(&body);
        debug!(count = products.len(), "Products loaded");

        self.inner
            .cache
            .insert(PRODUCTS_CACHE_KEY.to_string(), products.clone())
            .await;

        Ok(products)
    }

    /// Drop the cached product listing.
    pub async fn invalidate_products(&self) {
        self.inner.cache.invalidate(PRODUCTS_CACHE_KEY).await;
    }
}

impl SessionApi for ApiClient {
    async fn session_status(&self) -> Result<SessionStatus, ApiError> {
        Self::session_status(self).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Self::logout(self).await
    }
}

impl ProductSource for ApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Self::list_products(self).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&StorefrontConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_resolution() {
        let api = client("http://127.0.0.1:5000");
        assert_eq!(
            api.endpoint("/api/session").unwrap().as_str(),
            "http://127.0.0.1:5000/api/session"
        );
        assert_eq!(
            api.endpoint("/logout").unwrap().as_str(),
            "http://127.0.0.1:5000/logout"
        );
    }

    #[test]
    fn test_debug_shows_base_url() {
        let api = client("https://shop.example.com");
        assert!(format!("{api:?}").contains("https://shop.example.com/"));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 404 - missing");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let api = client("http://127.0.0.1:9");
        let err = api.session_status().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
