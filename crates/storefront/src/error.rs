//! Unified error handling with Sentry integration.
//!
//! Nothing in the storefront is fatal to the page. Storage and network
//! failures degrade to an empty cart or an anonymous session, so most errors
//! end up in [`StorefrontError::report`], which logs them and leaves a Sentry
//! breadcrumb instead of propagating.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::render::RenderError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Markup could not be rendered.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Stored cart could not be decoded or encoded.
    #[error("Cart encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Stored cart prices and quantities add up past what a decimal holds.
    #[error("Cart totals overflow")]
    TotalsOverflow,
}

impl StorefrontError {
    /// Breadcrumb category for this error.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Storage(_) | Self::Encoding(_) | Self::TotalsOverflow => "storage",
            Self::Api(_) => "network",
            Self::Render(_) => "render",
        }
    }

    /// Log a recoverable failure and record it as a Sentry breadcrumb.
    ///
    /// Render failures indicate a bug rather than an environmental problem
    /// and are captured as Sentry events instead.
    pub fn report(&self, action: &str) {
        if matches!(self, Self::Render(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                action,
                sentry_event_id = %event_id,
                "Storefront error"
            );
            return;
        }

        tracing::warn!(error = %self, category = self.category(), action, "Degraded: {action}");
        add_breadcrumb(
            self.category(),
            &format!("{action} failed"),
            Some(&[("error", &self.to_string())]),
        );
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Set the Sentry user context after the session reports a username.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this when the session becomes anonymous.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::Storage(StorageError::Unavailable("disabled".to_string()));
        assert_eq!(err.to_string(), "Storage error: Storage unavailable: disabled");

        let err = StorefrontError::Api(ApiError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert_eq!(err.to_string(), "API error: API error: 502 - bad gateway");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            StorefrontError::Storage(StorageError::QuotaExceeded { needed: 2, quota: 1 })
                .category(),
            "storage"
        );
        assert_eq!(
            StorefrontError::Api(ApiError::Parse("x".to_string())).category(),
            "network"
        );
        assert_eq!(
            StorefrontError::Config(ConfigError::InvalidEnvVar("K".into(), "v".into())).category(),
            "config"
        );
    }

    #[test]
    fn test_report_without_sentry_is_harmless() {
        StorefrontError::Api(ApiError::Parse("x".to_string())).report("Session query");
    }
}
