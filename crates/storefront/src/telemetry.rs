//! Logging and error tracking setup.
//!
//! Hosts call [`init`] once at startup and keep the returned guard alive for
//! as long as events should reach Sentry.

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::StorefrontConfig;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "halltek_storefront=info";

/// Sentry client settings for the storefront.
fn client_options(config: &StorefrontConfig) -> sentry::ClientOptions {
    sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        attach_stacktrace: true,
        ..Default::default()
    }
}

/// Start the Sentry client when `sentry_dsn` is set.
///
/// Without a DSN nothing is sent and the breadcrumb helpers in
/// [`crate::error`] do nothing.
#[must_use]
pub fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;
    let guard = sentry::init((dsn, client_options(config)));
    tracing::info!(environment = ?config.sentry_environment, "Error tracking enabled");
    Some(guard)
}

/// Warnings and errors become Sentry events, info and debug become
/// breadcrumbs on the next event, trace is dropped.
fn route_level(level: tracing::Level) -> sentry_tracing::EventFilter {
    if level <= tracing::Level::WARN {
        sentry_tracing::EventFilter::Event
    } else if level <= tracing::Level::DEBUG {
        sentry_tracing::EventFilter::Breadcrumb
    } else {
        sentry_tracing::EventFilter::Ignore
    }
}

/// Install Sentry and the tracing subscriber.
///
/// Sentry is initialized first so the tracing layer can forward to it. A
/// subscriber that is already installed (a host with its own logging, or a
/// second call) is left in place.
#[must_use]
pub fn init(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let guard = init_sentry(config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(|meta| route_level(*meta.level())))
        .try_init()
    {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }

    guard
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig::new(Url::parse("http://127.0.0.1:5000").unwrap())
    }

    #[test]
    fn test_no_dsn_means_no_guard() {
        assert!(init_sentry(&config()).is_none());
    }

    #[test]
    fn test_client_options_carry_environment() {
        let mut config = config();
        config.sentry_environment = Some("staging".to_string());
        let options = client_options(&config);
        assert_eq!(options.environment.as_deref(), Some("staging"));
        assert!(options.attach_stacktrace);
    }

    #[test]
    fn test_levels_route_to_events_and_breadcrumbs() {
        use super::sentry_tracing::EventFilter;
        use tracing::Level;

        assert!(matches!(route_level(Level::ERROR), EventFilter::Event));
        assert!(matches!(route_level(Level::WARN), EventFilter::Event));
        assert!(matches!(route_level(Level::INFO), EventFilter::Breadcrumb));
        assert!(matches!(route_level(Level::DEBUG), EventFilter::Breadcrumb));
        assert!(matches!(route_level(Level::TRACE), EventFilter::Ignore));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        assert!(init(&config()).is_none());
        assert!(init(&config()).is_none());
    }
}
