//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::str::FromStr;
use std::sync::Once;

use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use super::test_capture::init_test_capture;
use crate::errors::ShopchatError;

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Human-readable diagnostics for development
    #[default]
    Development,
    /// JSON diagnostics for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl FromStr for Profile {
    type Err = ShopchatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(ShopchatError::InvalidConfig {
                key: "LOG_PROFILE".to_string(),
                reason: format!("unknown profile '{}'", other),
            }),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// This function should be called once at application startup. Request and
/// event records always go through the structured [`Logger`](super::Logger);
/// the profile picks the `tracing` subscriber used for library diagnostics
/// (hyper, tower-http, and our own `tracing::debug!` calls).
///
/// # Profiles
///
/// - **Development**: Human-readable diagnostics at debug level
/// - **Production**: JSON diagnostics at info level
/// - **Test**: Global logger routed into the shared test capture
///
/// Diagnostics go to stderr so they never interleave with record lines on
/// stdout.
///
/// # Example
///
/// ```
/// use shopchat_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("shopchat=debug")),
                )
                .with_writer(std::io::stderr)
                .finish()
                .try_init();
        }
        Profile::Production => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("shopchat=info")),
                )
                .with_writer(std::io::stderr)
                .finish()
                .try_init();
        }
        Profile::Test => {
            init_test_capture();
        }
    });
}
