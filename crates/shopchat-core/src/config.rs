//! Application configuration
//!
//! Values come from the process environment through the `config` crate.
//! Required keys are checked up front so that a misconfigured deploy fails
//! with one clear record naming what is missing, never what was set.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;
use shopchat_core_types::Sensitive;

use crate::errors::{LoggableError, Result, ShopchatError};
use crate::logging_facility::{logger, EventMetadata, EventType, Logger, Outcome, Profile};

pub const SHOPIFY_API_KEY: &str = "SHOPIFY_API_KEY";
pub const SHOPIFY_API_SECRET: &str = "SHOPIFY_API_SECRET";
pub const SHOPIFY_APP_URL: &str = "SHOPIFY_APP_URL";
pub const SCOPES: &str = "SCOPES";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const SSR_TIMEOUT_MS: &str = "SSR_TIMEOUT_MS";
pub const LOG_PROFILE: &str = "LOG_PROFILE";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const UPSTREAM_STATUS_URL: &str = "UPSTREAM_STATUS_URL";

/// Keys the app cannot start without
pub const REQUIRED_KEYS: [&str; 5] = [
    SHOPIFY_API_KEY,
    SHOPIFY_API_SECRET,
    SHOPIFY_APP_URL,
    SCOPES,
    DATABASE_URL,
];

pub const DEFAULT_SSR_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Message of the record logged when required keys are missing
const VALIDATION_FAILED_MESSAGE: &str = "Required configuration is missing";

/// True when `value` is empty, blank, or an obvious template placeholder.
pub fn is_placeholder(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    if v.is_empty() {
        return true;
    }
    matches!(v.as_str(), "changeme" | "change_me" | "placeholder" | "replace_me" | "todo")
        || v.starts_with("your_")
        || v.starts_with("your-")
        || (v.starts_with('<') && v.ends_with('>'))
        || (v.len() >= 3 && v.chars().all(|c| c == 'x'))
}

/// Names of required keys that are absent or unusable, in declaration order.
pub fn missing_required_keys(values: &BTreeMap<String, String>) -> Vec<String> {
    REQUIRED_KEYS
        .iter()
        .filter(|key| values.get(**key).map_or(true, |v| is_placeholder(v)))
        .map(|key| (*key).to_string())
        .collect()
}

/// Check required configuration through the global logger.
///
/// # Errors
///
/// Returns [`ShopchatError::MissingConfig`] naming every missing key.
pub fn validate_required_config(values: &BTreeMap<String, String>) -> Result<()> {
    validate_required_config_with(&logger(), values)
}

/// Check required configuration, logging one `config_validation` failure
/// through `logger` when anything is missing. Only key names are logged.
pub fn validate_required_config_with(
    logger: &Logger,
    values: &BTreeMap<String, String>,
) -> Result<()> {
    let missing = missing_required_keys(values);
    if missing.is_empty() {
        return Ok(());
    }

    let err = ShopchatError::MissingConfig {
        keys: missing.clone(),
    };
    let event = EventMetadata::new(EventType::ConfigValidation, Outcome::Failure)
        .with_error(err.error_name(), err.to_string())
        .with_extra("missingKeys", json!(missing));
    logger.log_event(VALIDATION_FAILED_MESSAGE, &event);
    Err(err)
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_secret: Sensitive<String>,
    pub app_url: String,
    pub scopes: Vec<String>,
    pub database_url: Sensitive<String>,
    pub ssr_timeout: Duration,
    pub log_profile: Profile,
    pub bind_addr: SocketAddr,
    /// Optional platform endpoint used for the upstream health check
    pub upstream_status_url: Option<String>,
}

impl AppConfig {
    /// Build from already-collected key/value pairs, logging through the
    /// global logger.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_values_with`].
    pub fn from_values(values: &BTreeMap<String, String>) -> Result<Self> {
        Self::from_values_with(&logger(), values)
    }

    /// Build from already-collected key/value pairs
    ///
    /// # Errors
    ///
    /// Missing required keys are reported (and logged through `logger`) via
    /// [`validate_required_config_with`]; unparsable optional values produce
    /// [`ShopchatError::InvalidConfig`].
    pub fn from_values_with(logger: &Logger, values: &BTreeMap<String, String>) -> Result<Self> {
        validate_required_config_with(logger, values)?;

        let required = |key: &str| {
            values
                .get(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let optional = |key: &str| {
            values
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let ssr_timeout_ms = match optional(SSR_TIMEOUT_MS) {
            Some(raw) => raw.parse::<u64>().map_err(|e| ShopchatError::InvalidConfig {
                key: SSR_TIMEOUT_MS.to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_SSR_TIMEOUT_MS,
        };

        let log_profile = match optional(LOG_PROFILE) {
            Some(raw) => raw.parse::<Profile>()?,
            None => Profile::Production,
        };

        let bind_addr = optional(BIND_ADDR)
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| ShopchatError::InvalidConfig {
                key: BIND_ADDR.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            api_key: required(SHOPIFY_API_KEY),
            api_secret: Sensitive::new(required(SHOPIFY_API_SECRET)),
            app_url: required(SHOPIFY_APP_URL),
            scopes: required(SCOPES)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            database_url: Sensitive::new(required(DATABASE_URL)),
            ssr_timeout: Duration::from_millis(ssr_timeout_ms),
            log_profile,
            bind_addr,
            upstream_status_url: optional(UPSTREAM_STATUS_URL).map(str::to_string),
        })
    }

    /// Load from the process environment
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_values(&env_values()?)
    }
}

/// Snapshot the process environment with upper-case keys.
pub fn env_values() -> Result<BTreeMap<String, String>> {
    let raw: HashMap<String, String> = config::Config::builder()
        .add_source(config::Environment::default())
        .build()?
        .try_deserialize()?;

    Ok(raw
        .into_iter()
        .map(|(key, value)| (key.to_ascii_uppercase(), value))
        .collect())
}
