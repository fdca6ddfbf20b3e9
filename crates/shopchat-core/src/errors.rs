use std::borrow::Cow;

use thiserror::Error;

/// Result type alias using ShopchatError
pub type Result<T> = std::result::Result<T, ShopchatError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code. The code is what `errorName`
/// carries in failure events, so log searches can key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // Configuration
    MissingConfig,
    InvalidConfig,
    ConfigLoad,

    // Control flow
    Redirect,

    // Integration/IO
    ExternalService,
    Timeout,
    Io,

    // Internal
    Internal,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingConfig => "ERR_MISSING_CONFIG",
            ErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ErrorKind::ConfigLoad => "ERR_CONFIG_LOAD",
            ErrorKind::Redirect => "ERR_REDIRECT",
            ErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ErrorKind::Timeout => "ERR_TIMEOUT",
            ErrorKind::Io => "ERR_IO",
            ErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for shopchat operations
#[derive(Error, Debug)]
pub enum ShopchatError {
    /// One or more required configuration keys are absent, blank or placeholders
    #[error("Missing required configuration: {}", keys.join(", "))]
    MissingConfig { keys: Vec<String> },

    /// A configuration value is present but cannot be parsed
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// The configuration source itself failed
    #[error("Configuration could not be loaded: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// A redirect raised as control flow (OAuth hops, embedded-app exits)
    #[error("Redirect ({status}) to {location}")]
    Redirect { status: u16, location: String },

    /// A call to the commerce platform or another upstream failed
    #[error("Upstream request failed: {0}")]
    ExternalService(String),

    /// Response generation exceeded its wall-clock budget
    #[error("Timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopchatError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopchatError::MissingConfig { .. } => ErrorKind::MissingConfig,
            ShopchatError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            ShopchatError::ConfigLoad(_) => ErrorKind::ConfigLoad,
            ShopchatError::Redirect { .. } => ErrorKind::Redirect,
            ShopchatError::ExternalService(_) => ErrorKind::ExternalService,
            ShopchatError::Timeout { .. } => ErrorKind::Timeout,
            ShopchatError::Io(_) => ErrorKind::Io,
            ShopchatError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Build a redirect error
    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        ShopchatError::Redirect {
            status,
            location: location.into(),
        }
    }
}

/// True for the HTTP statuses treated as redirect control flow.
pub fn is_redirect_status(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Errors that the event API knows how to classify.
///
/// `with_event_logging` uses `redirect_status` to tell control-flow redirects
/// apart from genuine failures, and `error_name` plus `Display` to fill
/// `errorName` / `errorMessage`.
pub trait LoggableError: std::fmt::Display {
    /// Short, stable name for the error.
    fn error_name(&self) -> Cow<'_, str>;

    /// The redirect status carried by this error, if it is a redirect.
    fn redirect_status(&self) -> Option<u16> {
        None
    }
}

impl LoggableError for ShopchatError {
    fn error_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.code())
    }

    fn redirect_status(&self) -> Option<u16> {
        match self {
            ShopchatError::Redirect { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl LoggableError for anyhow::Error {
    fn error_name(&self) -> Cow<'_, str> {
        match self.downcast_ref::<ShopchatError>() {
            Some(inner) => inner.error_name(),
            None => Cow::Borrowed("Error"),
        }
    }

    fn redirect_status(&self) -> Option<u16> {
        self.downcast_ref::<ShopchatError>()
            .and_then(LoggableError::redirect_status)
    }
}
