//! Shopchat Core - observability and secret redaction
//!
//! This crate provides the pieces every request handler of the embedded
//! app logs through:
//! - A redaction engine that scrubs tokens, OAuth parameters and PII from
//!   strings and arbitrary JSON values
//! - A structured JSON logger with a typed event API
//! - Ambient request correlation carried in task-local storage
//! - Application configuration with required-key validation

pub mod config;
pub mod correlation;
pub mod errors;
pub mod logging_facility;
pub mod redaction;

// Re-export commonly used types
pub use config::{validate_required_config, AppConfig};
pub use correlation::{current_request_id, in_current_scope, with_request_id, with_request_id_sync};
pub use errors::{ErrorKind, LoggableError, Result, ShopchatError};
pub use logging_facility::{EventMetadata, EventScope, EventType, Level, Logger, Outcome};
pub use redaction::{redact_structure, sanitize_error_text, scrub_message_string, scrub_value_string};
pub use shopchat_core_types::{derive_request_id, RequestId, Sensitive};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
