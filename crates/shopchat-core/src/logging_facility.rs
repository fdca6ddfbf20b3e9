//! Structured logging facility for shopchat
//!
//! This module provides a canonical logging facility with:
//! - One JSON record per call, scrubbed by the redaction engine
//! - The active request id stamped on every record
//! - A typed event API with exactly one event per wrapped operation
//! - Single initialization point via `init(profile)`
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use shopchat_core::logging_facility::{self, init, Profile};
//! use serde_json::json;
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! logging_facility::info("app booted", &json!({"port": 3000}));
//! ```
//!
//! # Logging Macros
//!
//! - `log_debug!(msg, "key": value, ...)`
//! - `log_info!(msg, "key": value, ...)`
//! - `log_warn!(msg, "key": value, ...)`
//! - `log_error!(msg, "key": value, ...)`

pub mod event;
pub mod init;
pub mod logger;
pub mod macros;
pub mod sink;
pub mod test_capture;

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use serde::Serialize;

pub use event::{EventMetadata, EventScope, EventType, Outcome};
pub use init::{init, Profile};
pub use logger::{sanitize_metadata, Level, Logger};
pub use sink::{LogSink, StdStreamSink};
pub use test_capture::{init_test_capture, CapturedLine, TestCapture};

use crate::errors::LoggableError;

static GLOBAL_LOGGER: Lazy<RwLock<Logger>> = Lazy::new(|| RwLock::new(Logger::stdio()));

/// The process-wide logger
pub fn logger() -> Logger {
    GLOBAL_LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the process-wide logger
pub fn set_global_logger(logger: Logger) {
    *GLOBAL_LOGGER
        .write()
        .unwrap_or_else(PoisonError::into_inner) = logger;
}

pub fn debug<M: Serialize + ?Sized>(message: &str, metadata: &M) {
    logger().debug(message, metadata);
}

pub fn info<M: Serialize + ?Sized>(message: &str, metadata: &M) {
    logger().info(message, metadata);
}

pub fn warn<M: Serialize + ?Sized>(message: &str, metadata: &M) {
    logger().warn(message, metadata);
}

pub fn error<M: Serialize + ?Sized>(message: &str, metadata: &M) {
    logger().error(message, metadata);
}

/// Emit an event record through the global logger
pub fn log_event(message: &str, event: &EventMetadata) {
    logger().log_event(message, event);
}

/// [`Logger::with_event_logging`] on the global logger
pub async fn with_event_logging<F, Fut, T, E>(scope: EventScope, run: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: LoggableError,
{
    logger().with_event_logging(scope, run).await
}
