//! Canonical schema constants for structured log records
//!
//! These constants keep the emitted line format and the redaction markers
//! consistent across the logger, the redaction engine and tests.

// Reserved record keys, written in this order ahead of caller metadata
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_LEVEL: &str = "level";
pub const FIELD_SEVERITY: &str = "severity";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_REQUEST_ID: &str = "requestId";

pub const RESERVED_FIELDS: [&str; 5] = [
    FIELD_TIMESTAMP,
    FIELD_LEVEL,
    FIELD_SEVERITY,
    FIELD_MESSAGE,
    FIELD_REQUEST_ID,
];

// Event metadata keys
pub const FIELD_EVENT_TYPE: &str = "eventType";
pub const FIELD_OUTCOME: &str = "outcome";
pub const FIELD_DURATION_MS: &str = "durationMs";
pub const FIELD_ERROR_NAME: &str = "errorName";
pub const FIELD_ERROR_MESSAGE: &str = "errorMessage";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_REDIRECT: &str = "redirect";

/// Key under which non-object metadata is placed.
pub const FIELD_METADATA: &str = "metadata";

/// Marker field appended to an object whose entries were capped.
pub const FIELD_TRUNCATED: &str = "__truncated__";

// Placeholders substituted by the redaction engine
pub const REDACTED: &str = "[REDACTED]";
pub const REDACTED_EMAIL: &str = "[REDACTED_EMAIL]";
pub const REDACTED_PHONE: &str = "[REDACTED_PHONE]";
pub const BEARER_REDACTED: &str = "Bearer [REDACTED]";
pub const OMITTED: &str = "[OMITTED]";
pub const TRUNCATED: &str = "[Truncated]";

// Canonical outcome names
pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_FAILURE: &str = "failure";
