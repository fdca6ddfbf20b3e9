//! Redaction engine
//!
//! Pure functions that scrub secrets and PII out of strings and arbitrary
//! JSON metadata before it reaches a log line. Two layers work together:
//!
//! - **Key policy**: field names that look like credentials or PII have their
//!   value replaced wholesale; raw bodies are omitted; a small allowlist of
//!   operational keys stays readable.
//! - **Value shape**: platform token prefixes, signed-token shapes and long
//!   opaque blobs are caught even under innocuous key names.
//!
//! Nothing here performs I/O or returns an error.

mod patterns;
mod strings;
mod structure;

pub use patterns::{classify_key, KeyClass, ALLOWED_KEYS};
pub use strings::{sanitize_error_text, scrub_message_string, scrub_value_string};
pub use structure::{redact_structure, MAX_ARRAY_ITEMS, MAX_DEPTH, MAX_OBJECT_ENTRIES};
