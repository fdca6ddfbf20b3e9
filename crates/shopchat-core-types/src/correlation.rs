//! Correlation types for request tracking
//!
//! A `RequestId` ties together every log line produced while handling one
//! logical request. Ids arrive on inbound headers or are generated fresh at
//! the HTTP boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary inbound/outbound correlation header.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Alias header, consulted only when the primary header is absent.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Value written to `requestId` when a line is emitted outside any request scope.
pub const FALLBACK_REQUEST_ID: &str = "no-request-id";

/// Maximum accepted length of an inbound id, after trimming.
pub const MAX_INBOUND_ID_LEN: usize = 128;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Accept an id supplied by a caller, if it is usable.
    ///
    /// The raw value is trimmed and one layer of surrounding braces is
    /// stripped. Anything empty, longer than [`MAX_INBOUND_ID_LEN`], or
    /// containing characters outside `[A-Za-z0-9._-]` is rejected.
    pub fn from_inbound(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let unbraced = trimmed
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(trimmed)
            .trim();

        if unbraced.is_empty() || unbraced.len() > MAX_INBOUND_ID_LEN {
            return None;
        }
        if !unbraced
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        {
            return None;
        }
        Some(Self(unbraced.to_string()))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolve the id for an inbound request.
///
/// `primary` is the value of [`REQUEST_ID_HEADER`], `alias` the value of
/// [`CORRELATION_ID_HEADER`]. The alias is only consulted when no primary
/// header was sent at all. An unusable value yields a freshly generated id.
pub fn derive_request_id(primary: Option<&str>, alias: Option<&str>) -> RequestId {
    primary
        .or(alias)
        .and_then(RequestId::from_inbound)
        .unwrap_or_default()
}
