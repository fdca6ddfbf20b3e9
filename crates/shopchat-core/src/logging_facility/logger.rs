//! Structured JSON logger
//!
//! Every call renders exactly one line: reserved fields first, then the
//! sanitized caller metadata flattened at the top level.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shopchat_core_types::correlation::FALLBACK_REQUEST_ID;
use shopchat_core_types::schema::{
    FIELD_ERROR_MESSAGE, FIELD_LEVEL, FIELD_MESSAGE, FIELD_METADATA, FIELD_REQUEST_ID,
    FIELD_SEVERITY, FIELD_TIMESTAMP, RESERVED_FIELDS,
};
use shopchat_core_types::RequestId;

use super::sink::{LogSink, StdStreamSink};
use crate::correlation::current_request_id;
use crate::redaction::{redact_structure, sanitize_error_text, scrub_message_string};

/// Message written when a record could not be built.
const FALLBACK_MESSAGE: &str = "log record could not be rendered";

/// Record severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Value of the `level` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Value of the `severity` field
    pub fn severity(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Parse a `level` field value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle used to emit records. Cheap to clone.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stdio()
    }
}

impl Logger {
    /// Create a logger writing to `sink`
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Create a logger writing to stdout/stderr
    pub fn stdio() -> Self {
        Self::new(Arc::new(StdStreamSink))
    }

    /// Emit one record.
    ///
    /// Never panics and never fails: if the record cannot be built, a
    /// minimal fixed-shape record is written instead.
    pub fn emit<M>(&self, level: Level, message: &str, metadata: &M)
    where
        M: Serialize + ?Sized,
    {
        let request_id = current_request_id();
        let line = panic::catch_unwind(AssertUnwindSafe(|| {
            render_line(level, message, metadata, request_id.as_ref())
        }))
        .unwrap_or_else(|_| fallback_line(level, request_id.as_ref()));
        self.sink.write_line(level, &line);
    }

    pub fn debug<M: Serialize + ?Sized>(&self, message: &str, metadata: &M) {
        self.emit(Level::Debug, message, metadata);
    }

    pub fn info<M: Serialize + ?Sized>(&self, message: &str, metadata: &M) {
        self.emit(Level::Info, message, metadata);
    }

    pub fn warn<M: Serialize + ?Sized>(&self, message: &str, metadata: &M) {
        self.emit(Level::Warn, message, metadata);
    }

    pub fn error<M: Serialize + ?Sized>(&self, message: &str, metadata: &M) {
        self.emit(Level::Error, message, metadata);
    }
}

/// Sanitize caller metadata into the map that gets flattened into a record.
///
/// A string `errorMessage` is scrubbed with the error-text pass rather than
/// blanked by the key policy, so it stays readable with secrets removed.
/// Metadata that is not an object is kept under `metadata`; metadata that
/// cannot be serialized at all is replaced by a placeholder.
pub fn sanitize_metadata<M>(metadata: &M) -> Map<String, Value>
where
    M: Serialize + ?Sized,
{
    let raw = match serde_json::to_value(metadata) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "log metadata could not be serialized");
            let mut out = Map::new();
            out.insert(FIELD_METADATA.to_string(), json!("[Unserializable]"));
            return out;
        }
    };

    match raw {
        Value::Null => Map::new(),
        Value::Object(map) => {
            let error_message = match map.get(FIELD_ERROR_MESSAGE) {
                Some(Value::String(text)) => Some(sanitize_error_text(text)),
                _ => None,
            };
            let mut out = match redact_structure(&Value::Object(map)) {
                Value::Object(out) => out,
                _ => Map::new(),
            };
            if let (Some(text), Some(slot)) = (error_message, out.get_mut(FIELD_ERROR_MESSAGE)) {
                *slot = Value::String(text);
            }
            out
        }
        other => {
            let mut out = Map::new();
            out.insert(FIELD_METADATA.to_string(), redact_structure(&other));
            out
        }
    }
}

fn render_line<M>(
    level: Level,
    message: &str,
    metadata: &M,
    request_id: Option<&RequestId>,
) -> String
where
    M: Serialize + ?Sized,
{
    let mut record = base_record(level, request_id);
    record.insert(
        FIELD_MESSAGE.to_string(),
        Value::String(scrub_message_string(message)),
    );
    for (key, value) in sanitize_metadata(metadata) {
        if !RESERVED_FIELDS.contains(&key.as_str()) {
            record.insert(key, value);
        }
    }
    Value::Object(record).to_string()
}

fn fallback_line(level: Level, request_id: Option<&RequestId>) -> String {
    let mut record = base_record(level, request_id);
    record.insert(FIELD_MESSAGE.to_string(), json!(FALLBACK_MESSAGE));
    Value::Object(record).to_string()
}

fn base_record(level: Level, request_id: Option<&RequestId>) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert(
        FIELD_TIMESTAMP.to_string(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    record.insert(FIELD_LEVEL.to_string(), json!(level.as_str()));
    record.insert(FIELD_SEVERITY.to_string(), json!(level.severity()));
    // Placeholder so the reserved keys keep their order.
    record.insert(FIELD_MESSAGE.to_string(), Value::Null);
    record.insert(
        FIELD_REQUEST_ID.to_string(),
        json!(request_id.map_or(FALLBACK_REQUEST_ID, RequestId::as_str)),
    );
    record
}
