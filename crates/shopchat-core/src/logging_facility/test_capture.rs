//! Test capture mode for deterministic logging assertions
//!
//! This module provides an in-memory sink that keeps every rendered line,
//! parsed back into JSON, so tests can assert on exactly what would have
//! been written to stdout/stderr.

use std::sync::{Arc, Mutex, OnceLock};

use serde_json::Value;
use shopchat_core_types::schema::{FIELD_EVENT_TYPE, FIELD_OUTCOME, FIELD_REQUEST_ID};
use tracing_subscriber::util::SubscriberInitExt;

use super::logger::{Level, Logger};
use super::set_global_logger;
use super::sink::LogSink;

/// A captured log line
#[derive(Clone, Debug)]
pub struct CapturedLine {
    pub level: Level,
    /// The line exactly as rendered
    pub raw: String,
    /// The line parsed as JSON (`Null` if it was not valid JSON)
    pub record: Value,
}

impl CapturedLine {
    /// Get a top-level field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    /// Get a top-level string field
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.str_field(FIELD_REQUEST_ID)
    }

    pub fn event_type(&self) -> Option<&str> {
        self.str_field(FIELD_EVENT_TYPE)
    }

    pub fn outcome(&self) -> Option<&str> {
        self.str_field(FIELD_OUTCOME)
    }
}

/// Sink that records lines in memory
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl LogSink for CaptureSink {
    fn write_line(&self, level: Level, line: &str) {
        let captured = CapturedLine {
            level,
            raw: line.to_string(),
            record: serde_json::from_str(line).unwrap_or(Value::Null),
        };

        self.lines
            .lock()
            .map(|mut lines| lines.push(captured))
            .ok();
    }
}

/// Handle for accessing captured lines in tests
#[derive(Clone)]
pub struct TestCapture {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl TestCapture {
    /// Create an isolated logger and the capture that observes it
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Logger, TestCapture) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = CaptureSink {
            lines: lines.clone(),
        };
        (Logger::new(Arc::new(sink)), TestCapture { lines })
    }

    /// Get all captured lines
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Lines emitted under the given request id
    pub fn lines_for_request(&self, request_id: &str) -> Vec<CapturedLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.request_id() == Some(request_id))
            .collect()
    }

    /// Lines that carry an `eventType`
    pub fn events(&self) -> Vec<CapturedLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.event_type().is_some())
            .collect()
    }

    /// Assert that an event exists with the given type and outcome
    ///
    /// # Panics
    ///
    /// Panics if the event is not found
    pub fn assert_event_exists(&self, event_type: &str, outcome: &str) {
        let events = self.events();
        let found = events
            .iter()
            .any(|e| e.event_type() == Some(event_type) && e.outcome() == Some(outcome));
        assert!(
            found,
            "Expected event eventType={} outcome={} not found in {} captured events",
            event_type,
            outcome,
            events.len()
        );
    }

    /// Clear all captured lines
    pub fn clear(&self) {
        self.lines.lock().map(|mut l| l.clear()).ok();
    }

    /// Count lines matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedLine) -> bool,
    {
        self.lines().iter().filter(|l| predicate(l)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Route the global logger into a shared capture
///
/// Every test that uses the global logging functions shares this capture,
/// so tests should filter by a request id of their own.
///
/// # Example
///
/// ```
/// use shopchat_core::logging_facility::test_capture::init_test_capture;
/// use shopchat_core::log_info;
///
/// let capture = init_test_capture();
/// log_info!("doc example line", "topic": "orders/create");
/// assert!(capture
///     .lines()
///     .iter()
///     .any(|l| l.str_field("message") == Some("doc example line")));
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (logger, capture) = TestCapture::new();
            set_global_logger(logger);
            let _ = tracing_subscriber::registry().try_init();
            capture
        })
        .clone()
}
