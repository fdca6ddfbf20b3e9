//! Typed event records and the one-event-per-operation wrapper
//!
//! An event is the terminal record of one logical operation: OAuth start or
//! callback, a session token exchange, a webhook delivery. Boundary code
//! either builds an [`EventMetadata`] and calls [`Logger::log_event`], or
//! wraps the whole operation in [`Logger::with_event_logging`], which
//! guarantees exactly one event line whatever the operation does.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::logger::{Level, Logger};
use crate::errors::{is_redirect_status, LoggableError};

/// `errorName` recorded when the wrapped operation panicked.
pub const PANIC_ERROR_NAME: &str = "panic";

/// `errorName` recorded when the wrapped future was dropped before finishing.
pub const CANCELLED_ERROR_NAME: &str = "cancelled";

/// Closed set of operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    OauthStart,
    OauthCallback,
    SessionExchange,
    WebhookUninstall,
    WebhookScopesUpdate,
    WebhookOther,
    ConfigValidation,
    Render,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::OauthStart => "oauth_start",
            EventType::OauthCallback => "oauth_callback",
            EventType::SessionExchange => "session_exchange",
            EventType::WebhookUninstall => "webhook_uninstall",
            EventType::WebhookScopesUpdate => "webhook_scopes_update",
            EventType::WebhookOther => "webhook_other",
            EventType::ConfigValidation => "config_validation",
            EventType::Render => "render",
        }
    }
}

/// Terminal outcome of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Level an event with this outcome is logged at
    pub fn level(&self) -> Level {
        match self {
            Outcome::Success => Level::Info,
            Outcome::Failure => Level::Error,
        }
    }
}

/// Metadata of one event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub event_type: EventType,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<bool>,
    /// Free-form extension keys, flattened into the record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventMetadata {
    pub fn new(event_type: EventType, outcome: Outcome) -> Self {
        Self {
            event_type,
            outcome,
            merchant_id: None,
            shop_domain: None,
            duration_ms: None,
            status: None,
            topic: None,
            webhook_id: None,
            error_name: None,
            error_message: None,
            redirect: None,
            extra: Map::new(),
        }
    }

    pub fn with_merchant_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_id = Some(id.into());
        self
    }

    pub fn with_shop_domain(mut self, shop: impl Into<String>) -> Self {
        self.shop_domain = Some(shop.into());
        self
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_webhook_id(mut self, id: impl Into<String>) -> Self {
        self.webhook_id = Some(id.into());
        self
    }

    pub fn with_error(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_name = Some(name.into());
        self.error_message = Some(message.into());
        self
    }

    pub fn with_redirect(mut self, redirect: bool) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// Attach an extension key
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Describes an operation wrapped by [`Logger::with_event_logging`]
#[derive(Debug, Clone)]
pub struct EventScope {
    pub event_type: EventType,
    pub message: String,
    pub shop_domain: Option<String>,
    pub merchant_id: Option<String>,
}

impl EventScope {
    pub fn new(event_type: EventType, message: impl Into<String>) -> Self {
        Self {
            event_type,
            message: message.into(),
            shop_domain: None,
            merchant_id: None,
        }
    }

    pub fn with_shop_domain(mut self, shop: impl Into<String>) -> Self {
        self.shop_domain = Some(shop.into());
        self
    }

    pub fn with_merchant_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_id = Some(id.into());
        self
    }

    fn event(&self, outcome: Outcome, duration_ms: u64) -> EventMetadata {
        let mut event = EventMetadata::new(self.event_type, outcome).with_duration_ms(duration_ms);
        event.shop_domain = self.shop_domain.clone();
        event.merchant_id = self.merchant_id.clone();
        event
    }
}

impl Logger {
    /// Emit an event record. Failures are logged at `error`, everything else at `info`.
    pub fn log_event(&self, message: &str, event: &EventMetadata) {
        self.emit(event.outcome.level(), message, event);
    }

    /// Run `run` and log exactly one event for it.
    ///
    /// - `Ok` logs a success event with `durationMs`.
    /// - An error carrying a 301/302/303/307/308 status is a redirect: it
    ///   logs a success event with `status` and `redirect: true`.
    /// - Any other error logs a failure event with `errorName` and
    ///   `errorMessage`.
    ///
    /// The result is returned to the caller untouched. A panic is logged as
    /// a failure and then resumed; dropping the returned future before it
    /// completes logs a `cancelled` failure.
    pub async fn with_event_logging<F, Fut, T, E>(&self, scope: EventScope, run: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: LoggableError,
    {
        let mut pending = PendingEvent::new(self.clone(), scope);
        let outcome = AssertUnwindSafe(async move { run().await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(value)) => {
                pending.finish(Outcome::Success, |event| event);
                Ok(value)
            }
            Ok(Err(err)) => {
                match err.redirect_status().filter(|status| is_redirect_status(*status)) {
                    Some(status) => pending.finish(Outcome::Success, |event| {
                        event.with_status(status).with_redirect(true)
                    }),
                    None => {
                        let name = err.error_name().into_owned();
                        let mut message = err.to_string();
                        if message.trim().is_empty() {
                            message = name.clone();
                        }
                        pending.finish(Outcome::Failure, |event| event.with_error(name, message));
                    }
                }
                Err(err)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                pending.finish(Outcome::Failure, |event| {
                    event.with_error(PANIC_ERROR_NAME, message)
                });
                panic::resume_unwind(payload)
            }
        }
    }
}

/// Owns the obligation to log one event; logs a cancellation if dropped unfinished.
struct PendingEvent {
    logger: Logger,
    scope: EventScope,
    started: Instant,
    done: bool,
}

impl PendingEvent {
    fn new(logger: Logger, scope: EventScope) -> Self {
        Self {
            logger,
            scope,
            started: Instant::now(),
            done: false,
        }
    }

    fn finish(&mut self, outcome: Outcome, decorate: impl FnOnce(EventMetadata) -> EventMetadata) {
        if self.done {
            return;
        }
        self.done = true;
        let elapsed = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let event = decorate(self.scope.event(outcome, elapsed));
        self.logger.log_event(&self.scope.message, &event);
    }
}

impl Drop for PendingEvent {
    fn drop(&mut self) {
        self.finish(Outcome::Failure, |event| {
            event.with_error(
                CANCELLED_ERROR_NAME,
                "operation was dropped before it completed",
            )
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "operation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names_match_serde() {
        for event_type in [
            EventType::OauthStart,
            EventType::OauthCallback,
            EventType::SessionExchange,
            EventType::WebhookUninstall,
            EventType::WebhookScopesUpdate,
            EventType::WebhookOther,
            EventType::ConfigValidation,
            EventType::Render,
        ] {
            let json = serde_json::to_value(event_type).unwrap();
            assert_eq!(json, event_type.as_str());
        }
    }

    #[test]
    fn test_outcome_levels() {
        assert_eq!(Outcome::Success.level(), Level::Info);
        assert_eq!(Outcome::Failure.level(), Level::Error);
    }

    #[test]
    fn test_metadata_serializes_camel_case_and_skips_empty() {
        let event = EventMetadata::new(EventType::WebhookUninstall, Outcome::Success)
            .with_shop_domain("demo.myshopify.com")
            .with_webhook_id("2feb21ca-d583-4d96-888c-e0af91f64305")
            .with_extra("deletedSessions", 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "webhook_uninstall");
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["shopDomain"], "demo.myshopify.com");
        assert_eq!(json["webhookId"], "2feb21ca-d583-4d96-888c-e0af91f64305");
        assert_eq!(json["deletedSessions"], 3);
        assert!(json.get("errorMessage").is_none());
        assert!(json.get("durationMs").is_none());
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "operation panicked");
    }
}
