#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use serde_json::json;
use shopchat_core::errors::ShopchatError;
use shopchat_core::logging_facility::test_capture::init_test_capture;
use shopchat_core::logging_facility::{self, EventMetadata, EventScope, EventType, Outcome};
use shopchat_core::{log_error, log_info, with_request_id, with_request_id_sync, RequestId};
use shopchat_core_types::schema::{
    FIELD_DURATION_MS, FIELD_ERROR_NAME, FIELD_REDIRECT, FIELD_STATUS, OMITTED, OUTCOME_FAILURE,
    OUTCOME_SUCCESS, REDACTED,
};

fn rid(name: &str) -> RequestId {
    RequestId::from_string(name.to_string())
}

#[test]
fn test_sensitive_metadata_never_reaches_the_line() {
    let capture = init_test_capture();
    let id = "req-sensitive-unique-1";

    with_request_id_sync(rid(id), || {
        logging_facility::info(
            "token exchange",
            &json!({
                "accessToken": "shpat_1234567890",
                "authorization": "Bearer abc.def.ghi",
                "email": "test@example.com",
                "nested": {"hmac": "deadbeef"},
            }),
        );
    });

    let lines = capture.lines_for_request(id);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];

    for secret in ["shpat_1234567890", "Bearer abc.def.ghi", "test@example.com", "deadbeef"] {
        assert!(!line.raw.contains(secret), "{secret} leaked into {}", line.raw);
    }
    assert!(line.record.is_object(), "line must stay valid JSON");
    assert_eq!(line.record["accessToken"], REDACTED);
    assert_eq!(line.record["authorization"], REDACTED);
    assert_eq!(line.record["nested"]["hmac"], REDACTED);
}

#[test]
fn test_webhook_uuid_survives() {
    let capture = init_test_capture();
    let id = "req-webhook-uuid-unique-2";

    with_request_id_sync(rid(id), || {
        logging_facility::info(
            "webhook received",
            &json!({"webhookId": "2feb21ca-d583-4d96-888c-e0af91f64305"}),
        );
    });

    let line = &capture.lines_for_request(id)[0];
    assert!(line.raw.contains("2feb21ca-d583-4d96-888c-e0af91f64305"));
}

#[test]
fn test_body_is_omitted_whatever_it_contains() {
    let capture = init_test_capture();
    let id = "req-body-unique-3";

    with_request_id_sync(rid(id), || {
        logging_facility::warn(
            "webhook payload",
            &json!({
                "body": {"customer": {"email": "a@b.co", "token": "shpat_abc"}},
                "rawPayload": "access_token=zzz",
            }),
        );
    });

    let line = &capture.lines_for_request(id)[0];
    assert_eq!(line.record["body"], OMITTED);
    assert_eq!(line.record["rawPayload"], OMITTED);
    assert!(!line.raw.contains("a@b.co"));
    assert!(!line.raw.contains("zzz"));
}

#[test]
fn test_macros_build_metadata() {
    let capture = init_test_capture();
    let id = "req-macros-unique-4";

    with_request_id_sync(rid(id), || {
        log_info!("webhook routed", "topic": "app/uninstalled", "attempt": 2);
        log_error!("webhook failed", "errorMessage": "upstream said token=abc123");
    });

    let lines = capture.lines_for_request(id);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].str_field("topic"), Some("app/uninstalled"));
    assert_eq!(lines[0].record["attempt"], 2);
    assert_eq!(lines[1].str_field("level"), Some("error"));
    assert_eq!(
        lines[1].str_field("errorMessage"),
        Some("upstream said token=[REDACTED]")
    );
}

#[test]
fn test_upstream_error_text_is_scrubbed() {
    let capture = init_test_capture();
    let id = "req-upstream-error-unique-12";

    with_request_id_sync(rid(id), || {
        logging_facility::error(
            "exchange failed",
            &json!({
                "errorMessage": r#"upstream rejected session_token=s3cr3tvalue99 body {"access_token":"abc123secret"}"#,
                "url": "https://partners.example.com/admin?shopify_access_token=zzsecretzz&shop=demo.myshopify.com",
            }),
        );
    });

    let lines = capture.lines_for_request(id);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    for secret in ["s3cr3tvalue99", "abc123secret", "zzsecretzz"] {
        assert!(!line.raw.contains(secret), "{secret} leaked into {}", line.raw);
    }
    assert!(line
        .str_field("url")
        .unwrap()
        .contains("shop=demo.myshopify.com"));
}

#[test]
fn test_log_event_levels_follow_outcome() {
    let capture = init_test_capture();
    let id = "req-log-event-unique-5";

    with_request_id_sync(rid(id), || {
        logging_facility::log_event(
            "uninstall handled",
            &EventMetadata::new(EventType::WebhookUninstall, Outcome::Success)
                .with_shop_domain("demo.myshopify.com"),
        );
        logging_facility::log_event(
            "scopes update failed",
            &EventMetadata::new(EventType::WebhookScopesUpdate, Outcome::Failure)
                .with_error("ERR_IO", "disk full"),
        );
    });

    let lines = capture.lines_for_request(id);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].str_field("level"), Some("info"));
    assert_eq!(lines[0].str_field("shopDomain"), Some("demo.myshopify.com"));
    assert_eq!(lines[1].str_field("level"), Some("error"));
    assert_eq!(lines[1].str_field("severity"), Some("ERROR"));
}

#[tokio::test]
async fn test_redirect_is_one_success_event() {
    let capture = init_test_capture();
    let id = "req-redirect-unique-6";

    let result: Result<(), ShopchatError> = with_request_id(rid(id), async {
        logging_facility::with_event_logging(
            EventScope::new(EventType::OauthStart, "oauth start")
                .with_shop_domain("demo.myshopify.com"),
            || async { Err(ShopchatError::redirect(302, "/auth/callback")) },
        )
        .await
    })
    .await;

    assert!(matches!(
        result,
        Err(ShopchatError::Redirect { status: 302, .. })
    ));

    let events: Vec<_> = capture
        .lines_for_request(id)
        .into_iter()
        .filter(|l| l.event_type() == Some("oauth_start"))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome(), Some(OUTCOME_SUCCESS));
    assert_eq!(events[0].record[FIELD_REDIRECT], true);
    assert_eq!(events[0].record[FIELD_STATUS], 302);
    assert!(events[0].field("errorMessage").is_none());
}

#[tokio::test]
async fn test_plain_error_is_one_failure_event() {
    let capture = init_test_capture();
    let id = "req-failure-unique-7";

    let result: Result<(), anyhow::Error> = with_request_id(rid(id), async {
        logging_facility::with_event_logging(
            EventScope::new(EventType::SessionExchange, "session exchange"),
            || async {
                tokio::time::sleep(Duration::from_millis(2)).await;
                Err(anyhow::anyhow!("exchange rejected for access_token=abc123"))
            },
        )
        .await
    })
    .await;

    assert!(result.is_err());

    let events: Vec<_> = capture
        .lines_for_request(id)
        .into_iter()
        .filter(|l| l.event_type().is_some())
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome(), Some(OUTCOME_FAILURE));
    assert_eq!(events[0].str_field(FIELD_ERROR_NAME), Some("Error"));
    let message = events[0].str_field("errorMessage").unwrap();
    assert!(!message.is_empty());
    assert!(!message.contains("abc123"));
    assert!(events[0].record[FIELD_DURATION_MS].is_u64());
}

#[tokio::test]
async fn test_success_records_duration() {
    let capture = init_test_capture();
    let id = "req-success-unique-8";

    let value = with_request_id(rid(id), async {
        logging_facility::with_event_logging(
            EventScope::new(EventType::OauthCallback, "oauth callback").with_merchant_id("m-42"),
            || async { Ok::<_, ShopchatError>(7) },
        )
        .await
    })
    .await
    .unwrap();

    assert_eq!(value, 7);
    capture.assert_event_exists("oauth_callback", "success");
    let line = &capture.lines_for_request(id)[0];
    assert_eq!(line.str_field("merchantId"), Some("m-42"));
    assert!(line.record[FIELD_DURATION_MS].is_u64());
}

#[tokio::test]
async fn test_cancelled_operation_still_logs_once() {
    let capture = init_test_capture();
    let id = "req-cancel-unique-9";

    let timed_out = with_request_id(rid(id), async {
        tokio::time::timeout(
            Duration::from_millis(10),
            logging_facility::with_event_logging(
                EventScope::new(EventType::Render, "render"),
                || async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok::<_, ShopchatError>(())
                },
            ),
        )
        .await
    })
    .await;

    assert!(timed_out.is_err());
    let events: Vec<_> = capture
        .lines_for_request(id)
        .into_iter()
        .filter(|l| l.event_type() == Some("render"))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome(), Some(OUTCOME_FAILURE));
    assert_eq!(events[0].str_field(FIELD_ERROR_NAME), Some("cancelled"));
}

#[tokio::test]
async fn test_panicking_operation_logs_then_resumes() {
    let capture = init_test_capture();
    let id = "req-panic-unique-10";

    let handle = tokio::spawn(with_request_id(rid(id), async {
        logging_facility::with_event_logging(
            EventScope::new(EventType::WebhookOther, "webhook"),
            || async {
                if true {
                    panic!("handler blew up");
                }
                Ok::<_, ShopchatError>(())
            },
        )
        .await
    }));

    let joined = handle.await;
    assert!(joined.unwrap_err().is_panic());

    let events: Vec<_> = capture
        .lines_for_request(id)
        .into_iter()
        .filter(|l| l.event_type().is_some())
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome(), Some(OUTCOME_FAILURE));
    assert_eq!(events[0].str_field(FIELD_ERROR_NAME), Some("panic"));
    assert_eq!(events[0].str_field("errorMessage"), Some("handler blew up"));
}

#[test]
fn test_outside_scope_uses_fallback_id() {
    let capture = init_test_capture();
    let marker = "outside-scope-unique-11";

    logging_facility::debug(marker, &());

    let line = capture
        .lines()
        .into_iter()
        .find(|l| l.str_field("message") == Some(marker))
        .unwrap();
    assert_eq!(line.request_id(), Some("no-request-id"));
}
