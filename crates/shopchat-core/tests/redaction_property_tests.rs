#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use serde_json::{json, Value};
use shopchat_core::logging_facility::TestCapture;
use shopchat_core::redaction::{redact_structure, scrub_value_string};
use shopchat_core_types::schema::{OMITTED, REDACTED};

fn platform_token() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["shpat_", "shpca_", "shppa_", "shpss_", "shpua_"]),
        "[A-Za-z0-9]{1,40}",
    )
        .prop_map(|(prefix, rest)| format!("{prefix}{rest}"))
}

fn uuid_string() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

fn sensitive_key() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "accessToken",
        "refresh_token",
        "Authorization",
        "clientSecret",
        "apiKey",
        "hmac",
        "x-shopify-hmac-sha256",
        "code",
        "state",
        "password",
        "customerEmail",
        "phone",
        "billingAddress",
    ])
    .prop_map(str::to_string)
}

fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[ -~]{0,40}".prop_map(Value::String),
        platform_token().prop_map(Value::String),
        uuid_string().prop_map(Value::String),
    ];
    leaf.prop_recursive(8, 128, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_]{1,12}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn platform_tokens_are_fully_redacted(token in platform_token()) {
        prop_assert_eq!(scrub_value_string(&token), REDACTED);
    }

    #[test]
    fn uuids_are_fixed_points(uuid in uuid_string()) {
        prop_assert_eq!(scrub_value_string(&uuid), uuid);
    }

    #[test]
    fn sensitive_keys_are_redacted_in_the_line(key in sensitive_key(), secret in "[a-z0-9]{6,20}") {
        let (logger, capture) = TestCapture::new();
        let mut metadata = serde_json::Map::new();
        metadata.insert(key.clone(), json!(format!("zz{secret}")));
        logger.info("prop", &Value::Object(metadata));

        let line = &capture.lines()[0];
        prop_assert_eq!(&line.record[key.as_str()], REDACTED);
        let needle = format!("zz{secret}");
        prop_assert!(!line.raw.contains(&needle));
    }

    #[test]
    fn body_keys_are_omitted(key in prop::sample::select(vec!["body", "rawBody", "payload", "webhookPayload"]), inner in arbitrary_json()) {
        let out = redact_structure(&json!({ key: inner }));
        prop_assert_eq!(&out[key], OMITTED);
    }

    #[test]
    fn redaction_is_idempotent(value in arbitrary_json()) {
        let once = redact_structure(&value);
        let twice = redact_structure(&once);
        prop_assert_eq!(once, twice);
    }
}
