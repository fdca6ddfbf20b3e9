//! String scrubbing in two strengths
//!
//! Metadata values get the aggressive pass. The human-readable `message` of
//! a record gets a conservative pass so dotted event names such as
//! `embedded.auth.start` stay legible.

use shopchat_core_types::schema::{BEARER_REDACTED, REDACTED, REDACTED_EMAIL, REDACTED_PHONE};

use super::patterns::{
    AUTHORIZATION_INLINE, BEARER_INLINE, EMAIL, KEY_VALUE_INLINE, LEADING_BEARER, OPAQUE_BLOB,
    PHONE, PLATFORM_TOKEN, SHORT_ALPHA, SIGNED_TOKEN_SHAPE, UUID,
};

/// Minimum third-segment length for a value to count as a signed token.
const MIN_SIGNATURE_LEN: usize = 12;

/// Minimum whole-string length for a message to count as a signed token.
const MIN_MESSAGE_TOKEN_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Value,
    Message,
}

/// Aggressively scrub a string found anywhere inside metadata.
///
/// Canonical UUIDs are returned untouched: they are webhook and correlation
/// identifiers, not secrets.
pub fn scrub_value_string(input: &str) -> String {
    scrub(input, Mode::Value)
}

/// Conservatively scrub the `message` field of a record.
pub fn scrub_message_string(input: &str) -> String {
    scrub(input, Mode::Message)
}

/// Scrub error text. Error messages are untrusted, so this is the aggressive pass.
pub fn sanitize_error_text(input: &str) -> String {
    scrub_value_string(input)
}

fn scrub(input: &str, mode: Mode) -> String {
    if UUID.is_match(input) {
        return input.to_string();
    }

    let scrubbed = scrub_substrings(input);

    if LEADING_BEARER.is_match(&scrubbed) {
        return BEARER_REDACTED.to_string();
    }
    // The shape checks also run on the raw input: substring scrubbing can
    // break up a blob that was a token as a whole.
    if is_whole_token(input, mode) || is_whole_token(&scrubbed, mode) {
        return REDACTED.to_string();
    }
    scrubbed
}

fn scrub_substrings(input: &str) -> String {
    let out = BEARER_INLINE.replace_all(input, BEARER_REDACTED);
    let out = AUTHORIZATION_INLINE.replace_all(&out, format!("${{1}}{REDACTED}").as_str());
    let out = KEY_VALUE_INLINE.replace_all(&out, format!("${{1}}{REDACTED}").as_str());
    let out = EMAIL.replace_all(&out, REDACTED_EMAIL);
    let out = PHONE.replace_all(&out, REDACTED_PHONE);
    out.into_owned()
}

fn is_whole_token(s: &str, mode: Mode) -> bool {
    looks_like_signed_token(s, mode) || PLATFORM_TOKEN.is_match(s) || OPAQUE_BLOB.is_match(s)
}

fn looks_like_signed_token(s: &str, mode: Mode) -> bool {
    if !SIGNED_TOKEN_SHAPE.is_match(s) {
        return false;
    }
    let Some(third) = s.split('.').nth(2) else {
        return false;
    };
    if SHORT_ALPHA.is_match(third) {
        return false;
    }
    match mode {
        Mode::Value => third.len() >= MIN_SIGNATURE_LEN,
        Mode::Message => third.len() >= MIN_SIGNATURE_LEN && s.len() >= MIN_MESSAGE_TOKEN_LEN,
    }
}
