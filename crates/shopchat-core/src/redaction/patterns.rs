//! Compiled patterns and key policy used by the redaction engine

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static redaction pattern must compile")
}

/// `Bearer <token>` anywhere in free text.
pub(crate) static BEARER_INLINE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*"));

/// `Authorization: <value>` / `authorization=<value>` in free text.
pub(crate) static AUTHORIZATION_INLINE: Lazy<Regex> = Lazy::new(|| {
    compile(r#"(?i)\b(authorization\s*[:=]\s*)(?:(?:bearer|basic|token)\s+)?[^\s,;&"']+"#)
});

/// Secret-bearing `key=value` / `key: value` pairs, including OAuth query params
/// and quoted JSON members. Any key ending in `token` counts, so prefixed names
/// like `session_token` are caught too.
pub(crate) static KEY_VALUE_INLINE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r#"(?i)((?:[A-Za-z0-9_]*token|\bhmac|\bcode|\bstate)["']?\s*[=:]\s*["']?)[^\s&,;"'}]+"#,
    )
});

pub(crate) static EMAIL: Lazy<Regex> = Lazy::new(|| {
    compile(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
});

/// Nine or more digits with at most two separator characters between each.
pub(crate) static PHONE: Lazy<Regex> =
    Lazy::new(|| compile(r"\+?\(?\d(?:[\s().\-]{0,2}\d){8,}"));

pub(crate) static LEADING_BEARER: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^bearer\s"));

/// Three dot-separated URL-safe base64 segments.
pub(crate) static SIGNED_TOKEN_SHAPE: Lazy<Regex> =
    Lazy::new(|| compile(r"^[A-Za-z0-9_\-]+\.[A-Za-z0-9_\-]+\.[A-Za-z0-9_\-]+$"));

/// A TLD or the last word of a dotted event name.
pub(crate) static SHORT_ALPHA: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z]{2,10}$"));

/// Commerce-platform access token prefixes (admin, custom app, private app,
/// shared secret, storefront user).
pub(crate) static PLATFORM_TOKEN: Lazy<Regex> =
    Lazy::new(|| compile(r"shp(?:at|ca|pa|ss|ua)_"));

pub(crate) static UUID: Lazy<Regex> = Lazy::new(|| {
    compile(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
});

pub(crate) static OPAQUE_BLOB: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z0-9_+/=\-]{32,}$"));

static SENSITIVE_KEY: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(token|authorization|bearer|jwt|secret|api[_\-]?key|private[_\-]?key|encryption[_\-]?key|hmac|signature|code|state|password|email|phone|address|ssn|dob)",
    )
});

/// Keys that stay readable in log search. Values are still sanitized.
pub const ALLOWED_KEYS: [&str; 7] = [
    "shop",
    "shopdomain",
    "shop_domain",
    "merchantid",
    "requestid",
    "eventtype",
    "outcome",
];

/// How a metadata key is treated by [`redact_structure`](super::redact_structure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// Operational field on the allowlist.
    Allowed,
    /// Raw request or webhook body; never logged.
    Body,
    /// Name suggests a credential or PII; value replaced wholesale.
    Sensitive,
    /// Anything else; value is recursed into.
    Plain,
}

/// Classify a metadata key. Comparison is case-insensitive.
pub fn classify_key(key: &str) -> KeyClass {
    let lowered = key.to_ascii_lowercase();
    if ALLOWED_KEYS.contains(&lowered.as_str()) {
        KeyClass::Allowed
    } else if lowered.contains("payload") || lowered.contains("body") {
        KeyClass::Body
    } else if SENSITIVE_KEY.is_match(&lowered) {
        KeyClass::Sensitive
    } else {
        KeyClass::Plain
    }
}
