//! Structured logging macros
//!
//! Thin wrappers over the global logger that build the metadata object
//! inline.

/// Log at `debug` through the global logger
///
/// # Example
///
/// ```
/// # use shopchat_core::log_debug;
/// log_debug!("session lookup");
/// log_debug!("session lookup", "shopDomain": "demo.myshopify.com", "hit": true);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($msg:expr) => {
        $crate::logging_facility::debug($msg, &())
    };
    ($msg:expr, $($key:literal : $value:expr),+ $(,)?) => {
        $crate::logging_facility::debug(
            $msg,
            &$crate::__private::serde_json::json!({ $($key: $value),+ }),
        )
    };
}

/// Log at `info` through the global logger
///
/// # Example
///
/// ```
/// # use shopchat_core::log_info;
/// log_info!("webhook received", "topic": "app/uninstalled");
/// ```
#[macro_export]
macro_rules! log_info {
    ($msg:expr) => {
        $crate::logging_facility::info($msg, &())
    };
    ($msg:expr, $($key:literal : $value:expr),+ $(,)?) => {
        $crate::logging_facility::info(
            $msg,
            &$crate::__private::serde_json::json!({ $($key: $value),+ }),
        )
    };
}

/// Log at `warn` through the global logger
#[macro_export]
macro_rules! log_warn {
    ($msg:expr) => {
        $crate::logging_facility::warn($msg, &())
    };
    ($msg:expr, $($key:literal : $value:expr),+ $(,)?) => {
        $crate::logging_facility::warn(
            $msg,
            &$crate::__private::serde_json::json!({ $($key: $value),+ }),
        )
    };
}

/// Log at `error` through the global logger
///
/// # Example
///
/// ```
/// # use shopchat_core::log_error;
/// log_error!("token exchange failed", "errorMessage": "HTTP 401 access_token=abc");
/// ```
#[macro_export]
macro_rules! log_error {
    ($msg:expr) => {
        $crate::logging_facility::error($msg, &())
    };
    ($msg:expr, $($key:literal : $value:expr),+ $(,)?) => {
        $crate::logging_facility::error(
            $msg,
            &$crate::__private::serde_json::json!({ $($key: $value),+ }),
        )
    };
}
