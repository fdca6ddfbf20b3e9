//! Sensitive data marker for automatic redaction
//!
//! The `Sensitive<T>` wrapper keeps configuration secrets (the app's API
//! secret, database credentials) out of `Debug` and `Display` output, so a
//! config struct can be logged or printed without leaking them.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::schema::REDACTED;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use shopchat_core_types::Sensitive;
///
/// let api_secret = Sensitive::new("shpss_0123456789");
/// assert_eq!(format!("{:?}", api_secret), "[REDACTED]");
/// assert_eq!(format!("{}", api_secret), "[REDACTED]");
///
/// // Access the actual value when needed
/// assert_eq!(api_secret.expose(), &"shpss_0123456789");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying sensitive value
    ///
    /// Use this only where the raw value is handed to the platform SDK or
    /// the database driver.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
