//! Core types shared across shopchat crates
//!
//! This crate provides foundational types used by the logging facility,
//! the redaction engine and the HTTP boundary:
//!
//! - **Correlation types**: RequestId, inbound header names, id derivation
//! - **Sensitive data**: Sensitive<T> marker for configuration secrets
//! - **Schema constants**: Record field keys and redaction markers

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{derive_request_id, RequestId};
pub use sensitive::Sensitive;
