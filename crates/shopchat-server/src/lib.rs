//! Shopchat server
//!
//! HTTP boundary of the embedded app: request correlation middleware,
//! outbound id propagation, the app shell route, and the upstream health check.

pub mod commands;
pub mod error;
pub mod outbound;
pub mod render;
pub mod request_id;
pub mod routes;

pub use error::AppError;
pub use outbound::{
    install_outbound_propagation, CorrelatedClient, CorrelatedRequestBuilder, PropagationHandle,
};
pub use request_id::{request_id_from_headers, request_id_middleware};
pub use routes::{create_router, AppState};
