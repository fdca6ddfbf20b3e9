//! Inbound correlation boundary
//!
//! Resolves the request id from `X-Request-Id` (or its `X-Correlation-Id`
//! alias), runs the rest of the stack inside that id's scope and echoes the
//! id back on the response.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use shopchat_core::with_request_id;
use shopchat_core_types::correlation::{CORRELATION_ID_HEADER, REQUEST_ID_HEADER};
use shopchat_core_types::{derive_request_id, RequestId};

/// Resolve the id for an inbound request. Invalid or absent ids yield a fresh one.
pub fn request_id_from_headers(headers: &HeaderMap) -> RequestId {
    let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    derive_request_id(read(REQUEST_ID_HEADER), read(CORRELATION_ID_HEADER))
}

/// Middleware establishing the correlation scope for one request
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let id = request_id_from_headers(request.headers());
    let mut response = with_request_id(id.clone(), next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
