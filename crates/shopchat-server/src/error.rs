use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use shopchat_core::ShopchatError;

use crate::render::fallback_response;

/// Handler error mapped onto an HTTP response
#[derive(Debug)]
pub struct AppError(pub ShopchatError);

impl From<ShopchatError> for AppError {
    fn from(err: ShopchatError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            ShopchatError::Redirect { status, location } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::FOUND);
                (status, [(header::LOCATION, location)]).into_response()
            }
            ShopchatError::Timeout { .. } => fallback_response(),
            other => {
                tracing::debug!(code = other.code(), "handler failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
