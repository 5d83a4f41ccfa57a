//! Error-to-HTTP response conversion.
//!
//! Wraps [`media_explorer_common::Error`] so route handlers can return
//! `Result<T, AppError>` and use `?` on core operations.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use media_explorer_common::Error;
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Boundary denials are already logged by the resolver.
        match &self.0 {
            Error::Unexpected { .. } => {
                tracing::error!(status = %status, error = %self.0, "Server error in API handler");
            }
            _ => tracing::debug!(status = %status, error = %self.0, "Request failed"),
        }

        let body = axum::Json(json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        }));

        if let Error::RangeNotSatisfiable { size } = self.0 {
            return (
                status,
                [
                    (header::CONTENT_RANGE, format!("bytes */{size}")),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}
