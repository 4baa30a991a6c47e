//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::github::UserNotFound;
use crate::grid::GridError;

// Errors

pub struct ApiError(anyhow::Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        if let Some(GridError::InvalidInput(_)) = self.0.downcast_ref::<GridError>() {
            StatusCode::BAD_REQUEST
        } else if self.0.downcast_ref::<UserNotFound>().is_some() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Always log the error
        if status.is_server_error() {
            tracing::error!("{:#}", self.0);
        } else {
            tracing::warn!("{:#}", self.0);
        }

        let error = match status {
            StatusCode::BAD_REQUEST => "Invalid request",
            StatusCode::NOT_FOUND => "User not found",
            _ => "Failed to fetch contributions",
        };

        (
            status,
            Json(json!({
                "error": error,
                "details": format!("{:#}", self.0),
            })),
        )
            .into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod contributions {
    pub use crate::api::routes::contributions::public::*;
}
