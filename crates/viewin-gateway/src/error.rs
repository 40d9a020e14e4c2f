// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of workflow errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use viewin_core::ViewinError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A [`ViewinError`] leaving the gateway.
#[derive(Debug)]
pub struct ApiError(pub ViewinError);

impl From<ViewinError> for ApiError {
    fn from(e: ViewinError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ViewinError::Validation(_) => StatusCode::BAD_REQUEST,
            ViewinError::NotFound { .. } => StatusCode::NOT_FOUND,
            ViewinError::Auth(_) => StatusCode::UNAUTHORIZED,
            ViewinError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            ViewinError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ViewinError::Storage { .. } | ViewinError::Config(_) | ViewinError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server-side failures are logged in full and reported generically.
        let error = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
            self.0.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_status() {
        let cases = [
            (ViewinError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                ViewinError::job_report_not_found(3),
                StatusCode::NOT_FOUND,
            ),
            (ViewinError::Auth("x".into()), StatusCode::UNAUTHORIZED),
            (
                ViewinError::ExternalService {
                    message: "x".into(),
                    source: None,
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                ViewinError::Timeout {
                    duration: std::time::Duration::from_secs(5),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                ViewinError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError(error).status(), expected);
        }
    }

    #[test]
    fn internal_details_are_hidden() {
        let response = ApiError(ViewinError::Storage {
            source: "disk full at /var/lib/viewin".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
