// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP rendering of API errors.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use safelink_api::ApiError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Machine-readable part of an error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    pub error: ErrorDetail,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Stable error code for clients.
    pub code: &'static str,
    /// The error message.
    pub message: String,
}

impl HttpError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTH",
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, code): (StatusCode, &'static str) = match &err {
            ApiError::InvalidCoordinates { .. } => (StatusCode::BAD_REQUEST, "BAD_COORDS"),
            ApiError::InvalidStatus { .. } => (StatusCode::BAD_REQUEST, "BAD_STATUS"),
            ApiError::OfficerNotFound { .. } => (StatusCode::BAD_REQUEST, "BAD_OFFICER"),
            ApiError::NoFiles => (StatusCode::BAD_REQUEST, "NO_FILE"),
            ApiError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::AuthenticationFailed { .. } => (StatusCode::UNAUTHORIZED, "UNAUTH"),
            ApiError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::DuplicateIdentifier { .. } => (StatusCode::CONFLICT, "DUPLICATE_ID"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
            ApiError::Transient { .. } => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
            ApiError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };
        if status.is_server_error() {
            error!(error = %err, code, "Request failed");
        }
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection, "Rejected request body");
        Self::validation(rejection.body_text())
    }
}
