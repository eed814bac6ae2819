//! Error responses of the diagnostics surface

use crate::scanner::ScanError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                code: code.to_string(),
            },
        }
    }

    /// 400
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("invalid_request", message)
    }

    /// 404
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    /// 409, a run of the same kind is in flight
    pub fn busy(message: impl Into<String>) -> Self {
        Self::new("busy", message)
    }

    fn status_code(&self) -> StatusCode {
        match self.error.code.as_str() {
            "invalid_request" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            "busy" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ScanError> for ErrorResponse {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::AlreadyRunning(_) => Self::busy(e.to_string()),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
