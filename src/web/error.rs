//! API error handling for the anonboard web API.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::PasswordError;
use crate::BoardError;

/// Message returned when the store cannot be reached.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service Unavailable";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400): validation failures and password mismatches.
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Too many requests (429).
    TooManyRequests,
    /// Internal server error (500).
    InternalError,
    /// Service unavailable (503): the store failed.
    ServiceUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a too many requests error.
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TooManyRequests, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a service unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Map a failed store operation to a response.
    ///
    /// Connection failures always read "Service Unavailable"; other store
    /// errors carry the operation-specific `message`. Both are 503.
    pub fn store(err: &BoardError, message: impl Into<String>) -> Self {
        match err {
            BoardError::DatabaseConnection(_) => {
                Self::service_unavailable(SERVICE_UNAVAILABLE_MESSAGE)
            }
            BoardError::Database(_) => Self::service_unavailable(message),
            _ => Self::internal("An internal error occurred"),
        }
    }

    /// Create a bad request error from validator::ValidationErrors.
    ///
    /// Field messages are joined into a single sentence, sorted by field.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by_key(|(field, _)| field.to_string());

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match (&e.message, e.params.get("max")) {
                    (Some(message), _) => message.to_string(),
                    (None, Some(max)) if e.code == "length" => {
                        format!("{} must be at most {} characters.", field, max)
                    }
                    _ => format!("Invalid value for {}", field),
                })
            })
            .collect();

        if messages.is_empty() {
            Self::bad_request("Validation failed")
        } else {
            Self::bad_request(messages.join(" "))
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match &err {
            BoardError::Validation(msg) | BoardError::Auth(msg) => {
                ApiError::bad_request(msg.clone())
            }
            BoardError::Password(e @ (PasswordError::Empty | PasswordError::TooLong)) => {
                ApiError::bad_request(e.to_string())
            }
            BoardError::Database(_) | BoardError::DatabaseConnection(_) => {
                tracing::error!("Store error: {}", err);
                ApiError::service_unavailable(SERVICE_UNAVAILABLE_MESSAGE)
            }
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            tracing::error!("Path extraction failed: {}", rejection.body_text());
            return ApiError::internal("An internal error occurred");
        }
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
