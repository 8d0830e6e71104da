// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Message returned when the shared throttle rejects a request.
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "too many request";

/// Message returned for any failed lookup by id.
pub const RECORD_NOT_FOUND_MESSAGE: &str = "Record not found!";

/// HTTP API error with the status code and client-facing message
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized, sent without a body
    Unauthorized,

    // 429 Too Many Requests
    TooManyRequests(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error message, also used by `Display`
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            // Display only; a 401 is sent without a body
            ApiError::Unauthorized => "unauthorized",
            ApiError::TooManyRequests(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// JSON body, if this error carries one
    pub fn to_json(&self) -> Option<Value> {
        match self {
            ApiError::Unauthorized => None,
            _ => Some(json!({ "error": self.message() })),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn record_not_found() -> Self {
        ApiError::BadRequest(RECORD_NOT_FOUND_MESSAGE.to_string())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized
    }

    pub fn too_many_requests() -> Self {
        ApiError::TooManyRequests(TOO_MANY_REQUESTS_MESSAGE.to_string())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        match err {
            crate::auth::TokenError::Invalid => ApiError::unauthorized(),
            crate::auth::TokenError::Signing(e) => ApiError::internal_server_error(e.to_string()),
        }
    }
}

impl From<crate::database::StoreError> for ApiError {
    fn from(err: crate::database::StoreError) -> Self {
        ApiError::internal_server_error(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self.to_json() {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}
