use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer authentication gate for protected routes.
///
/// Any failure aborts with a bare 401. A valid token lets the request through
/// untouched; no identity is attached since tokens carry none.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let token = extract_bearer_token(&headers);

    if let Err(e) = state.tokens.validate(token) {
        tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        return ApiError::unauthorized().into_response();
    }

    next.run(request).await
}

/// Strips a case-sensitive `Bearer ` prefix. Without the prefix the raw
/// header value is returned as-is; a missing or non-UTF-8 header is empty.
pub fn extract_bearer_token(headers: &HeaderMap) -> &str {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    value.strip_prefix("Bearer ").unwrap_or(value)
}
