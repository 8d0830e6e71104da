use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Global throttle behind the bearer check. Only authenticated requests spend
/// a permit; a denied one gets a 429 and never reaches the store.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.limiter.allow() {
        tracing::warn!(
            "Throttled {} {} (one permit per {:?}, burst {})",
            request.method(),
            request.uri().path(),
            state.limiter.interval(),
            state.limiter.burst()
        );
        return ApiError::too_many_requests().into_response();
    }

    next.run(request).await
}
