// handlers/public/login.rs - POST /login handler

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /login - hand out a signed token valid for the configured lifetime.
///
/// Takes no body and checks no credentials.
pub async fn login(State(state): State<AppState>) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.tokens.issue()?;
    tracing::debug!("Issued token valid for {:?}", state.tokens.ttl());
    Ok(Json(LoginResponse { token }))
}
