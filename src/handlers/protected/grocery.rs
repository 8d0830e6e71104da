use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::database::{NewProduct, Product, ProductId};
use crate::error::ApiError;
use crate::state::AppState;

fn parse_id(raw: &str) -> Option<ProductId> {
    raw.parse::<ProductId>().ok()
}

/// GET /grocery/:id - a single live product
///
/// Any miss answers 400 "Record not found!", whether the id is unknown,
/// deleted, non-numeric, or the store failed.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return ApiError::record_not_found().into_response();
    };

    match state.store.find_by_id(id).await {
        Ok(Some(product)) => Json(product).into_response(),
        Ok(None) => ApiError::record_not_found().into_response(),
        Err(e) => {
            tracing::warn!("Lookup of product {} failed: {}", id, e);
            ApiError::record_not_found().into_response()
        }
    }
}

/// GET /grocery - every live product in id order
///
/// A store failure writes nothing and falls through to an empty default
/// response. Existing clients rely on this, so it stays until the owners
/// decide otherwise.
pub async fn list(State(state): State<AppState>) -> Response {
    match state.store.find_all().await {
        Ok(products) => Json(products).into_response(),
        Err(e) => {
            tracing::warn!("Listing products failed, response left empty: {}", e);
            ().into_response()
        }
    }
}

/// POST /grocery - create a product
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(product) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let created = state.store.create(product).await.map_err(|e| {
        tracing::error!("Creating product failed: {}", e);
        ApiError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /grocery/:id - soft delete
///
/// Unknown, already-deleted and non-numeric ids are no-ops answered with 204.
/// A store failure writes nothing, like `list`.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match state.store.soft_delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::warn!("Deleting product {} failed, response left empty: {}", id, e);
            ().into_response()
        }
    }
}
