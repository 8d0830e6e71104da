use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected::grocery, public};
use crate::middleware::{jwt_auth_middleware, rate_limit_middleware};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
        // Protected: bearer token, then throttle
        .merge(grocery_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn grocery_routes(state: AppState) -> Router<AppState> {
    // route_layer: unmatched paths 404 without spending a permit.
    // Layers wrap outward, so the bearer check runs first and a rejected
    // request never reaches the limiter.
    Router::new()
        .route("/grocery", get(grocery::list).post(grocery::create))
        .route("/grocery/:id", get(grocery::show).delete(grocery::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
