pub mod auth;
pub mod rate_limit;

pub use auth::{extract_bearer_token, jwt_auth_middleware};
pub use rate_limit::rate_limit_middleware;
