// handlers/public/mod.rs - endpoints reachable without a token
//
// None of these pass through the rate limiter or the bearer check.

pub mod health; // GET /, GET /health
pub mod login; // POST /login - issue a bearer token

pub use health::{health, root};
pub use login::login;
