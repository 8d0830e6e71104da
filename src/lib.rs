pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::app;
pub use state::AppState;
