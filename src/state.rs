use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::ProductStore;
use crate::limiter::{LimiterError, RateLimiter};

/// Shared application state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub limiter: Arc<RateLimiter>,
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(tokens: TokenService, limiter: RateLimiter, store: Arc<dyn ProductStore>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            limiter: Arc::new(limiter),
            store,
        }
    }

    pub fn from_config(config: &AppConfig, store: Arc<dyn ProductStore>) -> Result<Self, LimiterError> {
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.token_ttl());
        let limiter = RateLimiter::new(config.rate_limit.interval(), config.rate_limit.burst)?;
        Ok(Self::new(tokens, limiter, store))
    }
}
