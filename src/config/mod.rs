use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing, default)]
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub interval_ms: u64,
    pub burst: u32,
}

impl SecurityConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

impl RateLimitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. `from_env` passes
    /// the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup);

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("GROCERY_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("GROCERY_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("GROCERY_LOG_FILTER") {
            self.server.log_filter = v;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        // Security overrides
        if let Some(v) = lookup("GROCERY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("GROCERY_TOKEN_TTL_SECS") {
            self.security.token_ttl_secs = v.parse().unwrap_or(self.security.token_ttl_secs);
        }

        // Rate limit overrides
        if let Some(v) = lookup("RATE_LIMIT_INTERVAL_MS") {
            self.rate_limit.interval_ms = v.parse().unwrap_or(self.rate_limit.interval_ms);
        }
        if let Some(v) = lookup("RATE_LIMIT_BURST") {
            self.rate_limit.burst = v.parse().unwrap_or(self.rate_limit.burst);
        }

        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("GROCERY_JWT_SECRET"));
        }
        if self.security.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "GROCERY_TOKEN_TTL_SECS",
                reason: "token lifetime must be positive".to_string(),
            });
        }
        if self.rate_limit.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_INTERVAL_MS",
                reason: "refill interval must be positive".to_string(),
            });
        }
        if self.rate_limit.burst == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_BURST",
                reason: "bucket capacity must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_filter: "grocery_api=debug,tower_http=debug".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://grocery.db".to_string(),
                max_connections: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: 5 * 60,
            },
            rate_limit: RateLimitConfig {
                interval_ms: 2_000,
                burst: 1,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_filter: "grocery_api=info,tower_http=info".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://grocery.db".to_string(),
                max_connections: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: 5 * 60,
            },
            rate_limit: RateLimitConfig {
                interval_ms: 2_000,
                burst: 1,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_filter: "grocery_api=info,tower_http=warn".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://grocery.db".to_string(),
                max_connections: 20,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: 5 * 60,
            },
            rate_limit: RateLimitConfig {
                interval_ms: 2_000,
                burst: 1,
            },
        }
    }
}

// Process-wide config, set once at startup by `init`
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

pub fn init(config: AppConfig) -> Result<&'static AppConfig, ConfigError> {
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    CONFIG.get().ok_or(ConfigError::Missing("config"))
}

/// Returns the process config, or `None` before `init` has run.
pub fn get() -> Option<&'static AppConfig> {
    CONFIG.get()
}
