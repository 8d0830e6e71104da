use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the product store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("price {0} exceeds the storable range")]
    PriceOutOfRange(u64),

    #[error("{0}")]
    Backend(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT    NOT NULL DEFAULT '',
        code       TEXT    NOT NULL DEFAULT '',
        price      INTEGER NOT NULL DEFAULT 0 CHECK (price >= 0),
        created_at TEXT    NOT NULL,
        updated_at TEXT    NOT NULL,
        deleted_at TEXT
    )
"#;

const CREATE_DELETED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_deleted_at ON products (deleted_at)";

/// Opens SQLite pools and makes sure the products table exists.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect using the configured URL and bootstrap the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = if Self::is_in_memory(&config.url) {
            Self::pinned_pool_options().connect_with(options).await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .connect_with(options)
                .await?
        };

        Self::bootstrap(&pool).await?;
        info!("Connected product store at {}", config.url);
        Ok(pool)
    }

    /// Fresh private in-memory database, schema included.
    pub async fn connect_in_memory() -> Result<SqlitePool, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = Self::pinned_pool_options().connect_with(options).await?;
        Self::bootstrap(&pool).await?;
        Ok(pool)
    }

    /// Idempotent table creation, equivalent to an auto-migrate on startup.
    pub async fn bootstrap(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(CREATE_PRODUCTS_TABLE).execute(pool).await?;
        sqlx::query(CREATE_DELETED_AT_INDEX).execute(pool).await?;
        Ok(())
    }

    // Every SQLite in-memory connection is its own database, so the pool must
    // hold exactly one connection and never recycle it.
    fn pinned_pool_options() -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    }

    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}
