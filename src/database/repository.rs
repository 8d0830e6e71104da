use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::StoreError;
use crate::database::models::{NewProduct, Product, ProductId};

/// Persistence contract the handlers depend on. Any relational or embedded
/// store can satisfy it.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// A live (not soft-deleted) product, or `None`.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// All live products in id order.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Persist a new product; the store assigns id and timestamps.
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Mark a product deleted. Unknown or already-deleted ids are a no-op.
    async fn soft_delete(&self, id: ProductId) -> Result<(), StoreError>;
}

const PRODUCT_COLUMNS: &str = "id, name, code, price, created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct SqlProductStore {
    pool: SqlitePool,
}

impl SqlProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for SqlProductStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = ? AND deleted_at IS NULL",
            PRODUCT_COLUMNS
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {} FROM products WHERE deleted_at IS NULL ORDER BY id",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let price = i64::try_from(product.price)
            .map_err(|_| StoreError::PriceOutOfRange(product.price))?;
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO products (name, code, price, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(&product.code)
            .bind(price)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created product {} ({})", created.id, created.code);
        Ok(created)
    }

    async fn soft_delete(&self, id: ProductId) -> Result<(), StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE products SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Soft delete of product {} matched no live row", id);
        }
        Ok(())
    }
}
