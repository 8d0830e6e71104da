pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseManager, StoreError};
pub use models::{NewProduct, Product, ProductId};
pub use repository::{ProductStore, SqlProductStore};
