//! # Product Repository
//!
//! Database operations for the inventory store.
//!
//! ## Key Operations
//! - Listing and name search
//! - CRUD operations
//!
//! ## Who Changes Stock?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProductRepository::update   ← back office sets an absolute level      │
//! │                                 (restock, stock take)                   │
//! │                                                                         │
//! │  CheckoutEngine              ← sales take stock with a delta,          │
//! │                                 stock = stock - qty, under the         │
//! │                                 write lock                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_core::validation::validate_product_input;
use kasir_core::{Product, ProductInput};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = "id, name, price, stock, category_id";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let all = repo.list().await?;
/// let product = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products by id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Case-insensitive substring search on the product name.
    ///
    /// An empty query behaves like [`list`](Self::list), capped at `limit`.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();
        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 ESCAPE '\\' \
             ORDER BY name LIMIT ?2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(DbError::Domain)` - Input failed validation
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown category
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        validate_product_input(input)?;
        debug!(name = %input.name, "Inserting product");

        let sql = format!(
            "INSERT INTO products (name, price, stock, category_id) \
             VALUES (?1, ?2, ?3, ?4) RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(input.name.trim())
            .bind(input.price.amount())
            .bind(input.stock)
            .bind(input.category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    /// Replaces every field of an existing product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product as now stored
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        validate_product_input(input)?;
        debug!(id = %id, "Updating product");

        let sql = format!(
            "UPDATE products SET name = ?2, price = ?3, stock = ?4, category_id = ?5 \
             WHERE id = ?1 RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(input.name.trim())
            .bind(input.price.amount())
            .bind(input.stock)
            .bind(input.category_id)
            .fetch_optional(&self.pool)
            .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Product doesn't exist
    /// * `DbError::ForeignKeyViolation` - Product has been sold; the ledger
    ///   keeps a reference to it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes `%`, `_` and the escape character for a LIKE pattern.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
