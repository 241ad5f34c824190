//! # Category Repository
//!
//! CRUD for product categories. Deleting a category leaves its products in
//! place with `category_id` cleared (`ON DELETE SET NULL`).

use kasir_core::validation::validate_category_input;
use kasir_core::{Category, CategoryInput};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories by id.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - a category with this name exists
    pub async fn insert(&self, input: &CategoryInput) -> DbResult<Category> {
        validate_category_input(input)?;
        debug!(name = %input.name, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES (?1, ?2) \
             RETURNING id, name, description",
        )
        .bind(input.name.trim())
        .bind(input.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Replaces name and description of an existing category.
    pub async fn update(&self, id: i64, input: &CategoryInput) -> DbResult<Category> {
        validate_category_input(input)?;
        debug!(id = %id, "Updating category");

        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1 \
             RETURNING id, name, description",
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.description.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        category.ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}
