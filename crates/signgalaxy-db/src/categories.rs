//! Database operations for the `categories` table.

use chrono::{DateTime, Utc};
use signgalaxy_core::CategoryDraft;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub sub_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryRow {
    #[must_use]
    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.clone(),
            image: self.image.clone(),
            sub_categories: self.sub_categories.clone(),
        }
    }
}

const CATEGORY_COLUMNS: &str = "id, name, image, sub_categories, created_at, updated_at";

/// Lists every category by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single category by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_category(pool: &PgPool, id: i64) -> Result<Option<CategoryRow>, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a category.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails; a duplicate name surfaces
/// as a unique violation (see [`DbError::is_unique_violation`]).
pub async fn create_category(pool: &PgPool, draft: &CategoryDraft) -> Result<CategoryRow, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "INSERT INTO categories (name, image, sub_categories) \
         VALUES ($1, $2, $3) \
         RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(&draft.name)
    .bind(&draft.image)
    .bind(&draft.sub_categories)
    .fetch_one(pool)
    .await?;

    tracing::info!(category_id = row.id, name = %row.name, "category created");
    Ok(row)
}

/// Replaces a category's name, image, and sub-categories.
///
/// Renaming does not touch products that still carry the old name.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no category has the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_category(
    pool: &PgPool,
    id: i64,
    draft: &CategoryDraft,
) -> Result<CategoryRow, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "UPDATE categories SET \
             name           = $2, \
             image          = $3, \
             sub_categories = $4, \
             updated_at     = NOW() \
         WHERE id = $1 \
         RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.image)
    .bind(&draft.sub_categories)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    tracing::info!(category_id = row.id, "category updated");
    Ok(row)
}

/// Deletes a category. Products keep their category text.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no category has the given id, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_category(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    tracing::info!(category_id = id, "category deleted");
    Ok(())
}
