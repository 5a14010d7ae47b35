//! Database operations for the `products` table.
//!
//! Variations are stored whole in a `JSONB` column; the catalog never queries
//! inside them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use signgalaxy_core::{ProductDraft, ProductStatus, Variation};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub code: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    pub pdf_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub mrp: Option<Decimal>,
    pub discount: Option<i16>,
    pub is_manual_discount: bool,
    pub stock: Option<i32>,
    /// One of `Active`, `Inactive`, `Draft` (enforced by a CHECK constraint).
    pub status: String,
    /// Average of approved review ratings, maintained by the review writes.
    pub rating: Decimal,
    pub reviews_count: i32,
    pub is_trending: bool,
    pub is_bestseller: bool,
    pub occasions: Vec<String>,
    pub variations: Json<Vec<Variation>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Rebuilds the editable document from the stored row.
    #[must_use]
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            code: self.code.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            gallery: self.gallery.clone(),
            pdf_price: self.pdf_price,
            final_price: self.final_price,
            mrp: self.mrp,
            discount: self.discount,
            is_manual_discount: self.is_manual_discount,
            stock: self.stock,
            status: self.status.parse::<ProductStatus>().unwrap_or_default(),
            is_trending: self.is_trending,
            is_bestseller: self.is_bestseller,
            occasions: self.occasions.clone(),
            variations: self.variations.0.clone(),
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, code, name, category, description, image, gallery, \
     pdf_price, final_price, mrp, discount, is_manual_discount, stock, status, \
     rating, reviews_count, is_trending, is_bestseller, occasions, variations, \
     created_at, updated_at";

/// Optional filters for [`list_products`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListFilters<'a> {
    pub status: Option<&'a str>,
    pub category: Option<&'a str>,
    pub limit: i64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Lists products, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    filters: ProductListFilters<'_>,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} \
         FROM products \
         WHERE ($1::text IS NULL OR status = $1) \
           AND ($2::text IS NULL OR category = $2) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $3"
    ))
    .bind(filters.status)
    .bind(filters.category)
    .bind(filters.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every product ordered by id. Used by bulk maintenance passes.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_products(pool: &PgPool) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single product by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts a product. Prices are stored exactly as given; callers normalize
/// them first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_product(pool: &PgPool, draft: &ProductDraft) -> Result<ProductRow, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "INSERT INTO products \
             (code, name, category, description, image, gallery, pdf_price, final_price, \
              mrp, discount, is_manual_discount, stock, status, is_trending, is_bestseller, \
              occasions, variations) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
                 $9, $10, $11, $12, $13, $14, $15, \
                 $16, $17) \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&draft.code)
    .bind(&draft.name)
    .bind(&draft.category)
    .bind(&draft.description)
    .bind(&draft.image)
    .bind(&draft.gallery)
    .bind(draft.pdf_price)
    .bind(draft.final_price)
    .bind(draft.mrp)
    .bind(draft.discount)
    .bind(draft.is_manual_discount)
    .bind(draft.stock)
    .bind(draft.status.as_str())
    .bind(draft.is_trending)
    .bind(draft.is_bestseller)
    .bind(&draft.occasions)
    .bind(Json(&draft.variations))
    .fetch_one(pool)
    .await?;

    tracing::info!(product_id = row.id, name = %row.name, "product created");
    Ok(row)
}

/// Replaces the editable fields of a product. `rating`, `reviews_count`, and
/// `created_at` are preserved.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no product has the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    draft: &ProductDraft,
) -> Result<ProductRow, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "UPDATE products SET \
             code               = $2, \
             name               = $3, \
             category           = $4, \
             description        = $5, \
             image              = $6, \
             gallery            = $7, \
             pdf_price          = $8, \
             final_price        = $9, \
             mrp                = $10, \
             discount           = $11, \
             is_manual_discount = $12, \
             stock              = $13, \
             status             = $14, \
             is_trending        = $15, \
             is_bestseller      = $16, \
             occasions          = $17, \
             variations         = $18, \
             updated_at         = NOW() \
         WHERE id = $1 \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&draft.code)
    .bind(&draft.name)
    .bind(&draft.category)
    .bind(&draft.description)
    .bind(&draft.image)
    .bind(&draft.gallery)
    .bind(draft.pdf_price)
    .bind(draft.final_price)
    .bind(draft.mrp)
    .bind(draft.discount)
    .bind(draft.is_manual_discount)
    .bind(draft.stock)
    .bind(draft.status.as_str())
    .bind(draft.is_trending)
    .bind(draft.is_bestseller)
    .bind(&draft.occasions)
    .bind(Json(&draft.variations))
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    tracing::info!(product_id = row.id, "product updated");
    Ok(row)
}

/// Deletes a product and, through the foreign key cascade, its reviews.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no product has the given id, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(())
}
