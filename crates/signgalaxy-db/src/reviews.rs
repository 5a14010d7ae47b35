//! Database operations for the `reviews` table and the rating aggregate it
//! feeds on `products`.

use chrono::{DateTime, Utc};
use signgalaxy_core::{summarize_ratings, RatingSummary, ReviewStatus};
use sqlx::{PgConnection, PgPool};

use crate::DbError;

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub product_id: i64,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub rating: i16,
    pub comment: Option<String>,
    pub images: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when a customer submits a review.
#[derive(Debug, Clone, Copy)]
pub struct NewReview<'a> {
    pub user_name: &'a str,
    pub user_avatar: Option<&'a str>,
    pub rating: i16,
    pub comment: Option<&'a str>,
    pub images: &'a [String],
}

const REVIEW_COLUMNS: &str =
    "id, product_id, user_name, user_avatar, rating, comment, images, status, created_at";

/// Inserts a `Pending` review. Pending reviews do not affect the product rating.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including a foreign-key
/// violation when the product does not exist.
pub async fn create_review(
    pool: &PgPool,
    product_id: i64,
    review: &NewReview<'_>,
) -> Result<ReviewRow, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "INSERT INTO reviews (product_id, user_name, user_avatar, rating, comment, images, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(product_id)
    .bind(review.user_name)
    .bind(review.user_avatar)
    .bind(review.rating)
    .bind(review.comment)
    .bind(review.images)
    .bind(ReviewStatus::Pending.as_str())
    .fetch_one(pool)
    .await?;

    tracing::info!(review_id = row.id, product_id, "review submitted");
    Ok(row)
}

/// Approved reviews for one product, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_approved_reviews(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE product_id = $1 AND status = $2 \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(product_id)
    .bind(ReviewStatus::Approved.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All reviews across products for moderation, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews(
    pool: &PgPool,
    status: Option<ReviewStatus>,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE ($1::text IS NULL OR status = $1) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2"
    ))
    .bind(status.map(ReviewStatus::as_str))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Moves a review to `status` and refreshes its product's rating aggregate in
/// the same transaction.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the review does not exist, or
/// [`DbError::Sqlx`] on query failure.
pub async fn set_review_status(
    pool: &PgPool,
    review_id: i64,
    status: ReviewStatus,
) -> Result<(ReviewRow, RatingSummary), DbError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "UPDATE reviews SET status = $2 WHERE id = $1 RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review_id)
    .bind(status.as_str())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(DbError::NotFound)?;

    let summary = recompute_product_rating(&mut tx, row.product_id).await?;
    tx.commit().await?;

    tracing::info!(
        review_id,
        product_id = row.product_id,
        status = %status,
        rating = %summary.average,
        reviews_count = summary.count,
        "review moderated"
    );
    Ok((row, summary))
}

/// Deletes a review and refreshes its product's rating aggregate.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the review does not exist, or
/// [`DbError::Sqlx`] on query failure.
pub async fn delete_review(pool: &PgPool, review_id: i64) -> Result<RatingSummary, DbError> {
    let mut tx = pool.begin().await?;

    let product_id: i64 =
        sqlx::query_scalar::<_, i64>("DELETE FROM reviews WHERE id = $1 RETURNING product_id")
            .bind(review_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

    let summary = recompute_product_rating(&mut tx, product_id).await?;
    tx.commit().await?;

    tracing::info!(review_id, product_id, "review deleted");
    Ok(summary)
}

/// Recomputes `products.rating` and `products.reviews_count` from the
/// product's approved reviews.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn recompute_product_rating(
    conn: &mut PgConnection,
    product_id: i64,
) -> Result<RatingSummary, DbError> {
    let ratings: Vec<i16> =
        sqlx::query_scalar::<_, i16>("SELECT rating FROM reviews WHERE product_id = $1 AND status = $2")
            .bind(product_id)
            .bind(ReviewStatus::Approved.as_str())
            .fetch_all(&mut *conn)
            .await?;

    let summary = summarize_ratings(&ratings);

    sqlx::query("UPDATE products SET rating = $2, reviews_count = $3 WHERE id = $1")
        .bind(product_id)
        .bind(summary.average)
        .bind(summary.count)
        .execute(&mut *conn)
        .await?;

    Ok(summary)
}
