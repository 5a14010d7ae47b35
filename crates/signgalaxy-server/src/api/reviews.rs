use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signgalaxy_core::{reviews::is_valid_rating, RatingSummary, ReviewStatus};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReviewItem {
    id: i64,
    product_id: i64,
    user_name: String,
    user_avatar: Option<String>,
    rating: i16,
    comment: Option<String>,
    images: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<signgalaxy_db::ReviewRow> for ReviewItem {
    fn from(row: signgalaxy_db::ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            user_name: row.user_name,
            user_avatar: row.user_avatar,
            rating: row.rating,
            comment: row.comment,
            images: row.images,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateReviewRequest {
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub rating: i16,
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReviewQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateReviewStatusRequest {
    pub status: ReviewStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModeratedReview {
    review: ReviewItem,
    product_rating: RatingSummary,
}

fn validate_review(req_id: &str, body: &CreateReviewRequest) -> Result<(), ApiError> {
    if body.user_name.trim().is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "userName must not be empty",
        ));
    }
    if !is_valid_rating(body.rating) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("rating must be between 1 and 5, got {}", body.rating),
        ));
    }
    Ok(())
}

/// GET /api/v1/products/{id}/reviews: approved reviews only.
pub(super) async fn list_product_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ReviewItem>>>, ApiError> {
    let rows = signgalaxy_db::list_approved_reviews(&state.pool, product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReviewItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/products/{id}/reviews: queued as `Pending` for moderation.
pub(super) async fn create_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewItem>>), ApiError> {
    let rid = &req_id.0;
    validate_review(rid, &body)?;

    let review = signgalaxy_db::NewReview {
        user_name: body.user_name.trim(),
        user_avatar: body.user_avatar.as_deref(),
        rating: body.rating,
        comment: body.comment.as_deref(),
        images: &body.images,
    };

    let row = signgalaxy_db::create_review(&state.pool, product_id, &review)
        .await
        .map_err(|e| {
            if e.is_foreign_key_violation() {
                ApiError::new(rid, "not_found", format!("product {product_id} not found"))
            } else {
                map_db_error(rid.clone(), &e)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ReviewItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/admin/reviews
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewItem>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|value| {
            value.parse::<ReviewStatus>().map_err(|_| {
                ApiError::new(
                    &req_id.0,
                    "validation_error",
                    format!("status must be Pending, Approved, or Rejected, got '{value}'"),
                )
            })
        })
        .transpose()?;

    let rows = signgalaxy_db::list_reviews(&state.pool, status, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReviewItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/admin/reviews/{id}: moderate and refresh the product rating.
pub(super) async fn update_review_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(review_id): Path<i64>,
    Json(body): Json<UpdateReviewStatusRequest>,
) -> Result<Json<ApiResponse<ModeratedReview>>, ApiError> {
    let (row, summary) = signgalaxy_db::set_review_status(&state.pool, review_id, body.status)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ModeratedReview {
            review: ReviewItem::from(row),
            product_rating: summary,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/reviews/{id}
pub(super) async fn delete_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(review_id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let summary = signgalaxy_db::delete_review(&state.pool, review_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true, "productRating": summary }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
