//! Category handlers: a public listing plus admin create/update/delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use signgalaxy_core::CategoryDraft;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_CATEGORY_NAME_LEN: usize = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CategoryItem {
    id: i64,
    #[serde(flatten)]
    category: CategoryDraft,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<signgalaxy_db::CategoryRow> for CategoryItem {
    fn from(row: signgalaxy_db::CategoryRow) -> Self {
        Self {
            id: row.id,
            category: row.to_draft(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn validate_category(req_id: &str, draft: &mut CategoryDraft) -> Result<(), ApiError> {
    draft.tidy();
    if draft.name.is_empty() || draft.name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "name must be 1-100 characters",
        ));
    }
    Ok(())
}

fn map_write_error(req_id: &str, name: &str, error: &signgalaxy_db::DbError) -> ApiError {
    if error.is_unique_violation() {
        return ApiError::new(
            req_id,
            "conflict",
            format!("category '{name}' already exists"),
        );
    }
    map_db_error(req_id.to_owned(), error)
}

/// GET /api/v1/categories
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CategoryItem>>>, ApiError> {
    let rows = signgalaxy_db::list_categories(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CategoryItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/categories
pub(super) async fn create_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(mut body): Json<CategoryDraft>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryItem>>), ApiError> {
    validate_category(&req_id.0, &mut body)?;

    let row = signgalaxy_db::create_category(&state.pool, &body)
        .await
        .map_err(|e| map_write_error(&req_id.0, &body.name, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CategoryItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/categories/{id}
pub(super) async fn update_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(mut body): Json<CategoryDraft>,
) -> Result<Json<ApiResponse<CategoryItem>>, ApiError> {
    validate_category(&req_id.0, &mut body)?;

    let row = signgalaxy_db::update_category(&state.pool, id, &body)
        .await
        .map_err(|e| map_write_error(&req_id.0, &body.name, &e))?;

    Ok(Json(ApiResponse {
        data: CategoryItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/categories/{id}
pub(super) async fn delete_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    signgalaxy_db::delete_category(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
