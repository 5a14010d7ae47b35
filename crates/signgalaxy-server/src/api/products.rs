//! Catalog handlers: public reads plus the admin create/update/delete writes.
//!
//! Every write runs the premium pricing pass before touching the database, so
//! stored prices are always either normalized or explicitly manual.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use signgalaxy_core::{
    apply_premium_pricing, is_within_price_cap, ProductDraft, ProductStatus, VariationOption,
    MAX_PRICE,
};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_NAME_LEN: usize = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductItem {
    id: i64,
    #[serde(flatten)]
    product: ProductDraft,
    rating: Decimal,
    reviews_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<signgalaxy_db::ProductRow> for ProductItem {
    fn from(row: signgalaxy_db::ProductRow) -> Self {
        Self {
            id: row.id,
            product: row.to_draft(),
            rating: row.rating,
            reviews_count: row.reviews_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_draft(req_id: &str, draft: &mut ProductDraft) -> Result<(), ApiError> {
    let name = draft.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "name must be 1-200 characters",
        ));
    }
    draft.name = name.to_owned();

    if draft.stock.is_some_and(|stock| stock < 0) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "stock must not be negative",
        ));
    }

    for (field, price) in [
        ("pdfPrice", draft.pdf_price),
        ("finalPrice", draft.final_price),
        ("mrp", draft.mrp),
    ] {
        validate_price_cap(req_id, field, price)?;
    }

    if draft.is_manual_discount {
        validate_manual_discount(req_id, "discount", draft.discount)?;
    }

    for option in draft.options() {
        for (field, price) in [
            ("finalPrice", option.final_price),
            ("mrp", option.mrp),
            ("priceAdjustment", option.price_adjustment),
        ] {
            validate_price_cap(req_id, &format!("option '{}' {field}", option.id), price)?;
        }
        if option.is_manual_discount {
            validate_option_discount(req_id, option)?;
        }
    }

    Ok(())
}

fn validate_price_cap(req_id: &str, field: &str, price: Option<Decimal>) -> Result<(), ApiError> {
    match price {
        Some(value) if !is_within_price_cap(value) => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} must not exceed {MAX_PRICE}, got {value}"),
        )),
        _ => Ok(()),
    }
}

fn validate_option_discount(req_id: &str, option: &VariationOption) -> Result<(), ApiError> {
    validate_manual_discount(
        req_id,
        &format!("option '{}' discount", option.id),
        option.discount,
    )
}

fn validate_manual_discount(
    req_id: &str,
    field: &str,
    discount: Option<i16>,
) -> Result<(), ApiError> {
    match discount {
        Some(value) if !(0..=100).contains(&value) => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} must be between 0 and 100, got {value}"),
        )),
        _ => Ok(()),
    }
}

fn parse_status_filter(req_id: &str, raw: Option<&str>) -> Result<Option<ProductStatus>, ApiError> {
    raw.map(|value| {
        value.parse::<ProductStatus>().map_err(|_| {
            ApiError::new(
                req_id,
                "validation_error",
                format!("status must be Active, Inactive, or Draft, got '{value}'"),
            )
        })
    })
    .transpose()
}

/// Validates the body and runs the pricing pass, logging what changed.
fn prepare_draft(
    req_id: &str,
    state: &AppState,
    mut draft: ProductDraft,
) -> Result<ProductDraft, ApiError> {
    validate_draft(req_id, &mut draft)?;

    let outcome = apply_premium_pricing(&mut draft, &state.pricing);
    match outcome.product {
        Some(quote) => tracing::debug!(
            name = %draft.name,
            final_price = %quote.final_price,
            mrp = %quote.mrp,
            discount = quote.discount,
            options_normalized = outcome.options_normalized,
            options_skipped = outcome.options_skipped,
            "premium pricing applied"
        ),
        None => tracing::debug!(
            name = %draft.name,
            options_normalized = outcome.options_normalized,
            options_skipped = outcome.options_skipped,
            "manual product pricing kept"
        ),
    }

    Ok(draft)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/products
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let status = parse_status_filter(&req_id.0, query.status.as_deref())?;

    let rows = signgalaxy_db::list_products(
        &state.pool,
        signgalaxy_db::ProductListFilters {
            status: status.map(ProductStatus::as_str),
            category: query.category.as_deref(),
            limit: normalize_limit(query.limit),
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ProductItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/products/{id}
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let row = signgalaxy_db::get_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(&req_id.0, "not_found", format!("product {id} not found")))?;

    Ok(Json(ApiResponse {
        data: ProductItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/products
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ApiResponse<ProductItem>>), ApiError> {
    let draft = prepare_draft(&req_id.0, &state, body)?;

    let row = signgalaxy_db::create_product(&state.pool, &draft)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ProductItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/products/{id}: full replacement of the editable fields.
pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<ProductDraft>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let draft = prepare_draft(&req_id.0, &state, body)?;

    let row = signgalaxy_db::update_product(&state.pool, id, &draft)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ProductItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/products/{id}
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    signgalaxy_db::delete_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
