use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use signgalaxy_core::{is_within_price_cap, normalize_price, PriceQuote, MAX_PRICE};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PricePreviewQuery {
    pub price: Option<String>,
}

/// GET /api/v1/pricing/preview?price=<raw>
///
/// A missing or blank `price` previews the degenerate all-zero quote, the
/// same thing the admin form shows before a price is typed.
pub(super) async fn preview_price(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PricePreviewQuery>,
) -> Result<Json<ApiResponse<PriceQuote>>, ApiError> {
    let raw = parse_raw_price(&req_id.0, query.price.as_deref())?;
    let quote = normalize_price(raw, &state.pricing);

    tracing::debug!(
        raw = ?raw,
        final_price = %quote.final_price,
        mrp = %quote.mrp,
        discount = quote.discount,
        "pricing preview"
    );

    Ok(Json(ApiResponse {
        data: quote,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn parse_raw_price(req_id: &str, raw: Option<&str>) -> Result<Option<Decimal>, ApiError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };
    let price = Decimal::from_str(value).map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("price must be a decimal number, got '{value}'"),
        )
    })?;
    if !is_within_price_cap(price) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("price must not exceed {MAX_PRICE}"),
        ));
    }
    Ok(Some(price))
}
