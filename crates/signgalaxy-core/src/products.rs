use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Storefront visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Draft,
}

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "Active",
            ProductStatus::Inactive => "Inactive",
            ProductStatus::Draft => "Draft",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ProductStatus::Active),
            "Inactive" => Ok(ProductStatus::Inactive),
            "Draft" => Ok(ProductStatus::Draft),
            other => Err(CoreError::InvalidProductStatus(other.to_string())),
        }
    }
}

/// A selectable product dimension, e.g. "Size" or "Frame".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub disable_auto_select: bool,
    #[serde(default)]
    pub options: Vec<VariationOption>,
}

/// One choice within a [`Variation`], priced independently of its product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mirrors `mrp` once normalized. Older clients still read it.
    #[serde(default)]
    pub price_adjustment: Option<Decimal>,
    #[serde(default)]
    pub mrp: Option<Decimal>,
    #[serde(default)]
    pub final_price: Option<Decimal>,
    #[serde(default)]
    pub discount: Option<i16>,
    #[serde(default)]
    pub is_manual_discount: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// The admin-editable part of a product, as sent on create and update.
///
/// Server-owned fields (id, rating, review count, timestamps) live on the
/// persisted row instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    /// Legacy base price from the printed catalog.
    #[serde(default)]
    pub pdf_price: Option<Decimal>,
    #[serde(default)]
    pub final_price: Option<Decimal>,
    #[serde(default)]
    pub mrp: Option<Decimal>,
    #[serde(default)]
    pub discount: Option<i16>,
    #[serde(default)]
    pub is_manual_discount: bool,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub is_trending: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub variations: Vec<Variation>,
}

impl ProductDraft {
    /// Raw price fed to the normalizer: `final_price`, else `pdf_price`.
    #[must_use]
    pub fn pricing_input(&self) -> Option<Decimal> {
        self.final_price.or(self.pdf_price)
    }

    /// Iterates every option across all variations.
    pub fn options(&self) -> impl Iterator<Item = &VariationOption> {
        self.variations.iter().flat_map(|v| v.options.iter())
    }
}
