pub mod app_config;
pub mod categories;
pub mod config;
pub mod pricing;
pub mod products;
pub mod reviews;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use categories::CategoryDraft;
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{
    apply_premium_pricing, is_within_price_cap, minimum_mrp, normalize_price, PriceQuote,
    PricingOutcome, PricingPolicy, MAX_PRICE,
};
pub use products::{ProductDraft, ProductStatus, Variation, VariationOption};
pub use reviews::{summarize_ratings, RatingSummary, ReviewStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid product status: {0}")]
    InvalidProductStatus(String),
    #[error("invalid review status: {0}")]
    InvalidReviewStatus(String),
}
