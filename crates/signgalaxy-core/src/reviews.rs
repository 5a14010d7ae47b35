use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::CoreError;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Moderation state of a customer review. Only approved reviews count
/// toward a product's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ReviewStatus::Pending),
            "Approved" => Ok(ReviewStatus::Approved),
            "Rejected" => Ok(ReviewStatus::Rejected),
            other => Err(CoreError::InvalidReviewStatus(other.to_string())),
        }
    }
}

/// Aggregate shown on the product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingSummary {
    /// Mean rating rounded to two decimal places; zero when there are no reviews.
    pub average: Decimal,
    pub count: i32,
}

#[must_use]
pub fn is_valid_rating(rating: i16) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Summarizes approved review ratings.
#[must_use]
pub fn summarize_ratings(ratings: &[i16]) -> RatingSummary {
    let count = i32::try_from(ratings.len()).unwrap_or(i32::MAX);
    if count == 0 {
        return RatingSummary {
            average: Decimal::ZERO,
            count: 0,
        };
    }

    let total: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let average = (Decimal::from(total) / Decimal::from(count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    RatingSummary { average, count }
}
