use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::CategoricalField;

pub const MIN_DISCOUNT_PERCENT: u32 = 5;
pub const MAX_DISCOUNT_PERCENT: u32 = 50;
pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 30;

/// A promotion as submitted by a planner, before any encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PromotionRequest {
    #[validate(length(min = 1))]
    pub product_category: String,
    #[validate(length(min = 1))]
    pub promotion_type: String,
    #[validate(length(min = 1))]
    pub region: String,
    /// Discount offered, in whole percent (5-50)
    #[validate(range(min = 5, max = 50))]
    pub discount_percent: u32,
    /// Promotion length in days (1-30)
    #[validate(range(min = 1, max = 30))]
    pub duration_days: u32,
    pub start_date: NaiveDate,
    /// Whether the promotion overlaps a marketing campaign
    pub has_campaign: bool,
    pub num_overlapping_campaigns: u32,
}

impl PromotionRequest {
    /// Returns the raw string submitted for a categorical field.
    pub fn category(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::ProductCategory => &self.product_category,
            CategoricalField::PromotionType => &self.promotion_type,
            CategoricalField::Region => &self.region,
        }
    }
}
