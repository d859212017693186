//! Request-scoped data model for promotion ROI estimation.
//!
//! Every type here is created per submission and discarded after the
//! response; none of it is persisted by the estimator.

pub mod baseline;
pub mod prediction;
pub mod projection;
pub mod promotion_request;
pub mod recommendation;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub use baseline::{Baseline, BaselineMatch, BaselineRecord, BaselineTable};
pub use prediction::PredictionResult;
pub use projection::{Projection, WhatIfRow};
pub use promotion_request::PromotionRequest;
pub use recommendation::{SuccessOutlook, Verdict};

/// The categorical request fields that pass through a label encoder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoricalField {
    ProductCategory,
    PromotionType,
    Region,
}
