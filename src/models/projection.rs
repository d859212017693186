use serde::{Deserialize, Serialize};

use super::PredictionResult;

/// Financial figures derived from a baseline and a prediction. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub baseline_total_sales: f64,
    pub predicted_daily_sales: f64,
    pub predicted_total_sales: f64,
    /// Negative when the predicted lift is negative
    pub incremental_sales: f64,
    /// Discount given away on predicted sales
    pub estimated_cost: f64,
    /// `incremental_sales / estimated_cost`, or 0 when the cost is not positive
    pub estimated_roi: f64,
    pub net_benefit: f64,
}

/// One discount level of a what-if sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhatIfRow {
    pub discount_percent: u32,
    pub prediction: PredictionResult,
    pub projection: Projection,
}
