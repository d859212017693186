use metrics::counter;

use crate::errors::ServiceError;
use crate::models::{Baseline, PredictionResult, Projection, WhatIfRow};

/// Discount levels compared by the what-if sweep when none are configured.
pub const DEFAULT_WHAT_IF_DISCOUNTS: [u32; 5] = [10, 15, 20, 25, 30];

/// Converts a baseline and a prediction into sales, cost and ROI figures.
///
/// Pure. The promotion cost is the discount given away on predicted sales;
/// ROI is zero whenever that cost is not positive.
pub fn project(
    baseline: &Baseline,
    prediction: &PredictionResult,
    discount_percent: u32,
    duration_days: u32,
) -> Projection {
    let duration = f64::from(duration_days);
    let predicted_daily_sales = baseline.avg_daily_sales * (1.0 + prediction.predicted_lift_ratio);
    let predicted_total_sales = predicted_daily_sales * duration;
    let baseline_total_sales = baseline.avg_daily_sales * duration;
    let incremental_sales = predicted_total_sales - baseline_total_sales;

    let estimated_cost = predicted_total_sales * (f64::from(discount_percent) / 100.0);
    let estimated_roi = if estimated_cost > 0.0 {
        incremental_sales / estimated_cost
    } else {
        0.0
    };

    Projection {
        baseline_total_sales,
        predicted_daily_sales,
        predicted_total_sales,
        incremental_sales,
        estimated_cost,
        estimated_roi,
        net_benefit: incremental_sales - estimated_cost,
    }
}

/// Projects each discount level in `discounts`, calling `predict` afresh for
/// every level since the discount is itself a model input.
///
/// Rows come back in the order of `discounts`, one per level.
pub fn what_if_sweep<F>(
    baseline: &Baseline,
    duration_days: u32,
    discounts: &[u32],
    mut predict: F,
) -> Result<Vec<WhatIfRow>, ServiceError>
where
    F: FnMut(u32) -> Result<PredictionResult, ServiceError>,
{
    let rows = discounts
        .iter()
        .map(|&discount_percent| {
            let prediction = predict(discount_percent)?;
            Ok(WhatIfRow {
                discount_percent,
                prediction,
                projection: project(baseline, &prediction, discount_percent, duration_days),
            })
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    counter!("promo_planner.what_if.rows", rows.len() as u64);
    Ok(rows)
}
