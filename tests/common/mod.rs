#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::json;

use promo_planner::ml::{LabelEncoder, LabelEncoders, FEATURE_COUNT, FEATURE_NAMES};
use promo_planner::models::{Baseline, BaselineRecord, BaselineTable, PromotionRequest};

pub const CATEGORIES: [&str; 3] = ["Electronics", "Grocery", "Toys"];
pub const PROMOTION_TYPES: [&str; 3] = ["BOGO", "Flash Sale", "Percentage Off"];
pub const REGIONS: [&str; 3] = ["East", "North", "West"];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn encoders() -> LabelEncoders {
    LabelEncoders {
        product_category: LabelEncoder::new(strings(&CATEGORIES)).unwrap(),
        promotion_type: LabelEncoder::new(strings(&PROMOTION_TYPES)).unwrap(),
        region: LabelEncoder::new(strings(&REGIONS)).unwrap(),
    }
}

pub fn baseline(avg_daily_sales: f64) -> Baseline {
    Baseline {
        avg_transaction_value: 50.0,
        avg_daily_sales,
        avg_daily_transactions: avg_daily_sales / 50.0,
    }
}

/// North/Electronics at 1000/day and West/Toys at 600/day.
pub fn baseline_table() -> BaselineTable {
    BaselineTable::new(vec![
        BaselineRecord {
            region: "North".into(),
            product_category: "Electronics".into(),
            baseline: baseline(1000.0),
        },
        BaselineRecord {
            region: "West".into(),
            product_category: "Toys".into(),
            baseline: baseline(600.0),
        },
    ])
}

pub fn request() -> PromotionRequest {
    PromotionRequest {
        product_category: "Electronics".into(),
        promotion_type: "Percentage Off".into(),
        region: "North".into(),
        discount_percent: 15,
        duration_days: 7,
        // a Wednesday in June: no holiday or weekend flags
        start_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        has_campaign: false,
        num_overlapping_campaigns: 0,
    }
}

/// Writes a full artifact set whose models ignore every feature, so the
/// classifier always returns sigmoid(`logit`) and the regressor `lift`.
pub fn write_constant_artifacts(dir: &Path, logit: f64, lift: f64) {
    let zeros = vec![0.0; FEATURE_COUNT];
    write_json(
        &dir.join("promo_classifier.json"),
        json!({
            "model_type": "logistic_regression",
            "version": "test",
            "intercept": logit,
            "coefficients": zeros,
            "feature_names": FEATURE_NAMES,
        }),
    );
    write_json(
        &dir.join("promo_regressor.json"),
        json!({
            "model_type": "linear_regression",
            "intercept": lift,
            "coefficients": zeros,
        }),
    );
    write_encoders(dir);
}

pub fn write_encoders(dir: &Path) {
    write_json(
        &dir.join("label_encoders.json"),
        json!({
            "PRODUCT_CATEGORY": CATEGORIES,
            "PROMOTION_TYPE": PROMOTION_TYPES,
            "REGION": REGIONS,
        }),
    );
}

pub fn write_json(path: &Path, value: serde_json::Value) {
    fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}
