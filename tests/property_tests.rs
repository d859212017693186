//! Property-based tests for the promotion estimator core.
//!
//! These tests use proptest to check invariants of encoding, projection and
//! classification across the full input domain.

mod common;

use chrono::NaiveDate;
use proptest::prelude::*;

use promo_planner::ml::{encode, FEATURE_COUNT};
use promo_planner::models::{Baseline, PredictionResult, PromotionRequest};
use promo_planner::services::{projection, recommendations};
use promo_planner::Verdict;

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn request_strategy() -> impl Strategy<Value = PromotionRequest> {
    (
        0usize..3,
        0usize..3,
        0usize..3,
        5u32..=50,
        1u32..=30,
        date_strategy(),
        any::<bool>(),
        0u32..5,
    )
        .prop_map(
            |(c, t, r, discount_percent, duration_days, start_date, has_campaign, campaigns)| {
                PromotionRequest {
                    product_category: common::CATEGORIES[c].to_string(),
                    promotion_type: common::PROMOTION_TYPES[t].to_string(),
                    region: common::REGIONS[r].to_string(),
                    discount_percent,
                    duration_days,
                    start_date,
                    has_campaign,
                    num_overlapping_campaigns: campaigns,
                }
            },
        )
}

fn baseline_strategy() -> impl Strategy<Value = Baseline> {
    (1.0f64..500.0, 0.0f64..50_000.0, 0.0f64..2_000.0).prop_map(|(tx, sales, count)| Baseline {
        avg_transaction_value: tx,
        avg_daily_sales: sales,
        avg_daily_transactions: count,
    })
}

fn prediction_strategy() -> impl Strategy<Value = PredictionResult> {
    (0.0f64..=1.0, -2.0f64..3.0).prop_map(|(p, lift)| PredictionResult {
        success_probability: p,
        predicted_lift_ratio: lift,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn encoding_is_deterministic(request in request_strategy(), baseline in baseline_strategy()) {
        let encoders = common::encoders();
        let first = encode(&request, &baseline, &encoders).unwrap();
        let second = encode(&request, &baseline, &encoders).unwrap();

        prop_assert_eq!(first.values().len(), FEATURE_COUNT);
        for (a, b) in first.values().iter().zip(second.values()) {
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
        prop_assert_eq!(first.discount_percent(), f64::from(request.discount_percent));
    }

    #[test]
    fn calendar_flags_are_binary(request in request_strategy()) {
        let vector = encode(&request, &common::baseline(1000.0), &common::encoders()).unwrap();
        let values = vector.values();
        prop_assert!((1.0..=12.0).contains(&values[10]));
        prop_assert!((1.0..=4.0).contains(&values[11]));
        prop_assert!((0.0..=6.0).contains(&values[12]));
        prop_assert!(values[13] == 0.0 || values[13] == 1.0);
        prop_assert!(values[14] == 0.0 || values[14] == 1.0);
    }

    #[test]
    fn classify_is_total(p in 0.0f64..=1.0, roi in -100.0f64..100.0) {
        let verdict = recommendations::classify(p, roi);
        match verdict {
            Verdict::Go => prop_assert!(p >= 0.7 && roi >= 2.0),
            Verdict::Optimize => prop_assert!(!(p >= 0.7 && roi >= 2.0) && (p >= 0.5 || roi >= 1.5)),
            Verdict::NoGo => prop_assert!(p < 0.5 && roi < 1.5),
        }
    }

    #[test]
    fn projection_roi_is_always_finite(
        baseline in baseline_strategy(),
        prediction in prediction_strategy(),
        discount in 5u32..=50,
        duration in 1u32..=30,
    ) {
        let projection = projection::project(&baseline, &prediction, discount, duration);
        prop_assert!(projection.estimated_roi.is_finite());
        if projection.estimated_cost <= 0.0 {
            prop_assert_eq!(projection.estimated_roi, 0.0);
        }
        let net = projection.incremental_sales - projection.estimated_cost;
        prop_assert!((projection.net_benefit - net).abs() < 1e-6);
    }

    #[test]
    fn sweep_has_one_row_per_level_in_order(
        discounts in proptest::collection::vec(1u32..=100, 0..10),
        baseline in baseline_strategy(),
        prediction in prediction_strategy(),
    ) {
        let rows = projection::what_if_sweep(&baseline, 7, &discounts, |_| Ok(prediction)).unwrap();
        let seen: Vec<u32> = rows.iter().map(|row| row.discount_percent).collect();
        prop_assert_eq!(seen, discounts);
    }
}
