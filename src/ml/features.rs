/*!
 * # Feature Encoder
 *
 * Turns a promotion request and its baseline into the fixed-order numeric
 * vector the trained predictors consume. The order of `FEATURE_NAMES` is the
 * order the models were fitted on; reordering it silently corrupts every
 * prediction.
 */

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::ServiceError;
use crate::models::{Baseline, CategoricalField, PromotionRequest};

pub const FEATURE_COUNT: usize = 15;

/// Training order of the feature columns.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "product_category_encoded",
    "discount_percent",
    "promotion_type_encoded",
    "region_encoded",
    "duration_days",
    "baseline_avg_transaction",
    "baseline_daily_transactions",
    "baseline_daily_sales",
    "has_campaign",
    "num_overlapping_campaigns",
    "start_month",
    "start_quarter",
    "start_day_of_week",
    "is_holiday_season",
    "starts_on_weekend",
];

/// Position of the discount column, overwritten by the what-if sweep.
pub const DISCOUNT_INDEX: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn discount_percent(&self) -> f64 {
        self.0[DISCOUNT_INDEX]
    }

    /// Copy of this vector with only the discount column replaced.
    pub fn with_discount(&self, discount_percent: u32) -> Self {
        let mut values = self.0;
        values[DISCOUNT_INDEX] = f64::from(discount_percent);
        Self(values)
    }

    /// Pairs each value with its column name, in training order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

/// Calendar features derived from the promotion start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFeatures {
    pub month: u32,
    pub quarter: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    /// November or December
    pub is_holiday_season: bool,
    /// Starts on Saturday or Sunday
    pub starts_on_weekend: bool,
}

impl CalendarFeatures {
    pub fn from_date(date: NaiveDate) -> Self {
        let month = date.month();
        let day_of_week = date.weekday().num_days_from_monday();
        Self {
            month,
            quarter: (month - 1) / 3 + 1,
            day_of_week,
            is_holiday_season: matches!(month, 11 | 12),
            starts_on_weekend: matches!(day_of_week, 5 | 6),
        }
    }
}

/// Maps category strings to the integer codes a model was trained with.
/// The code of a class is its position in the class list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ServiceError> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code).is_some() {
                return Err(ServiceError::ModelUnavailable(format!(
                    "label encoder lists class '{}' more than once",
                    class
                )));
            }
        }
        Ok(Self { classes, codes })
    }

    pub fn transform(&self, value: &str) -> Option<usize> {
        self.codes.get(value).copied()
    }

    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// The three encoders shipped with the trained models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEncoders {
    pub product_category: LabelEncoder,
    pub promotion_type: LabelEncoder,
    pub region: LabelEncoder,
}

/// Integer codes for the categorical fields of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCodes {
    pub product_category: usize,
    pub promotion_type: usize,
    pub region: usize,
}

impl LabelEncoders {
    pub fn encoder(&self, field: CategoricalField) -> &LabelEncoder {
        match field {
            CategoricalField::ProductCategory => &self.product_category,
            CategoricalField::PromotionType => &self.promotion_type,
            CategoricalField::Region => &self.region,
        }
    }

    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<usize, ServiceError> {
        self.encoder(field)
            .transform(value)
            .ok_or_else(|| ServiceError::UnknownCategory {
                field,
                value: value.to_string(),
            })
    }

    /// Encodes every categorical field of a request, failing on the first
    /// value the encoders have never seen.
    pub fn encode_request(&self, request: &PromotionRequest) -> Result<CategoryCodes, ServiceError> {
        Ok(CategoryCodes {
            product_category: self.encode(
                CategoricalField::ProductCategory,
                &request.product_category,
            )?,
            promotion_type: self.encode(CategoricalField::PromotionType, &request.promotion_type)?,
            region: self.encode(CategoricalField::Region, &request.region)?,
        })
    }
}

/// Builds the feature vector for a request. Deterministic: identical inputs
/// always produce a bit-identical vector.
pub fn encode(
    request: &PromotionRequest,
    baseline: &Baseline,
    encoders: &LabelEncoders,
) -> Result<FeatureVector, ServiceError> {
    let codes = encoders.encode_request(request)?;
    let calendar = CalendarFeatures::from_date(request.start_date);

    Ok(FeatureVector([
        codes.product_category as f64,
        f64::from(request.discount_percent),
        codes.promotion_type as f64,
        codes.region as f64,
        f64::from(request.duration_days),
        baseline.avg_transaction_value,
        baseline.avg_daily_transactions,
        baseline.avg_daily_sales,
        flag(request.has_campaign),
        f64::from(request.num_overlapping_campaigns),
        f64::from(calendar.month),
        f64::from(calendar.quarter),
        f64::from(calendar.day_of_week),
        flag(calendar.is_holiday_season),
        flag(calendar.starts_on_weekend),
    ]))
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn encoders() -> LabelEncoders {
        LabelEncoders {
            product_category: LabelEncoder::new(vec!["Electronics".into(), "Toys".into()]).unwrap(),
            promotion_type: LabelEncoder::new(vec!["BOGO".into(), "Percentage Off".into()])
                .unwrap(),
            region: LabelEncoder::new(vec!["East".into(), "North".into(), "West".into()]).unwrap(),
        }
    }

    fn request(start_date: NaiveDate) -> PromotionRequest {
        PromotionRequest {
            product_category: "Toys".into(),
            promotion_type: "Percentage Off".into(),
            region: "West".into(),
            discount_percent: 20,
            duration_days: 10,
            start_date,
            has_campaign: true,
            num_overlapping_campaigns: 2,
        }
    }

    fn baseline() -> Baseline {
        Baseline {
            avg_transaction_value: 50.0,
            avg_daily_sales: 1000.0,
            avg_daily_transactions: 20.0,
        }
    }

    #[test]
    fn calendar_features_for_saturday_in_november() {
        // 2024-11-30 is a Saturday
        let calendar = CalendarFeatures::from_date(NaiveDate::from_ymd_opt(2024, 11, 30).unwrap());
        assert_eq!(calendar.month, 11);
        assert_eq!(calendar.quarter, 4);
        assert_eq!(calendar.day_of_week, 5);
        assert!(calendar.is_holiday_season);
        assert!(calendar.starts_on_weekend);
    }

    #[test]
    fn calendar_features_for_monday_in_january() {
        // 2024-01-01 is a Monday
        let calendar = CalendarFeatures::from_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(calendar.quarter, 1);
        assert_eq!(calendar.day_of_week, 0);
        assert!(!calendar.is_holiday_season);
        assert!(!calendar.starts_on_weekend);
    }

    #[test]
    fn quarter_boundaries() {
        for (month, quarter) in [(1, 1), (3, 1), (4, 2), (6, 2), (7, 3), (9, 3), (10, 4), (12, 4)] {
            let date = NaiveDate::from_ymd_opt(2023, month, 15).unwrap();
            assert_eq!(CalendarFeatures::from_date(date).quarter, quarter, "month {}", month);
        }
    }

    #[test]
    fn encode_follows_training_order() {
        // 2024-06-05 is a Wednesday
        let req = request(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        let vector = encode(&req, &baseline(), &encoders()).unwrap();

        assert_eq!(
            vector.values(),
            &[1.0, 20.0, 1.0, 2.0, 10.0, 50.0, 20.0, 1000.0, 1.0, 2.0, 6.0, 2.0, 2.0, 0.0, 0.0]
        );
        assert_eq!(vector.discount_percent(), 20.0);
    }

    #[test]
    fn named_pairs_follow_feature_names() {
        let req = request(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        let vector = encode(&req, &baseline(), &encoders()).unwrap();
        let named: Vec<_> = vector.named().collect();
        assert_eq!(named.len(), FEATURE_COUNT);
        assert_eq!(named[0], ("product_category_encoded", 1.0));
        assert_eq!(named[7], ("baseline_daily_sales", 1000.0));
        assert_eq!(named[14], ("starts_on_weekend", 0.0));
    }

    #[test]
    fn with_discount_only_touches_discount_column() {
        let req = request(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        let vector = encode(&req, &baseline(), &encoders()).unwrap();
        let swept = vector.with_discount(30);

        for (index, (before, after)) in vector.values().iter().zip(swept.values()).enumerate() {
            if index == DISCOUNT_INDEX {
                assert_eq!(*after, 30.0);
            } else {
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn unknown_region_fails() {
        let mut req = request(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        req.region = "Atlantis".into();
        let err = encode(&req, &baseline(), &encoders()).unwrap_err();
        assert_matches!(
            err,
            ServiceError::UnknownCategory { field: CategoricalField::Region, ref value } if value == "Atlantis"
        );
    }

    #[test]
    fn duplicate_classes_are_rejected() {
        let err = LabelEncoder::new(vec!["A".into(), "B".into(), "A".into()]).unwrap_err();
        assert_matches!(err, ServiceError::ModelUnavailable(_));
    }

    #[test]
    fn encoder_round_trip_codes() {
        let encoder = LabelEncoder::new(vec!["East".into(), "North".into()]).unwrap();
        assert_eq!(encoder.transform("North"), Some(1));
        assert_eq!(encoder.inverse_transform(1), Some("North"));
        assert_eq!(encoder.transform("South"), None);
        assert_eq!(encoder.inverse_transform(7), None);
    }
}
