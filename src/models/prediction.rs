use serde::{Deserialize, Serialize};

/// Output of the two trained predictors for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Class-1 probability from the success classifier, within [0, 1]
    pub success_probability: f64,
    /// Fractional change in daily sales versus baseline; may be negative
    pub predicted_lift_ratio: f64,
}
