/*!
 * # Predictor Adapter
 *
 * Wraps the success classifier and the lift regressor behind a single
 * `predict(vector)` call. The adapter checks shape and value sanity and
 * passes the vector through unchanged; it does no feature engineering.
 */

use tracing::debug;

use super::features::{FeatureVector, FEATURE_COUNT};
use crate::errors::ServiceError;
use crate::models::PredictionResult;

/// Trained classifier returning the probability that a promotion beats baseline.
#[cfg_attr(test, mockall::automock)]
pub trait SuccessClassifier: Send + Sync {
    /// Class-1 probability for a single feature row
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ServiceError>;

    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;
}

/// Trained regressor returning the expected sales lift ratio.
#[cfg_attr(test, mockall::automock)]
pub trait LiftRegressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, ServiceError>;

    fn n_features(&self) -> usize;
}

pub struct PredictorAdapter {
    classifier: Box<dyn SuccessClassifier>,
    regressor: Box<dyn LiftRegressor>,
}

impl std::fmt::Debug for PredictorAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictorAdapter")
            .field("classifier_features", &self.classifier.n_features())
            .field("regressor_features", &self.regressor.n_features())
            .finish()
    }
}

impl PredictorAdapter {
    /// Pairs the two models, refusing any model fitted on a different number
    /// of columns than the feature contract.
    pub fn new(
        classifier: Box<dyn SuccessClassifier>,
        regressor: Box<dyn LiftRegressor>,
    ) -> Result<Self, ServiceError> {
        if classifier.n_features() != FEATURE_COUNT {
            return Err(ServiceError::ModelUnavailable(format!(
                "classifier expects {} features, feature contract has {}",
                classifier.n_features(),
                FEATURE_COUNT
            )));
        }
        if regressor.n_features() != FEATURE_COUNT {
            return Err(ServiceError::ModelUnavailable(format!(
                "regressor expects {} features, feature contract has {}",
                regressor.n_features(),
                FEATURE_COUNT
            )));
        }

        Ok(Self {
            classifier,
            regressor,
        })
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, ServiceError> {
        if let Some((name, value)) = features.named().find(|(_, value)| !value.is_finite()) {
            return Err(ServiceError::ValidationError(format!(
                "feature '{}' is not finite: {}",
                name, value
            )));
        }

        let row = features.as_slice();
        let success_probability = self.classifier.predict_proba(row)?;
        if !success_probability.is_finite() || !(0.0..=1.0).contains(&success_probability) {
            return Err(ServiceError::PredictionFailed(format!(
                "classifier returned probability {} outside [0, 1]",
                success_probability
            )));
        }

        let predicted_lift_ratio = self.regressor.predict(row)?;
        if !predicted_lift_ratio.is_finite() {
            return Err(ServiceError::PredictionFailed(format!(
                "regressor returned non-finite lift {}",
                predicted_lift_ratio
            )));
        }

        debug!(
            discount = features.discount_percent(),
            success_probability, predicted_lift_ratio, "Scored feature vector"
        );

        Ok(PredictionResult {
            success_probability,
            predicted_lift_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn vector() -> FeatureVector {
        FeatureVector::new([
            0.0, 15.0, 1.0, 2.0, 7.0, 50.0, 20.0, 1000.0, 1.0, 1.0, 11.0, 4.0, 5.0, 1.0, 1.0,
        ])
    }

    fn classifier(probability: f64) -> MockSuccessClassifier {
        let mut mock = MockSuccessClassifier::new();
        mock.expect_n_features().return_const(FEATURE_COUNT);
        mock.expect_predict_proba()
            .returning(move |_| Ok(probability));
        mock
    }

    fn regressor(lift: f64) -> MockLiftRegressor {
        let mut mock = MockLiftRegressor::new();
        mock.expect_n_features().return_const(FEATURE_COUNT);
        mock.expect_predict().returning(move |_| Ok(lift));
        mock
    }

    #[test]
    fn passes_vector_through_unchanged() {
        let mut classifier = MockSuccessClassifier::new();
        classifier.expect_n_features().return_const(FEATURE_COUNT);
        classifier
            .expect_predict_proba()
            .withf(|row| row == vector().as_slice())
            .times(1)
            .returning(|_| Ok(0.8));

        let mut regressor = MockLiftRegressor::new();
        regressor.expect_n_features().return_const(FEATURE_COUNT);
        regressor
            .expect_predict()
            .withf(|row| row.len() == FEATURE_COUNT && row[1] == 15.0)
            .times(1)
            .returning(|_| Ok(-0.1));

        let adapter = PredictorAdapter::new(Box::new(classifier), Box::new(regressor)).unwrap();
        let result = adapter.predict(&vector()).unwrap();
        assert_eq!(result.success_probability, 0.8);
        assert_eq!(result.predicted_lift_ratio, -0.1);
    }

    #[test]
    fn rejects_model_with_wrong_width() {
        let mut narrow = MockSuccessClassifier::new();
        narrow.expect_n_features().return_const(14usize);

        let err = PredictorAdapter::new(Box::new(narrow), Box::new(regressor(0.1))).unwrap_err();
        assert_matches!(err, ServiceError::ModelUnavailable(_));
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let adapter =
            PredictorAdapter::new(Box::new(classifier(1.2)), Box::new(regressor(0.1))).unwrap();
        assert_matches!(
            adapter.predict(&vector()),
            Err(ServiceError::PredictionFailed(_))
        );
    }

    #[test]
    fn rejects_non_finite_lift() {
        let adapter =
            PredictorAdapter::new(Box::new(classifier(0.5)), Box::new(regressor(f64::NAN)))
                .unwrap();
        assert_matches!(
            adapter.predict(&vector()),
            Err(ServiceError::PredictionFailed(_))
        );
    }

    #[test]
    fn rejects_non_finite_features() {
        let adapter =
            PredictorAdapter::new(Box::new(classifier(0.5)), Box::new(regressor(0.1))).unwrap();
        let mut values = *vector().values();
        values[7] = f64::INFINITY;
        let err = adapter.predict(&FeatureVector::new(values)).unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(ref msg) if msg.contains("baseline_daily_sales"));
    }

    #[test]
    fn boundary_probabilities_are_accepted() {
        for probability in [0.0, 1.0] {
            let adapter = PredictorAdapter::new(
                Box::new(classifier(probability)),
                Box::new(regressor(0.0)),
            )
            .unwrap();
            assert_eq!(
                adapter.predict(&vector()).unwrap().success_probability,
                probability
            );
        }
    }
}
