/*!
 * # Machine Learning Module
 *
 * Scoring side of promotion planning. The trained models are opaque: this
 * module only encodes features in the order they were trained on, loads the
 * persisted artifacts and runs them. Training lives elsewhere.
 */

/// Model artifact loading (classifier, regressor, label encoders)
pub mod artifacts;

/// Feature encoding and the fixed feature contract
pub mod features;

/// Uniform predict interface over the classifier/regressor pair
pub mod predictor;

pub use artifacts::ModelArtifacts;
pub use features::{encode, FeatureVector, LabelEncoder, LabelEncoders, FEATURE_COUNT, FEATURE_NAMES};
pub use predictor::{LiftRegressor, PredictorAdapter, SuccessClassifier};
