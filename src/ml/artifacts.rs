/*!
 * # Model Artifacts
 *
 * Loads the persisted predictor pair and label encoders from a model
 * directory. Artifacts are JSON:
 *
 * - `promo_classifier.json`: `{"model_type": "logistic_regression", ...}`
 * - `promo_regressor.json`: `{"model_type": "linear_regression", ...}`
 * - `label_encoders.json`: `{"PRODUCT_CATEGORY": [...], "PROMOTION_TYPE": [...], "REGION": [...]}`
 *
 * Any missing, malformed or contract-violating artifact surfaces as
 * `ServiceError::ModelUnavailable` naming the file, since the usual cause is
 * that training has not been run yet.
 */

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use super::features::{LabelEncoder, LabelEncoders, FEATURE_COUNT, FEATURE_NAMES};
use super::predictor::{LiftRegressor, PredictorAdapter, SuccessClassifier};
use crate::errors::ServiceError;

pub const CLASSIFIER_FILE: &str = "promo_classifier.json";
pub const REGRESSOR_FILE: &str = "promo_regressor.json";
pub const LABEL_ENCODERS_FILE: &str = "label_encoders.json";

/// Coefficients of a fitted linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub version: Option<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Column names recorded at training time, if the trainer exported them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LinearModel {
    fn score(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(weight, value)| weight * value)
                .sum::<f64>()
    }

    fn check_contract(&self) -> Result<(), String> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {} coefficients, found {}",
                FEATURE_COUNT,
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err("coefficients must be finite".to_string());
        }
        if let Some(names) = &self.feature_names {
            let matches_contract = names.len() == FEATURE_COUNT
                && names.iter().zip(FEATURE_NAMES.iter()).all(|(a, b)| a == b);
            if !matches_contract {
                return Err(format!(
                    "feature order {:?} does not match {:?}",
                    names, FEATURE_NAMES
                ));
            }
        }
        Ok(())
    }

    fn check_width(&self, features: &[f64]) -> Result<(), ServiceError> {
        if features.len() != self.coefficients.len() {
            return Err(ServiceError::ValidationError(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LinearModel),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum RegressorArtifact {
    LinearRegression(LinearModel),
}

/// Binary logistic regression; class-1 probability is the sigmoid of the score.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    model: LinearModel,
}

impl LogisticClassifier {
    pub fn new(model: LinearModel) -> Result<Self, ServiceError> {
        model
            .check_contract()
            .map_err(|reason| ServiceError::model_unavailable("classifier", reason))?;
        Ok(Self { model })
    }
}

impl SuccessClassifier for LogisticClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ServiceError> {
        self.model.check_width(features)?;
        let score = self.model.score(features);
        Ok(1.0 / (1.0 + (-score).exp()))
    }

    fn n_features(&self) -> usize {
        self.model.coefficients.len()
    }
}

#[derive(Debug, Clone)]
pub struct LinearRegressor {
    model: LinearModel,
}

impl LinearRegressor {
    pub fn new(model: LinearModel) -> Result<Self, ServiceError> {
        model
            .check_contract()
            .map_err(|reason| ServiceError::model_unavailable("regressor", reason))?;
        Ok(Self { model })
    }
}

impl LiftRegressor for LinearRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ServiceError> {
        self.model.check_width(features)?;
        Ok(self.model.score(features))
    }

    fn n_features(&self) -> usize {
        self.model.coefficients.len()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelEncodersFile {
    #[serde(rename = "PRODUCT_CATEGORY")]
    product_category: Vec<String>,
    #[serde(rename = "PROMOTION_TYPE")]
    promotion_type: Vec<String>,
    #[serde(rename = "REGION")]
    region: Vec<String>,
}

impl TryFrom<LabelEncodersFile> for LabelEncoders {
    type Error = ServiceError;

    fn try_from(file: LabelEncodersFile) -> Result<Self, Self::Error> {
        Ok(LabelEncoders {
            product_category: LabelEncoder::new(file.product_category)?,
            promotion_type: LabelEncoder::new(file.promotion_type)?,
            region: LabelEncoder::new(file.region)?,
        })
    }
}

/// The loaded predictor pair plus the encoders they were trained with.
#[derive(Debug)]
pub struct ModelArtifacts {
    pub predictor: PredictorAdapter,
    pub encoders: LabelEncoders,
}

impl ModelArtifacts {
    /// Loads all three artifacts from `model_dir`.
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let model_dir = model_dir.as_ref();
        info!("Loading promotion models from {}", model_dir.display());

        let classifier_path = model_dir.join(CLASSIFIER_FILE);
        let classifier: Box<dyn SuccessClassifier> = match read_artifact(&classifier_path)? {
            ClassifierArtifact::LogisticRegression(model) => {
                Box::new(LogisticClassifier::new(model).map_err(|e| at_path(&classifier_path, e))?)
            }
        };

        let regressor_path = model_dir.join(REGRESSOR_FILE);
        let regressor: Box<dyn LiftRegressor> = match read_artifact(&regressor_path)? {
            RegressorArtifact::LinearRegression(model) => {
                Box::new(LinearRegressor::new(model).map_err(|e| at_path(&regressor_path, e))?)
            }
        };

        let encoders_path = model_dir.join(LABEL_ENCODERS_FILE);
        let encoders_file: LabelEncodersFile = read_artifact(&encoders_path)?;
        let encoders =
            LabelEncoders::try_from(encoders_file).map_err(|e| at_path(&encoders_path, e))?;

        let predictor = PredictorAdapter::new(classifier, regressor)?;

        info!(
            product_categories = encoders.product_category.classes().len(),
            promotion_types = encoders.promotion_type.classes().len(),
            regions = encoders.region.classes().len(),
            "Promotion models loaded"
        );

        Ok(Self {
            predictor,
            encoders,
        })
    }
}

/// Re-labels a contract violation with the artifact path it came from.
fn at_path(path: &Path, err: ServiceError) -> ServiceError {
    match err {
        ServiceError::ModelUnavailable(reason) => ServiceError::model_unavailable(path.display(), reason),
        other => other,
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ServiceError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            warn!("Model artifact {} not found", path.display());
            ServiceError::model_unavailable(
                path.display(),
                "artifact not found; run model training first",
            )
        } else {
            ServiceError::model_unavailable(path.display(), e)
        }
    })?;

    serde_json::from_str(&raw)
        .map_err(|e| ServiceError::model_unavailable(path.display(), format!("corrupt artifact: {}", e)))
}
