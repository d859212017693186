use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::models::CategoricalField;

/// What the caller should do about a failure.
///
/// Nothing in the estimator is transient: every remedy requires repairing
/// some input or external state before trying again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Remedy {
    /// Pick a category the trained encoders know about
    SupplyKnownCategory,
    /// Correct an out-of-range or malformed request field
    FixRequest,
    /// Rebuild the historical promotion-effectiveness table
    RegenerateBaselineTable,
    /// Run model training or point the planner at the saved artifacts
    RegenerateModelArtifacts,
    /// The warehouse query failed; check connectivity and credentials
    CheckDataSource,
    /// Unexpected internal state
    Investigate,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Unknown {field} category: {value}")]
    UnknownCategory { field: CategoricalField, value: String },

    #[error("Baseline table is empty; no historical promotion data available")]
    EmptyBaselineTable,

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the remedy for this error.
    /// This is the single source of truth for error-to-remedy mapping.
    pub fn remedy(&self) -> Remedy {
        match self {
            Self::UnknownCategory { .. } => Remedy::SupplyKnownCategory,
            Self::ValidationError(_) => Remedy::FixRequest,
            Self::EmptyBaselineTable => Remedy::RegenerateBaselineTable,
            Self::ModelUnavailable(_) => Remedy::RegenerateModelArtifacts,
            Self::DatabaseError(_) => Remedy::CheckDataSource,
            Self::PredictionFailed(_) | Self::SerializationError(_) | Self::Other(_) => {
                Remedy::Investigate
            }
        }
    }

    /// True when the failure is a problem with the caller's request rather
    /// than with the estimator's resources.
    pub fn is_request_error(&self) -> bool {
        matches!(self.remedy(), Remedy::SupplyKnownCategory | Remedy::FixRequest)
    }

    /// Helper for artifact loading failures that names the offending file.
    pub fn model_unavailable(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        ServiceError::ModelUnavailable(format!("{}: {}", path, reason))
    }
}
