//! Read-only warehouse queries feeding the estimator.

pub mod baseline_queries;
pub mod performance_queries;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

pub use baseline_queries::LoadBaselineTableQuery;
pub use performance_queries::{ModelPerformance, ModelPerformanceQuery};

/// Default promotion-effectiveness table the models were trained on.
pub const DEFAULT_SOURCE_TABLE: &str = "ml_promo_effectiveness";

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").expect("valid regex")
});

#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}

/// True for a plain or schema-qualified SQL identifier. Table names are
/// interpolated into query text, so nothing else is accepted.
pub fn is_valid_table_name(name: &str) -> bool {
    TABLE_NAME.is_match(name)
}

pub(crate) fn checked_table_name(name: &str) -> Result<&str, ServiceError> {
    if is_valid_table_name(name) {
        Ok(name)
    } else {
        Err(ServiceError::ValidationError(format!(
            "'{}' is not a valid table name",
            name
        )))
    }
}
