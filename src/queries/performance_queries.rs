use async_trait::async_trait;
use metrics::histogram;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, Statement};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::{checked_table_name, Query, DEFAULT_SOURCE_TABLE};
use crate::errors::ServiceError;

/// Summary of the historical promotions the models were trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct ModelPerformance {
    pub total_promos: i64,
    pub successful_promos: i64,
    pub avg_lift: Option<f64>,
    pub avg_roi: Option<f64>,
}

impl ModelPerformance {
    /// Share of historical promotions that beat baseline; `None` with no history.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_promos > 0 {
            Some(self.successful_promos as f64 / self.total_promos as f64)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPerformanceQuery {
    pub source_table: String,
}

impl ModelPerformanceQuery {
    pub fn new(source_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
        }
    }
}

impl Default for ModelPerformanceQuery {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_TABLE)
    }
}

#[async_trait]
impl Query for ModelPerformanceQuery {
    type Result = ModelPerformance;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let table = checked_table_name(&self.source_table)?;
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total_promos,
                CAST(COALESCE(SUM(is_successful), 0) AS BIGINT) AS successful_promos,
                CAST(AVG(sales_lift_ratio) AS DOUBLE PRECISION) AS avg_lift,
                CAST(AVG(roi_proxy) AS DOUBLE PRECISION) AS avg_roi
            FROM {table}
            "#
        );

        let start = Instant::now();
        let performance = ModelPerformance::find_by_statement(Statement::from_string(
            db_pool.get_database_backend(),
            sql,
        ))
        .one(db_pool)
        .await?
        .ok_or_else(|| {
            ServiceError::DatabaseError(DbErr::RecordNotFound(format!(
                "no summary row returned from {}",
                table
            )))
        })?;

        histogram!("promo_planner.query.duration", start.elapsed().as_secs_f64());
        debug!(?performance, "Model performance summary loaded");

        Ok(performance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_handles_empty_history() {
        let empty = ModelPerformance {
            total_promos: 0,
            successful_promos: 0,
            avg_lift: None,
            avg_roi: None,
        };
        assert_eq!(empty.success_rate(), None);

        let some = ModelPerformance {
            total_promos: 8,
            successful_promos: 6,
            avg_lift: Some(0.12),
            avg_roi: Some(1.4),
        };
        assert_eq!(some.success_rate(), Some(0.75));
    }
}
