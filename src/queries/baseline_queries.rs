use async_trait::async_trait;
use metrics::histogram;
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{checked_table_name, Query, DEFAULT_SOURCE_TABLE};
use crate::errors::ServiceError;
use crate::models::{Baseline, BaselineRecord, BaselineTable};

/// Per (region, product_category) historical averages, one row per group.
#[derive(Debug, Clone, FromQueryResult)]
struct BaselineRow {
    region: String,
    product_category: String,
    avg_transaction: Option<f64>,
    avg_daily_sales: Option<f64>,
    avg_daily_transactions: Option<f64>,
}

impl BaselineRow {
    fn into_record(self) -> Option<BaselineRecord> {
        Some(BaselineRecord {
            baseline: Baseline {
                avg_transaction_value: self.avg_transaction?,
                avg_daily_sales: self.avg_daily_sales?,
                avg_daily_transactions: self.avg_daily_transactions?,
            },
            region: self.region,
            product_category: self.product_category,
        })
    }
}

/// Loads the baseline table from the promotion-effectiveness history.
///
/// Daily figures are per-promotion totals divided by the promotion length,
/// averaged per group. Promotions with a non-positive duration are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBaselineTableQuery {
    pub source_table: String,
}

impl LoadBaselineTableQuery {
    pub fn new(source_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
        }
    }

    fn sql(&self) -> Result<String, ServiceError> {
        let table = checked_table_name(&self.source_table)?;
        Ok(format!(
            r#"
            SELECT
                region,
                product_category,
                CAST(AVG(avg_transaction_value) AS DOUBLE PRECISION) AS avg_transaction,
                CAST(AVG(CAST(total_sales AS DOUBLE PRECISION) / duration_days) AS DOUBLE PRECISION) AS avg_daily_sales,
                CAST(AVG(CAST(transactions_count AS DOUBLE PRECISION) / duration_days) AS DOUBLE PRECISION) AS avg_daily_transactions
            FROM {table}
            WHERE duration_days > 0
            GROUP BY region, product_category
            ORDER BY region, product_category
            "#
        ))
    }
}

impl Default for LoadBaselineTableQuery {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_TABLE)
    }
}

#[async_trait]
impl Query for LoadBaselineTableQuery {
    type Result = BaselineTable;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let sql = self.sql()?;
        let start = Instant::now();
        debug!("Loading baseline table from {}", self.source_table);

        let rows = BaselineRow::find_by_statement(Statement::from_string(
            db_pool.get_database_backend(),
            sql,
        ))
        .all(db_pool)
        .await
        .map_err(ServiceError::from)?;

        histogram!("promo_planner.query.duration", start.elapsed().as_secs_f64());

        let total = rows.len();
        let records: Vec<BaselineRecord> = rows
            .into_iter()
            .filter_map(|row| {
                let key = (row.region.clone(), row.product_category.clone());
                let record = row.into_record();
                if record.is_none() {
                    warn!(
                        region = %key.0,
                        product_category = %key.1,
                        "Skipping baseline group with missing metrics"
                    );
                }
                record
            })
            .collect();

        info!(
            groups = total,
            loaded = records.len(),
            "Baseline table loaded from {}",
            self.source_table
        );

        Ok(BaselineTable::new(records))
    }
}
