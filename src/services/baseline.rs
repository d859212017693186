use metrics::counter;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::models::{Baseline, BaselineMatch, BaselineTable};

/// Looks up the baseline for a (region, product_category) pair.
///
/// An exact match wins. Otherwise the arithmetic mean of each metric across
/// the whole table is returned, never a per-region or per-category mean.
/// Fails only when the table has no rows at all.
pub fn resolve(
    region: &str,
    product_category: &str,
    table: &BaselineTable,
) -> Result<Baseline, ServiceError> {
    resolve_with_match(region, product_category, table).map(|(baseline, _)| baseline)
}

/// Same as [`resolve`], also reporting whether the fallback was used.
pub fn resolve_with_match(
    region: &str,
    product_category: &str,
    table: &BaselineTable,
) -> Result<(Baseline, BaselineMatch), ServiceError> {
    if let Some(baseline) = table.get(region, product_category) {
        debug!(region, product_category, "Exact baseline match");
        return Ok((*baseline, BaselineMatch::Exact));
    }

    let mean = table.global_mean().ok_or(ServiceError::EmptyBaselineTable)?;

    warn!(
        region,
        product_category,
        rows = table.len(),
        "No baseline for region/category; using table-wide mean"
    );
    counter!("promo_planner.baseline.fallback", 1);

    Ok((mean, BaselineMatch::GlobalMean))
}
