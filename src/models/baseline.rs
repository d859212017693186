use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Historical average performance for a region/category with no promotion running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub avg_transaction_value: f64,
    pub avg_daily_sales: f64,
    pub avg_daily_transactions: f64,
}

/// One row of the baseline table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub region: String,
    pub product_category: String,
    pub baseline: Baseline,
}

/// How a baseline was obtained for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMatch {
    /// The (region, product_category) pair was present in the table
    Exact,
    /// No row matched; the unweighted mean over every row was used
    GlobalMean,
}

/// Baselines keyed by (region, product_category), loaded once per process.
///
/// The table-wide mean is computed at construction so the fallback path does
/// not rescan the rows on every request.
#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    records: Vec<BaselineRecord>,
    index: HashMap<(String, String), usize>,
    global_mean: Option<Baseline>,
}

impl BaselineTable {
    pub fn new(records: Vec<BaselineRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            // first row wins on duplicate keys
            index
                .entry((record.region.clone(), record.product_category.clone()))
                .or_insert(position);
        }

        let global_mean = mean_of(&records);

        Self {
            records,
            index,
            global_mean,
        }
    }

    /// Exact lookup on (region, product_category).
    pub fn get(&self, region: &str, product_category: &str) -> Option<&Baseline> {
        self.index
            .get(&(region.to_string(), product_category.to_string()))
            .map(|&position| &self.records[position].baseline)
    }

    /// Arithmetic mean of every metric across all rows, `None` when empty.
    pub fn global_mean(&self) -> Option<Baseline> {
        self.global_mean
    }

    pub fn records(&self) -> &[BaselineRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<BaselineRecord> for BaselineTable {
    fn from_iter<I: IntoIterator<Item = BaselineRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn mean_of(records: &[BaselineRecord]) -> Option<Baseline> {
    if records.is_empty() {
        return None;
    }

    let count = records.len() as f64;
    let (transaction, sales, transactions) =
        records
            .iter()
            .fold((0.0, 0.0, 0.0), |(tv, ds, dt), record| {
                (
                    tv + record.baseline.avg_transaction_value,
                    ds + record.baseline.avg_daily_sales,
                    dt + record.baseline.avg_daily_transactions,
                )
            });

    Some(Baseline {
        avg_transaction_value: transaction / count,
        avg_daily_sales: sales / count,
        avg_daily_transactions: transactions / count,
    })
}
