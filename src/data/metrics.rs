use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::Dataset;
use crate::error::SplomError;

// ---------------------------------------------------------------------------
// Metric selection
// ---------------------------------------------------------------------------

/// Which columns become the axes of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSelection {
    /// An explicit, ordered list of column names.
    Fixed(Vec<String>),
    /// Every numeric column in header order, minus the category column.
    AllNumeric,
}

impl Default for MetricSelection {
    fn default() -> Self {
        MetricSelection::Fixed(vec!["sepal width".into(), "sepal length".into()])
    }
}

impl MetricSelection {
    /// Resolve the selection against a dataset.
    ///
    /// Fixed metrics must exist in the dataset; an empty result is an error
    /// either way.
    pub fn resolve(&self, dataset: &Dataset, category_column: &str) -> Result<Vec<String>, SplomError> {
        let metrics = match self {
            MetricSelection::Fixed(names) => {
                for name in names {
                    if !dataset.has_column(name) {
                        log::warn!("Metric '{name}' not found in columns {:?}", dataset.column_names);
                        return Err(SplomError::UnknownMetric(name.clone()));
                    }
                }
                names.clone()
            }
            MetricSelection::AllNumeric => dataset
                .numeric_columns()
                .into_iter()
                .filter(|c| c != category_column)
                .collect(),
        };

        if metrics.is_empty() {
            return Err(SplomError::NoMetrics);
        }
        log::info!("Plotting metrics {metrics:?}");
        Ok(metrics)
    }
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// Closed numeric range [min, max] of one metric over the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Metric name → domain. Computed once, shared by every cell.
pub type DomainMap = BTreeMap<String, Domain>;

/// Min/max of `metric` across all rows, skipping rows where it is missing
/// or non-numeric.
pub fn extent(dataset: &Dataset, metric: &str) -> Result<Domain, SplomError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in &dataset.rows {
        if let Some(v) = row.number(metric) {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(SplomError::NoNumericValues(metric.to_string()));
    }
    Ok(Domain { min, max })
}

/// Domains for every metric.
pub fn compute_domains(dataset: &Dataset, metrics: &[String]) -> Result<DomainMap, SplomError> {
    if dataset.is_empty() {
        return Err(SplomError::EmptyDataset);
    }
    metrics
        .iter()
        .map(|m| extent(dataset, m).map(|d| (m.clone(), d)))
        .collect()
}
