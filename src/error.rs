use thiserror::Error;

/// Failures while turning a loaded table into a scatterplot matrix.
#[derive(Debug, Error, PartialEq)]
pub enum SplomError {
    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("no metrics to plot (selection resolved to an empty list)")]
    NoMetrics,

    #[error("metric '{0}' is not a column of the dataset")]
    UnknownMetric(String),

    #[error("metric '{0}' has no numeric values")]
    NoNumericValues(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
