use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ColorScheme;
use crate::data::metrics::MetricSelection;
use crate::error::SplomError;

/// Everything that shapes the matrix. Every field has a default, so an empty
/// JSON object is a valid config.
///
/// ```json
/// {
///   "metrics": "all_numeric",
///   "category_column": "species",
///   "cell_size": 180,
///   "color_scheme": "spectrum"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplomConfig {
    pub metrics: MetricSelection,
    /// Column used for point colour.
    pub category_column: String,
    /// Side of one square cell, in pixels.
    pub cell_size: f64,
    /// Inset around each plot; half on each side.
    pub padding: f64,
    /// Approximate tick count per axis.
    pub ticks: usize,
    pub point_radius: f64,
    pub color_scheme: ColorScheme,
}

impl Default for SplomConfig {
    fn default() -> Self {
        Self {
            metrics: MetricSelection::default(),
            category_column: "species".into(),
            cell_size: 230.0,
            padding: 20.0,
            ticks: 6,
            point_radius: 4.0,
            color_scheme: ColorScheme::default(),
        }
    }
}

impl SplomConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: SplomConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SplomError> {
        if !(self.cell_size > 0.0) {
            return Err(SplomError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if !(self.padding >= 0.0) || self.padding >= self.cell_size {
            return Err(SplomError::InvalidConfig(format!(
                "padding {} leaves no room inside a {} px cell",
                self.padding, self.cell_size
            )));
        }
        if !(self.point_radius > 0.0) {
            return Err(SplomError::InvalidConfig(format!(
                "point_radius must be positive, got {}",
                self.point_radius
            )));
        }
        Ok(())
    }
}
