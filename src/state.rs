use std::path::Path;

use crate::brush::{BrushEvent, ViewModel};
use crate::config::SplomConfig;
use crate::data::loader;
use crate::data::metrics::MetricSelection;
use crate::data::model::Dataset;
use crate::splom::Splom;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: SplomConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Matrix built from the dataset and config; None if that failed.
    pub splom: Option<Splom>,

    /// Brush ownership, selection and hidden rows.
    pub view: ViewModel,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SplomConfig::default())
    }
}

impl AppState {
    pub fn new(config: SplomConfig) -> Self {
        Self {
            config,
            dataset: None,
            splom: None,
            view: ViewModel::default(),
            status_message: None,
        }
    }

    /// Load a file and make it the current dataset.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and build the matrix.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
        self.rebuild();
    }

    /// Rebuild the matrix from the current dataset and config. The brush is
    /// reset because cell geometry may have changed.
    pub fn rebuild(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match Splom::build(dataset, &self.config) {
            Ok(splom) => {
                self.view = ViewModel::new(splom.row_count());
                self.splom = Some(splom);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot build matrix: {e}");
                self.splom = None;
                self.view = ViewModel::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Switch between the fixed metric list and all numeric columns.
    pub fn set_metric_selection(&mut self, selection: MetricSelection) {
        if self.config.metrics != selection {
            self.config.metrics = selection;
            self.rebuild();
        }
    }

    /// Toggle one column in or out of a fixed metric list.
    pub fn toggle_metric(&mut self, column: &str) {
        let mut names = match &self.config.metrics {
            MetricSelection::Fixed(names) => names.clone(),
            MetricSelection::AllNumeric => self
                .splom
                .as_ref()
                .map(|s| s.metrics.clone())
                .unwrap_or_default(),
        };
        if let Some(pos) = names.iter().position(|n| n == column) {
            names.remove(pos);
        } else {
            names.push(column.to_string());
        }
        self.set_metric_selection(MetricSelection::Fixed(names));
    }

    /// Set colour column and rebuild.
    pub fn set_category_column(&mut self, col: String) {
        if self.config.category_column != col {
            self.config.category_column = col;
            self.rebuild();
        }
    }

    /// Feed a pointer event through the brush.
    pub fn brush(&mut self, event: BrushEvent) {
        let Some(splom) = &self.splom else {
            return;
        };
        let view = std::mem::take(&mut self.view);
        self.view = view.handle(event, splom);
    }
}
