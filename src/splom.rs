//! The assembled matrix: metrics, shared domains, cells and per-row point data.
//!
//! Built once per dataset/config pair and immutable afterwards. Both the SVG
//! writer and the egui painter read from it, and the brush computes hidden
//! rows against it.

use std::collections::BTreeMap;

use crate::color::{ColorMap, Rgb};
use crate::config::SplomConfig;
use crate::data::metrics::{compute_domains, DomainMap};
use crate::data::model::Dataset;
use crate::error::SplomError;
use crate::layout::{cross, Cell, CellId, GridLayout};
use crate::scale::LinearScale;

#[derive(Debug, Clone)]
pub struct Splom {
    pub metrics: Vec<String>,
    pub domains: DomainMap,
    pub cells: Vec<Cell>,
    pub layout: GridLayout,
    pub color_map: ColorMap,
    pub ticks: usize,
    pub point_radius: f64,
    /// Metric → value per row (`None` where missing or non-numeric).
    columns: BTreeMap<String, Vec<Option<f64>>>,
    /// Category colour per row.
    colors: Vec<Rgb>,
}

impl Splom {
    pub fn build(dataset: &Dataset, config: &SplomConfig) -> Result<Self, SplomError> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(SplomError::EmptyDataset);
        }

        let metrics = config.metrics.resolve(dataset, &config.category_column)?;
        let domains = compute_domains(dataset, &metrics)?;

        let columns: BTreeMap<String, Vec<Option<f64>>> = metrics
            .iter()
            .map(|m| {
                let values: Vec<Option<f64>> = dataset.rows.iter().map(|r| r.number(m)).collect();
                let missing = values.iter().filter(|v| v.is_none()).count();
                if missing > 0 {
                    log::warn!("{missing} rows have no numeric '{m}' and are left out of its cells");
                }
                (m.clone(), values)
            })
            .collect();

        if !dataset.has_column(&config.category_column) {
            log::warn!(
                "Category column '{}' not found; all points share one colour",
                config.category_column
            );
        }
        let color_map = ColorMap::from_dataset(dataset, &config.category_column, config.color_scheme);
        let colors = dataset.rows.iter().map(|r| color_map.color_for_row(r)).collect();

        let layout = GridLayout::new(metrics.len(), config.cell_size, config.padding);
        let cells = cross(&metrics, &metrics);

        log::info!(
            "Built {}x{} matrix over {} rows",
            metrics.len(),
            metrics.len(),
            dataset.len()
        );

        Ok(Splom {
            metrics,
            domains,
            cells,
            layout,
            color_map,
            ticks: config.ticks,
            point_radius: config.point_radius,
            columns,
            colors,
        })
    }

    pub fn row_count(&self) -> usize {
        self.colors.len()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id() == id)
    }

    pub fn value(&self, metric: &str, row: usize) -> Option<f64> {
        self.columns.get(metric)?.get(row).copied().flatten()
    }

    pub fn row_color(&self, row: usize) -> Rgb {
        self.colors.get(row).copied().unwrap_or(crate::color::UNKNOWN_COLOR)
    }

    pub fn scales(&self, cell: &Cell) -> Option<(LinearScale, LinearScale)> {
        self.layout.cell_scales(cell, &self.domains)
    }

    /// Cell-local pixel position of every row, `None` where a value is missing.
    pub fn points(&self, cell: &Cell) -> Vec<Option<(f64, f64)>> {
        let Some((sx, sy)) = self.scales(cell) else {
            return vec![None; self.row_count()];
        };
        (0..self.row_count())
            .map(|row| {
                let x = self.value(&cell.x, row)?;
                let y = self.value(&cell.y, row)?;
                Some((sx.apply(x), sy.apply(y)))
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::metrics::MetricSelection;
    use crate::data::model::{FieldValue, Row};

    /// Small iris-like table: (sepal width, sepal length, species).
    pub(crate) fn iris(rows: &[(f64, f64, &str)]) -> Dataset {
        let rows = rows
            .iter()
            .map(|(w, l, s)| {
                [
                    ("sepal width", FieldValue::Float(*w)),
                    ("sepal length", FieldValue::Float(*l)),
                    ("species", FieldValue::String(s.to_string())),
                ]
                .into_iter()
                .collect::<Row>()
            })
            .collect();
        Dataset::with_columns(
            vec!["sepal width".into(), "sepal length".into(), "species".into()],
            rows,
        )
    }

    pub(crate) fn sample() -> Splom {
        let ds = iris(&[
            (2.0, 4.0, "setosa"),
            (3.0, 5.0, "setosa"),
            (4.0, 6.0, "versicolor"),
        ]);
        Splom::build(&ds, &SplomConfig::default()).expect("build splom")
    }

    #[test]
    fn build_uses_default_metrics_and_shared_domains() {
        let s = sample();
        assert_eq!(s.metrics, vec!["sepal width", "sepal length"]);
        assert_eq!(s.cells.len(), 4);
        assert_eq!(s.domains["sepal width"].min, 2.0);
        assert_eq!(s.domains["sepal length"].max, 6.0);
    }

    #[test]
    fn cells_sharing_a_metric_agree_on_its_scale() {
        let s = sample();
        let a = s.cell((0, 1)).unwrap();
        let b = s.cell((0, 0)).unwrap();
        let (ax, _) = s.scales(a).unwrap();
        let (bx, _) = s.scales(b).unwrap();
        assert_eq!(ax, bx);
        let pa = s.points(a);
        let pb = s.points(b);
        for (p, q) in pa.iter().zip(&pb) {
            assert_eq!(p.unwrap().0, q.unwrap().0);
        }
    }

    #[test]
    fn points_land_on_range_edges_and_midpoint() {
        let s = sample();
        let cell = s.cell((0, 0)).unwrap();
        let xs: Vec<f64> = s.points(cell).into_iter().map(|p| p.unwrap().0).collect();
        assert_eq!(xs, vec![10.0, 115.0, 220.0]);
    }

    #[test]
    fn missing_value_gives_no_point() {
        let mut ds = iris(&[(2.0, 4.0, "setosa"), (3.0, 5.0, "setosa")]);
        ds.rows[1].fields.insert("sepal length".into(), FieldValue::Null);
        let s = Splom::build(&ds, &SplomConfig::default()).unwrap();
        let pts = s.points(s.cell((0, 1)).unwrap());
        assert!(pts[0].is_some());
        assert!(pts[1].is_none());
    }

    #[test]
    fn row_colours_match_colour_map() {
        let s = sample();
        assert_eq!(s.row_color(0), s.row_color(1));
        assert_ne!(s.row_color(0), s.row_color(2));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let ds = iris(&[]);
        assert_eq!(
            Splom::build(&ds, &SplomConfig::default()).unwrap_err(),
            SplomError::EmptyDataset
        );
    }

    #[test]
    fn all_numeric_selection_builds_full_matrix() {
        let ds = iris(&[(2.0, 4.0, "setosa")]);
        let cfg = SplomConfig {
            metrics: MetricSelection::AllNumeric,
            ..SplomConfig::default()
        };
        let s = Splom::build(&ds, &cfg).unwrap();
        assert_eq!(s.metrics.len(), 2);
        assert_eq!(s.layout.n, 2);
    }
}
