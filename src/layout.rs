//! Grid geometry for the scatterplot matrix.

use crate::data::metrics::{Domain, DomainMap};
use crate::scale::{make_scale, LinearScale};

/// Grid position of a cell: `(i, j)` = (x-metric index, y-metric index).
pub type CellId = (usize, usize);

/// One scatterplot of the matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: String,
    pub i: usize,
    pub y: String,
    pub j: usize,
}

impl Cell {
    pub fn id(&self) -> CellId {
        (self.i, self.j)
    }

    pub fn is_diagonal(&self) -> bool {
        self.i == self.j
    }
}

/// Cartesian product of `a` × `b`, row-major over (i, j).
pub fn cross(a: &[String], b: &[String]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(a.len() * b.len());
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            cells.push(Cell { x: x.clone(), i, y: y.clone(), j });
        }
    }
    cells
}

/// Fixed-size square cells with an inset for axis labels.
///
/// All positions are relative to the matrix origin, which callers translate
/// by [`origin`](Self::origin) inside the full drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub n: usize,
    pub size: f64,
    pub padding: f64,
}

impl GridLayout {
    pub fn new(n: usize, size: f64, padding: f64) -> Self {
        Self { n, size, padding }
    }

    /// Width and height of the whole drawing.
    pub fn total_size(&self) -> f64 {
        self.size * self.n as f64 + self.padding
    }

    /// Offset of the matrix inside the drawing.
    pub fn origin(&self) -> (f64, f64) {
        (self.padding, self.padding / 2.0)
    }

    /// Column offset for x-metric `i`; the first metric sits in the rightmost column.
    pub fn column_x(&self, i: usize) -> f64 {
        (self.n - i - 1) as f64 * self.size
    }

    /// Row offset for y-metric `j`.
    pub fn row_y(&self, j: usize) -> f64 {
        j as f64 * self.size
    }

    pub fn cell_origin(&self, cell: &Cell) -> (f64, f64) {
        (self.column_x(cell.i), self.row_y(cell.j))
    }

    /// Pixel range of x scales inside a cell.
    pub fn x_range(&self) -> (f64, f64) {
        (self.padding / 2.0, self.size - self.padding / 2.0)
    }

    /// Pixel range of y scales inside a cell (inverted so values grow upward).
    pub fn y_range(&self) -> (f64, f64) {
        (self.size - self.padding / 2.0, self.padding / 2.0)
    }

    pub fn x_scale(&self, domain: Domain) -> LinearScale {
        make_scale(domain, self.x_range())
    }

    pub fn y_scale(&self, domain: Domain) -> LinearScale {
        make_scale(domain, self.y_range())
    }

    /// Scales for a cell from the shared domain map.
    pub fn cell_scales(&self, cell: &Cell, domains: &DomainMap) -> Option<(LinearScale, LinearScale)> {
        let dx = domains.get(&cell.x)?;
        let dy = domains.get(&cell.y)?;
        Some((self.x_scale(*dx), self.y_scale(*dy)))
    }

    /// Frame rectangle `(x, y, w, h)` inside a cell.
    pub fn frame(&self) -> (f64, f64, f64, f64) {
        let half = self.padding / 2.0;
        (half, half, self.size - self.padding, self.size - self.padding)
    }

    /// Tick line length for border axes; ticks span the whole matrix.
    pub fn tick_size(&self) -> f64 {
        self.size * self.n as f64
    }

    /// Cell under a point given in matrix coordinates.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellId> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.size) as usize;
        let j = (y / self.size) as usize;
        if col >= self.n || j >= self.n {
            return None;
        }
        Some((self.n - col - 1, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_metrics_make_four_cells() {
        let m = names(&["A", "B"]);
        let cells: Vec<(String, String)> = cross(&m, &m)
            .into_iter()
            .map(|c| (c.x, c.y))
            .collect();
        assert_eq!(
            cells,
            vec![
                ("A".into(), "A".into()),
                ("A".into(), "B".into()),
                ("B".into(), "A".into()),
                ("B".into(), "B".into()),
            ]
        );
    }

    #[test]
    fn n_metrics_make_n_squared_cells_with_n_diagonals() {
        for n in 1..6 {
            let m: Vec<String> = (0..n).map(|k| format!("m{k}")).collect();
            let cells = cross(&m, &m);
            assert_eq!(cells.len(), n * n);
            assert_eq!(cells.iter().filter(|c| c.is_diagonal()).count(), n);
            assert!(cells.iter().filter(|c| c.is_diagonal()).all(|c| c.x == c.y));
        }
    }

    #[test]
    fn first_metric_is_rightmost_column() {
        let g = GridLayout::new(2, 230.0, 20.0);
        assert_eq!(g.column_x(0), 230.0);
        assert_eq!(g.column_x(1), 0.0);
        assert_eq!(g.row_y(1), 230.0);
        assert_eq!(g.total_size(), 480.0);
        assert_eq!(g.origin(), (20.0, 10.0));
    }

    #[test]
    fn cell_at_inverts_cell_origin() {
        let g = GridLayout::new(3, 100.0, 10.0);
        let m = names(&["a", "b", "c"]);
        for cell in cross(&m, &m) {
            let (x, y) = g.cell_origin(&cell);
            assert_eq!(g.cell_at(x + 1.0, y + 1.0), Some(cell.id()));
        }
        assert_eq!(g.cell_at(-1.0, 5.0), None);
        assert_eq!(g.cell_at(5.0, 301.0), None);
    }

    #[test]
    fn scale_ranges_are_inset_by_half_padding() {
        let g = GridLayout::new(2, 230.0, 20.0);
        let x = g.x_scale(Domain::new(2.0, 4.0));
        assert_eq!(x.apply(2.0), 10.0);
        assert_eq!(x.apply(4.0), 220.0);
        let y = g.y_scale(Domain::new(2.0, 4.0));
        assert_eq!(y.apply(2.0), 220.0);
        assert_eq!(y.apply(4.0), 10.0);
    }
}
