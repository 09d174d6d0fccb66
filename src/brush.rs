//! Linked brushing across cells.
//!
//! A single [`ViewModel`] holds which cell owns the brush, its selection
//! rectangle and the per-row hidden flags. Pointer events go through
//! [`ViewModel::handle`], which consumes the old state and returns the new one.
//!
//! ```text
//!   idle ──Start──▶ dragging ──Move──▶ dragging ──End──▶ idle
//!                      ▲                  │
//!                      └──────Move────────┘
//! ```

use crate::layout::CellId;
use crate::splom::Splom;

// ---------------------------------------------------------------------------
// Rect – selection rectangle in cell-local pixels
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle with `x0 <= x1` and `y0 <= y1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Zero area on either axis.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Inclusive on all edges.
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        !(self.x0 > x || x > self.x1 || self.y0 > y || y > self.y1)
    }

    /// Shift by `(dx, dy)` without leaving `[0, extent]²`; size is preserved.
    pub fn translate_within(&self, dx: f64, dy: f64, extent: f64) -> Self {
        let dx = dx.clamp(-self.x0, extent - self.x1);
        let dy = dy.clamp(-self.y0, extent - self.y1);
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }
}

fn clamp_point((x, y): (f64, f64), extent: f64) -> (f64, f64) {
    (x.clamp(0.0, extent), y.clamp(0.0, extent))
}

// ---------------------------------------------------------------------------
// Events and state
// ---------------------------------------------------------------------------

/// Pointer input, already resolved to a cell and cell-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BrushEvent {
    Start { cell: CellId, at: (f64, f64) },
    Move { cell: CellId, at: (f64, f64) },
    End { cell: CellId },
    /// Drop the selection and show every row.
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Drag {
    /// Drawing a new rectangle from a fixed corner.
    Create { anchor: (f64, f64) },
    /// Moving the existing rectangle.
    Translate { grab: (f64, f64), origin: Rect },
}

/// Which cell owns the brush and what it has selected.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrushState {
    pub active_cell: Option<CellId>,
    pub selection: Option<Rect>,
    drag: Option<Drag>,
}

impl BrushState {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Selection shown in `cell`, if it is the owner.
    pub fn selection_for(&self, cell: CellId) -> Option<Rect> {
        if self.active_cell == Some(cell) {
            self.selection
        } else {
            None
        }
    }
}

/// Brush state plus the hidden flag of every row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewModel {
    pub brush: BrushState,
    pub hidden: Vec<bool>,
}

impl ViewModel {
    pub fn new(row_count: usize) -> Self {
        Self {
            brush: BrushState::default(),
            hidden: vec![false; row_count],
        }
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.iter().filter(|h| **h).count()
    }

    pub fn visible_count(&self) -> usize {
        self.hidden.len() - self.hidden_count()
    }

    pub fn is_hidden(&self, row: usize) -> bool {
        self.hidden.get(row).copied().unwrap_or(false)
    }

    /// Apply one event and return the next state.
    pub fn handle(self, event: BrushEvent, splom: &Splom) -> Self {
        let extent = splom.layout.size;
        let ViewModel { mut brush, mut hidden } = self;
        hidden.resize(splom.row_count(), false);

        match event {
            BrushEvent::Start { cell, at } => {
                if brush.active_cell != Some(cell) {
                    if let Some(prev) = brush.active_cell {
                        log::debug!("Brush moves from cell {prev:?} to {cell:?}");
                    }
                    brush.active_cell = Some(cell);
                    brush.selection = None;
                    hidden.fill(false);
                }
                let at = clamp_point(at, extent);
                brush.drag = match brush.selection {
                    Some(sel) if !sel.is_empty() && sel.contains(at) => Some(Drag::Translate {
                        grab: at,
                        origin: sel,
                    }),
                    _ => {
                        brush.selection = Some(Rect::from_corners(at, at));
                        Some(Drag::Create { anchor: at })
                    }
                };
            }
            BrushEvent::Move { cell, at } => {
                if brush.active_cell != Some(cell) {
                    return ViewModel { brush, hidden };
                }
                let at = clamp_point(at, extent);
                match brush.drag {
                    Some(Drag::Create { anchor }) => {
                        brush.selection = Some(Rect::from_corners(anchor, at));
                    }
                    Some(Drag::Translate { grab, origin }) => {
                        brush.selection =
                            Some(origin.translate_within(at.0 - grab.0, at.1 - grab.1, extent));
                    }
                    None => {}
                }
                hidden = match brush.selection {
                    Some(sel) => hidden_mask(splom, cell, &sel),
                    None => vec![false; splom.row_count()],
                };
            }
            BrushEvent::End { cell } => {
                if brush.active_cell == Some(cell) {
                    brush.drag = None;
                    if brush.selection.map_or(true, |s| s.is_empty()) {
                        brush.selection = None;
                        hidden.fill(false);
                    }
                }
            }
            BrushEvent::Clear => {
                brush.selection = None;
                brush.drag = None;
                hidden.fill(false);
            }
        }

        ViewModel { brush, hidden }
    }
}

/// Hidden flag per row: outside `rect` on either axis under `cell`'s scales.
/// Rows with no position in that cell are hidden.
pub fn hidden_mask(splom: &Splom, cell: CellId, rect: &Rect) -> Vec<bool> {
    let Some(cell) = splom.cell(cell) else {
        return vec![false; splom.row_count()];
    };
    let mask: Vec<bool> = splom
        .points(cell)
        .into_iter()
        .map(|p| p.map_or(true, |p| !rect.contains(p)))
        .collect();
    log::debug!(
        "Brush on ({}, {}) hides {} of {} rows",
        cell.x,
        cell.y,
        mask.iter().filter(|h| **h).count(),
        mask.len()
    );
    mask
}
