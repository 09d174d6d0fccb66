use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2,
};

use crate::brush::BrushEvent;
use crate::color::Rgb;
use crate::layout::{CellId, GridLayout};
use crate::state::AppState;

const HIDDEN_COLOR: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
const POINT_ALPHA: u8 = 178;
/// Room below the matrix for the bottom tick labels.
const LABEL_MARGIN: f32 = 18.0;

fn to_color32(c: Rgb, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(c.red, c.green, c.blue, alpha)
}

// ---------------------------------------------------------------------------
// Scatterplot matrix (central panel)
// ---------------------------------------------------------------------------

/// Render the matrix in the central panel and route pointer input to the brush.
pub fn splom_view(ui: &mut Ui, state: &mut AppState) {
    if state.splom.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a table to plot  (File → Open…)");
        });
        return;
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let events = paint_matrix(ui, state);
            for event in events {
                state.brush(event);
            }
        });
}

/// Paint everything, then translate this frame's pointer input into events.
fn paint_matrix(ui: &mut Ui, state: &AppState) -> Vec<BrushEvent> {
    let Some(splom) = &state.splom else {
        return Vec::new();
    };
    let layout = splom.layout;
    let total = layout.total_size() as f32;
    let (response, painter) =
        ui.allocate_painter(Vec2::new(total, total + LABEL_MARGIN), Sense::click_and_drag());

    let (ox, oy) = layout.origin();
    let origin = response.rect.min + Vec2::new(ox as f32, oy as f32);
    let tick = layout.tick_size() as f32;

    let visuals = ui.visuals();
    let grid_stroke = Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color);
    let text_color = visuals.text_color();
    let frame_stroke = Stroke::new(1.0, visuals.weak_text_color());
    let font = FontId::proportional(10.0);

    // ---- Border axes: tick lines span the whole matrix ----
    for (i, metric) in splom.metrics.iter().enumerate() {
        let Some(domain) = splom.domains.get(metric) else { continue };
        let scale = layout.x_scale(*domain);
        let left = origin.x + layout.column_x(i) as f32;
        for (value, label) in scale.tick_labels(splom.ticks) {
            let x = left + scale.apply(value) as f32;
            painter.line_segment([Pos2::new(x, origin.y), Pos2::new(x, origin.y + tick)], grid_stroke);
            painter.text(
                Pos2::new(x, origin.y + tick + 3.0),
                Align2::CENTER_TOP,
                label,
                font.clone(),
                text_color,
            );
        }
    }
    for (j, metric) in splom.metrics.iter().enumerate() {
        let Some(domain) = splom.domains.get(metric) else { continue };
        let scale = layout.y_scale(*domain);
        let top = origin.y + layout.row_y(j) as f32;
        for (value, label) in scale.tick_labels(splom.ticks) {
            let y = top + scale.apply(value) as f32;
            painter.line_segment([Pos2::new(origin.x, y), Pos2::new(origin.x + tick, y)], grid_stroke);
            painter.text(
                Pos2::new(origin.x - 3.0, y),
                Align2::RIGHT_CENTER,
                label,
                font.clone(),
                text_color,
            );
        }
    }

    // ---- Cells ----
    let (fx, fy, fw, fh) = layout.frame();
    let radius = splom.point_radius as f32;
    for cell in &splom.cells {
        let (cx, cy) = layout.cell_origin(cell);
        let cell_min = origin + Vec2::new(cx as f32, cy as f32);

        let frame = Rect::from_min_size(
            cell_min + Vec2::new(fx as f32, fy as f32),
            Vec2::new(fw as f32, fh as f32),
        );
        painter.rect_stroke(frame, 0.0, frame_stroke, StrokeKind::Inside);

        // Hidden points first so the selected ones stay on top.
        let points = splom.points(cell);
        for pass_hidden in [true, false] {
            for (row, point) in points.iter().enumerate() {
                let Some((px, py)) = point else { continue };
                if state.view.is_hidden(row) != pass_hidden {
                    continue;
                }
                let color = if pass_hidden {
                    HIDDEN_COLOR
                } else {
                    to_color32(splom.row_color(row), POINT_ALPHA)
                };
                painter.circle_filled(cell_min + Vec2::new(*px as f32, *py as f32), radius, color);
            }
        }

        if cell.is_diagonal() {
            painter.text(
                cell_min + Vec2::splat(layout.padding as f32),
                Align2::LEFT_TOP,
                &cell.x,
                FontId::proportional(12.0),
                text_color,
            );
        }

        if let Some(sel) = state.view.brush.selection_for(cell.id()).filter(|s| !s.is_empty()) {
            let rect = Rect::from_min_max(
                cell_min + Vec2::new(sel.x0 as f32, sel.y0 as f32),
                cell_min + Vec2::new(sel.x1 as f32, sel.y1 as f32),
            );
            painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(0x77, 0x77, 0x77, 77));
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::WHITE), StrokeKind::Inside);
        }
    }

    // ---- Data readout under the pointer ----
    if let Some(pos) = response.hover_pos() {
        let (x, y) = ((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
        if let Some(cell) = layout.cell_at(x, y).and_then(|id| splom.cell(id)) {
            if let Some((sx, sy)) = splom.scales(cell) {
                let (cx, cy) = layout.cell_origin(cell);
                let readout = format!(
                    "{}: {:.2}\n{}: {:.2}",
                    cell.x,
                    sx.invert(x - cx),
                    cell.y,
                    sy.invert(y - cy)
                );
                painter.text(
                    pos + Vec2::new(12.0, 12.0),
                    Align2::LEFT_TOP,
                    readout,
                    FontId::monospace(10.0),
                    text_color,
                );
            }
        }
    }

    if state.view.brush.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    }

    pointer_events(ui, &response, origin, &layout, state.view.brush.active_cell)
}

fn pointer_events(
    ui: &Ui,
    response: &egui::Response,
    origin: Pos2,
    layout: &GridLayout,
    active_cell: Option<CellId>,
) -> Vec<BrushEvent> {
    let mut events = Vec::new();

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        events.push(BrushEvent::Clear);
    }

    let local = |pos: Pos2| -> (f64, f64) { ((pos.x - origin.x) as f64, (pos.y - origin.y) as f64) };
    let pointer = response.interact_pointer_pos().map(local);

    if response.drag_started() || response.clicked() {
        // egui reports a drag only after the pointer has travelled a few
        // pixels, so anchor on where the button went down.
        let press = ui.input(|i| i.pointer.press_origin()).map(local).or(pointer);
        let started = gesture_start(layout, press, pointer, response.clicked());
        if !started.is_empty() {
            events.extend(started);
            return events;
        }
    }

    // Once started, the drag stays with its cell even if the pointer leaves it.
    let Some(cell) = active_cell else {
        return events;
    };
    if response.dragged() {
        if let Some(p) = pointer {
            events.push(BrushEvent::Move { cell, at: in_cell(layout, cell, p) });
        }
    }
    if response.drag_stopped() {
        events.push(BrushEvent::End { cell });
    }
    events
}

/// Matrix coordinates to coordinates local to `cell`.
fn in_cell(layout: &GridLayout, cell: CellId, (x, y): (f64, f64)) -> (f64, f64) {
    (x - layout.column_x(cell.0), y - layout.row_y(cell.1))
}

/// Events for a press at `press` (matrix coordinates). A drag also catches
/// the rectangle up to the pointer's current position `now`.
fn gesture_start(
    layout: &GridLayout,
    press: Option<(f64, f64)>,
    now: Option<(f64, f64)>,
    clicked: bool,
) -> Vec<BrushEvent> {
    let Some((x, y)) = press else {
        return Vec::new();
    };
    let Some(cell) = layout.cell_at(x, y) else {
        return Vec::new();
    };
    let mut events = vec![BrushEvent::Start { cell, at: in_cell(layout, cell, (x, y)) }];
    if clicked {
        events.push(BrushEvent::End { cell });
    } else if let Some(p) = now {
        events.push(BrushEvent::Move { cell, at: in_cell(layout, cell, p) });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(2, 230.0, 20.0)
    }

    #[test]
    fn drag_anchors_where_the_button_went_down() {
        // Pressed at (40, 250), egui reports the drag once the pointer is at (46, 256).
        let events = gesture_start(&layout(), Some((40.0, 250.0)), Some((46.0, 256.0)), false);
        assert_eq!(
            events,
            vec![
                BrushEvent::Start { cell: (1, 1), at: (40.0, 20.0) },
                BrushEvent::Move { cell: (1, 1), at: (46.0, 26.0) },
            ]
        );
    }

    #[test]
    fn click_starts_and_ends_in_place() {
        let events = gesture_start(&layout(), Some((300.0, 10.0)), Some((300.0, 10.0)), true);
        assert_eq!(
            events,
            vec![
                BrushEvent::Start { cell: (0, 0), at: (70.0, 10.0) },
                BrushEvent::End { cell: (0, 0) },
            ]
        );
    }

    #[test]
    fn press_outside_the_grid_starts_nothing() {
        assert!(gesture_start(&layout(), Some((-5.0, 10.0)), None, false).is_empty());
        assert!(gesture_start(&layout(), None, Some((10.0, 10.0)), false).is_empty());
    }
}
