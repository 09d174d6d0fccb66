//! SVG scene graph for the matrix.
//!
//! The document mirrors the structure a browser SPLOM builds: a root group
//! shifted by the padding, one `x axis` group per column, one `y axis` group
//! per row, then one `cell` group per metric pair holding a frame, the
//! circles, an optional diagonal label and the brush rectangles. Rows hidden
//! by the brush carry `class="hidden"`.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::brush::ViewModel;
use crate::color::to_hex;
use crate::layout::Cell;
use crate::splom::Splom;

const STYLE: &str = "\
.axis, .frame { shape-rendering: crispEdges; }
.axis line { stroke: #ddd; }
.axis path { display: none; }
.axis text { font: 10px sans-serif; fill: #000; }
.cell text { font: bold 10px sans-serif; text-transform: capitalize; }
.frame { fill: none; stroke: #aaa; }
circle { fill-opacity: .7; }
circle.hidden { fill: #ccc !important; }
.brush .overlay { fill: none; pointer-events: all; cursor: crosshair; }
.brush .selection { fill: #777; fill-opacity: .3; stroke: #fff; shape-rendering: crispEdges; }";

/// Render the matrix with the given highlight state.
pub fn render_svg(splom: &Splom, view: &ViewModel) -> String {
    let layout = &splom.layout;
    let total = layout.total_size();
    let (ox, oy) = layout.origin();

    let mut svg = String::new();

    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
        num(total),
        num(total),
        num(total),
        num(total)
    );
    let _ = writeln!(svg, "<style>\n{STYLE}\n</style>");
    let _ = writeln!(svg, "<g transform=\"translate({},{})\">", num(ox), num(oy));

    for (i, metric) in splom.metrics.iter().enumerate() {
        write_x_axis(&mut svg, splom, i, metric);
    }
    for (j, metric) in splom.metrics.iter().enumerate() {
        write_y_axis(&mut svg, splom, j, metric);
    }
    for cell in &splom.cells {
        write_cell(&mut svg, splom, view, cell);
    }

    let _ = writeln!(svg, "</g>");
    let _ = writeln!(svg, "</svg>");
    svg
}

/// Render and write to `path`, creating parent directories.
pub fn write_svg(splom: &Splom, view: &ViewModel, path: &Path) -> Result<()> {
    let markup = render_svg(splom, view);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, markup).with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Wrote {}x{} matrix to {} ({} of {} rows visible)",
        splom.metrics.len(),
        splom.metrics.len(),
        path.display(),
        view.visible_count(),
        splom.row_count()
    );
    Ok(())
}

// ---- helpers ----------------------------------------------------------------

/// Bottom axis for metric `i`; tick lines run up through every row.
fn write_x_axis(svg: &mut String, splom: &Splom, i: usize, metric: &str) {
    let layout = &splom.layout;
    let Some(domain) = splom.domains.get(metric) else { return };
    let scale = layout.x_scale(*domain);
    let tick = layout.tick_size();
    let (r0, r1) = scale.range;

    let _ = writeln!(
        svg,
        "<g class=\"x axis\" transform=\"translate({},0)\" text-anchor=\"middle\">",
        num(layout.column_x(i))
    );
    let _ = writeln!(
        svg,
        "<path class=\"domain\" d=\"M{},{}V0H{}V{}\"/>",
        num(r0),
        num(tick),
        num(r1),
        num(tick)
    );
    for (value, label) in scale.tick_labels(splom.ticks) {
        let _ = writeln!(
            svg,
            "<g class=\"tick\" transform=\"translate({},0)\"><line y2=\"{}\"/><text y=\"{}\" dy=\"0.71em\">{}</text></g>",
            num(scale.apply(value)),
            num(tick),
            num(tick + 3.0),
            escape(&label)
        );
    }
    let _ = writeln!(svg, "</g>");
}

/// Left axis for metric `j`; tick lines run right through every column.
fn write_y_axis(svg: &mut String, splom: &Splom, j: usize, metric: &str) {
    let layout = &splom.layout;
    let Some(domain) = splom.domains.get(metric) else { return };
    let scale = layout.y_scale(*domain);
    let tick = layout.tick_size();
    let (r0, r1) = scale.range;

    let _ = writeln!(
        svg,
        "<g class=\"y axis\" transform=\"translate(0,{})\" text-anchor=\"end\">",
        num(layout.row_y(j))
    );
    let _ = writeln!(
        svg,
        "<path class=\"domain\" d=\"M{},{}H0V{}H{}\"/>",
        num(tick),
        num(r0),
        num(r1),
        num(tick)
    );
    for (value, label) in scale.tick_labels(splom.ticks) {
        let _ = writeln!(
            svg,
            "<g class=\"tick\" transform=\"translate(0,{})\"><line x2=\"{}\"/><text x=\"-3\" dy=\"0.32em\">{}</text></g>",
            num(scale.apply(value)),
            num(tick),
            escape(&label)
        );
    }
    let _ = writeln!(svg, "</g>");
}

fn write_cell(svg: &mut String, splom: &Splom, view: &ViewModel, cell: &Cell) {
    let layout = &splom.layout;
    let (cx, cy) = layout.cell_origin(cell);
    let (fx, fy, fw, fh) = layout.frame();

    let _ = writeln!(
        svg,
        "<g class=\"cell\" transform=\"translate({},{})\">",
        num(cx),
        num(cy)
    );
    let _ = writeln!(
        svg,
        "<rect class=\"frame\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
        num(fx),
        num(fy),
        num(fw),
        num(fh)
    );

    for (row, point) in splom.points(cell).into_iter().enumerate() {
        let Some((px, py)) = point else { continue };
        let class = if view.is_hidden(row) { " class=\"hidden\"" } else { "" };
        let _ = writeln!(
            svg,
            "<circle{class} cx=\"{}\" cy=\"{}\" r=\"{}\" style=\"fill: {};\"/>",
            num(px),
            num(py),
            num(splom.point_radius),
            to_hex(splom.row_color(row))
        );
    }

    if cell.is_diagonal() {
        let _ = writeln!(
            svg,
            "<text x=\"{}\" y=\"{}\" dy=\".71em\">{}</text>",
            num(layout.padding),
            num(layout.padding),
            escape(&cell.x)
        );
    }

    let size = num(layout.size);
    let _ = writeln!(svg, "<g class=\"brush\">");
    let _ = writeln!(
        svg,
        "<rect class=\"overlay\" x=\"0\" y=\"0\" width=\"{size}\" height=\"{size}\"/>"
    );
    if let Some(sel) = view.brush.selection_for(cell.id()).filter(|s| !s.is_empty()) {
        let _ = writeln!(
            svg,
            "<rect class=\"selection\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
            num(sel.x0),
            num(sel.y0),
            num(sel.width()),
            num(sel.height())
        );
    }
    let _ = writeln!(svg, "</g>");
    let _ = writeln!(svg, "</g>");
}

/// Up to three decimals, trailing zeros trimmed.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
