//! SVG rendering for segmentations and their traces.

use std::fmt::Write;

use mumseg_core::grid::cells;
use mumseg_core::{Segmentation, Traces};

/// SVG rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Side length of one grid cell, in pixels
    pub cell_size: f64,
    /// Stroke width for frontier outlines
    pub stroke_width: f64,
    /// Whether to outline frontier cells
    pub show_frontier: bool,
    /// Height of the trace plot below the grid (0 disables it)
    pub trace_height: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { cell_size: 10.0, stroke_width: 1.0, show_frontier: true, trace_height: 120.0 }
    }
}

const FOREGROUND: &str = "#222222";
const BACKGROUND: &str = "#ffffff";
const FRONTIER: &str = "#e41a1c";
/// Trace colors: |grad w|, |grad phi|, functional
const TRACE_COLORS: &[&str] = &["#377eb8", "#4daf4a", "#984ea3"];

/// Render the binarized level set (`phi > 0` dark), frontier outlines, and traces.
pub fn render_svg(seg: &Segmentation, config: &RenderConfig) -> String {
    let (rows, cols) = seg.phi.shape();
    let width = cols as f64 * config.cell_size;
    let grid_height = rows as f64 * config.cell_size;
    let show_traces = config.trace_height > 0.0 && !seg.traces.is_empty();
    let height = grid_height + if show_traces { config.trace_height } else { 0.0 };

    let mut svg = String::new();

    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, height, width, height
    ).unwrap();

    writeln!(
        &mut svg,
        r#"  <rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        width, grid_height, BACKGROUND
    ).unwrap();

    let binarized = seg.binarized_phi();
    for pixel in cells((rows, cols)).filter(|p| binarized[p.idx()] > 0.0) {
        writeln!(
            &mut svg,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            pixel.col as f64 * config.cell_size,
            pixel.row as f64 * config.cell_size,
            config.cell_size,
            config.cell_size,
            FOREGROUND
        ).unwrap();
    }

    if config.show_frontier {
        let inset = config.stroke_width / 2.0;
        for pixel in seg.frontier.iter() {
            writeln!(
                &mut svg,
                r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                pixel.col as f64 * config.cell_size + inset,
                pixel.row as f64 * config.cell_size + inset,
                config.cell_size - 2.0 * inset,
                config.cell_size - 2.0 * inset,
                FRONTIER,
                config.stroke_width
            ).unwrap();
        }
    }

    if show_traces {
        let area = PlotArea { x0: 0.0, y0: grid_height, width, height: config.trace_height };
        render_traces(&mut svg, &seg.traces, &area, config.stroke_width);
    }

    writeln!(&mut svg, "</svg>").unwrap();

    svg
}

/// Append one polyline per trace, each scaled to its own finite range.
/// Region of the canvas a trace plot is scaled into.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    x0: f64,
    y0: f64,
    width: f64,
    height: f64,
}

fn render_traces(svg: &mut String, traces: &Traces, area: &PlotArea, stroke_width: f64) {
    let series: [&[f64]; 3] = [&traces.norm_grad_w, &traces.norm_grad_phi, &traces.functional];
    for (values, color) in series.iter().zip(TRACE_COLORS) {
        if let Some(points) = polyline_points(values, area) {
            writeln!(
                svg,
                r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                points, color, stroke_width
            ).unwrap();
        }
    }
}

/// SVG `points` attribute for `values`, skipping non-finite entries.
fn polyline_points(values: &[f64], area: &PlotArea) -> Option<String> {
    let finite: Vec<(usize, f64)> =
        values.iter().copied().enumerate().filter(|(_, v)| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let min = finite.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = finite.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };
    let dx = if values.len() > 1 { area.width / (values.len() - 1) as f64 } else { 0.0 };

    let mut points = String::new();
    for (idx, (step, v)) in finite.iter().enumerate() {
        if idx > 0 {
            points.push(' ');
        }
        let x = area.x0 + *step as f64 * dx;
        let y = area.y0 + area.height - (v - min) / range * area.height;
        write!(&mut points, "{},{}", x, y).unwrap();
    }
    Some(points)
}
