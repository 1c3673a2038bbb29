//! Plotters-powered series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. Box and pie charts are not drawn here; the TUI
//! falls back to the ASCII renderer for those.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{AggregatedSeries, ChartKind, SeriesData};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// in `from_series`, outside the render call. This keeps `render()` focused on
/// drawing and makes the data prep testable separately.
pub struct SeriesChart {
    kind: ChartKind,
    /// Scatter/line points.
    points: Vec<(f64, f64)>,
    /// Bars as (x0, x1, height), for bar charts and histograms.
    bars: Vec<(f64, f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: String,
    y_label: String,
    /// Tick labels for categorical/date x positions.
    ticks: Vec<(f64, String)>,
}

impl SeriesChart {
    /// Build the drawable description, or `None` for kinds the widget does
    /// not draw (box, pie).
    pub fn from_series(series: &AggregatedSeries) -> Option<Self> {
        match &series.data {
            SeriesData::Xy { x, y, ticks } if series.kind == ChartKind::Bar => {
                if x.is_empty() {
                    return None;
                }
                let half = bar_half_width(x);
                let bars: Vec<(f64, f64, f64)> =
                    x.iter().zip(y).map(|(&xv, &yv)| (xv - half, xv + half, yv)).collect();

                let (x_min, x_max) = bounds(x)?;
                let (y_min, y_max) = bounds(y)?;
                Some(Self {
                    kind: series.kind,
                    points: Vec::new(),
                    bars,
                    x_bounds: pad([x_min - half, x_max + half]),
                    y_bounds: pad([y_min.min(0.0), y_max.max(0.0)]),
                    x_label: series.x_label.clone(),
                    y_label: series.y_label.clone(),
                    ticks: ticks.clone(),
                })
            }
            SeriesData::Xy { x, y, ticks } => {
                if x.is_empty() {
                    return None;
                }
                let (x_min, x_max) = bounds(x)?;
                let (y_min, y_max) = bounds(y)?;
                Some(Self {
                    kind: series.kind,
                    points: x.iter().copied().zip(y.iter().copied()).collect(),
                    bars: Vec::new(),
                    x_bounds: pad([x_min, x_max]),
                    y_bounds: pad([y_min, y_max]),
                    x_label: series.x_label.clone(),
                    y_label: series.y_label.clone(),
                    ticks: ticks.clone(),
                })
            }
            SeriesData::Histogram { edges, counts } => {
                if counts.is_empty() {
                    return None;
                }
                let bars: Vec<(f64, f64, f64)> = edges
                    .windows(2)
                    .zip(counts)
                    .map(|(w, &c)| (w[0], w[1], c as f64))
                    .collect();
                let max_count = counts.iter().copied().max().unwrap_or(0) as f64;
                Some(Self {
                    kind: series.kind,
                    points: Vec::new(),
                    bars,
                    x_bounds: pad([edges[0], edges[edges.len() - 1]]),
                    y_bounds: [0.0, max_count * 1.05],
                    x_label: series.x_label.clone(),
                    y_label: series.y_label.clone(),
                    ticks: Vec::new(),
                })
            }
            SeriesData::Grouped { .. } | SeriesData::Pie { .. } => None,
        }
    }
}

impl Widget for SeriesChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let ticks = self.ticks;
        let fmt_x = move |v: &f64| format_x_tick(*v, &ticks);

        let points = self.points;
        let bars = self.bars;
        let kind = self.kind;
        let x_label = self.x_label;
        let y_label = self.y_label;

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering; axes + labels are enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(x_label.as_str())
                .y_desc(y_label.as_str())
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&|v| format_number(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Series styling: keep the palette high-contrast for terminal
            // readability.
            let series_color = RGBColor(0, 255, 255); // cyan

            match kind {
                ChartKind::Line => {
                    chart.draw_series(LineSeries::new(points.iter().copied(), &series_color))?;
                }
                ChartKind::Scatter => {
                    // Colored `Pixel`s give clean dots in terminals; `Circle`
                    // radii map incorrectly through the ratatui backend.
                    chart.draw_series(
                        points.iter().map(|&(x, y)| Pixel::new((x, y), series_color)),
                    )?;
                }
                _ => {
                    chart.draw_series(bars.iter().map(|&(bx0, bx1, h)| {
                        let (lo, hi) = if h < 0.0 { (h, 0.0) } else { (0.0, h) };
                        Rectangle::new([(bx0, lo), (bx1, hi)], series_color.filled())
                    }))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

fn pad(b: [f64; 2]) -> [f64; 2] {
    let span = b[1] - b[0];
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    [b[0] - pad, b[1] + pad]
}

/// Half-width for bars on an Xy axis: half the smallest gap between distinct
/// x positions, with a sane default for a single bar.
fn bar_half_width(xs: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let min_gap = sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|g| *g > 0.0)
        .fold(f64::INFINITY, f64::min);
    if min_gap.is_finite() {
        min_gap * 0.4
    } else {
        0.4
    }
}

/// Nearest tick label within a small tolerance, else a plain number.
fn format_x_tick(v: f64, ticks: &[(f64, String)]) -> String {
    let nearest = ticks
        .iter()
        .min_by(|a, b| {
            (a.0 - v)
                .abs()
                .partial_cmp(&(b.0 - v).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .filter(|(pos, _)| (pos - v).abs() < 0.5);
    match nearest {
        Some((_, label)) => label.clone(),
        None => format_number(v),
    }
}

fn format_number(v: f64) -> String {
    if v.abs() >= 1000.0 || v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_series(kind: ChartKind, x: Vec<f64>, y: Vec<f64>) -> AggregatedSeries {
        AggregatedSeries {
            kind,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            data: SeriesData::Xy {
                x,
                y,
                ticks: vec![(0.0, "a".to_string()), (1.0, "b".to_string())],
            },
        }
    }

    #[test]
    fn bar_series_becomes_rectangles_with_zero_baseline() {
        let chart =
            SeriesChart::from_series(&xy_series(ChartKind::Bar, vec![0.0, 1.0], vec![2.0, 4.0]))
                .unwrap();
        assert_eq!(chart.bars.len(), 2);
        assert!(chart.y_bounds[0] <= 0.0);
        // Bars don't overlap: each half-width is under half the gap.
        assert!(chart.bars[0].1 < chart.bars[1].0);
    }

    #[test]
    fn box_and_pie_are_not_drawable_here() {
        let series = AggregatedSeries {
            kind: ChartKind::Pie,
            x_label: "c".to_string(),
            y_label: "count".to_string(),
            data: SeriesData::Pie {
                labels: vec!["a".to_string()],
                counts: vec![1],
            },
        };
        assert!(SeriesChart::from_series(&series).is_none());
    }

    #[test]
    fn tick_labels_resolve_by_proximity() {
        let ticks = vec![(0.0, "north".to_string()), (1.0, "south".to_string())];
        assert_eq!(format_x_tick(0.1, &ticks), "north");
        assert_eq!(format_x_tick(0.9, &ticks), "south");
        assert_eq!(format_x_tick(7.0, &ticks), "7");
    }
}
