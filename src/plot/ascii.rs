//! ASCII/Unicode chart rendering for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - scatter points: `o`
//! - line segments: `-`
//! - bar/histogram fills: `#`
//! - box plots: `|---[==|==]---|` per category row

use crate::domain::{AggregatedSeries, ChartKind, SeriesData};
use crate::stats::quantile;

/// Render one series as a fixed-size text chart.
pub fn render_series(series: &AggregatedSeries, width: usize, height: usize) -> String {
    if series.data.is_empty() {
        return format!("{}: (empty series)\n", series.kind.display_name());
    }

    match &series.data {
        SeriesData::Xy { x, y, ticks } => render_xy(series, x, y, ticks, width, height),
        SeriesData::Histogram { edges, counts } => {
            render_histogram(series, edges, counts, width, height)
        }
        SeriesData::Grouped { groups } => render_box(series, groups, width),
        SeriesData::Pie { labels, counts } => render_pie(series, labels, counts, width),
    }
}

fn render_xy(
    series: &AggregatedSeries,
    xs: &[f64],
    ys: &[f64],
    ticks: &[(f64, String)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = value_range(xs) else {
        return format!("{}: (empty series)\n", series.kind.display_name());
    };
    let Some((y_min, y_max)) = value_range(ys) else {
        return format!("{}: (empty series)\n", series.kind.display_name());
    };

    // Bars grow from zero, so the y range must include the baseline.
    let (y_min, y_max) = if series.kind == ChartKind::Bar {
        (y_min.min(0.0), y_max.max(0.0))
    } else {
        (y_min, y_max)
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    match series.kind {
        ChartKind::Line => {
            let mut prev: Option<(usize, usize)> = None;
            for (&xv, &yv) in xs.iter().zip(ys) {
                let x = map_x(xv, x_min, x_max, width);
                let y = map_y(yv, y_min, y_max, height);
                if let Some((x0, y0)) = prev {
                    draw_line(&mut grid, x0, y0, x, y, '-');
                }
                prev = Some((x, y));
            }
            for (&xv, &yv) in xs.iter().zip(ys) {
                let x = map_x(xv, x_min, x_max, width);
                let y = map_y(yv, y_min, y_max, height);
                grid[y][x] = 'o';
            }
        }
        ChartKind::Bar => {
            let base = map_y(0.0, y_min, y_max, height);
            for (&xv, &yv) in xs.iter().zip(ys) {
                let x = map_x(xv, x_min, x_max, width);
                let top = map_y(yv, y_min, y_max, height);
                let (lo, hi) = if top <= base { (top, base) } else { (base, top) };
                for row in grid.iter_mut().take(hi + 1).skip(lo) {
                    row[x] = '#';
                }
            }
        }
        _ => {
            for (&xv, &yv) in xs.iter().zip(ys) {
                let x = map_x(xv, x_min, x_max, width);
                let y = map_y(yv, y_min, y_max, height);
                grid[y][x] = 'o';
            }
        }
    }

    let mut out = format!(
        "{}: {}=[{x_min:.3}, {x_max:.3}] | {}=[{y_min:.2}, {y_max:.2}]\n",
        series.kind.display_name(),
        series.x_label,
        series.y_label,
    );
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if !ticks.is_empty() {
        let labels: Vec<&str> = ticks.iter().take(6).map(|(_, l)| l.as_str()).collect();
        out.push_str(&format!("x: {}\n", labels.join(", ")));
        if ticks.len() > 6 {
            out.push_str(&format!("   ... {} more tick(s)\n", ticks.len() - 6));
        }
    }
    out
}

fn render_histogram(
    series: &AggregatedSeries,
    edges: &[f64],
    counts: &[usize],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let bins = counts.len();
    let max_count = counts.iter().copied().max().unwrap_or(0);
    if bins == 0 || max_count == 0 {
        return format!("{}: (empty series)\n", series.kind.display_name());
    }

    let mut grid = vec![vec![' '; width]; height];
    for col in 0..width {
        let bin = col * bins / width;
        let count = counts[bin];
        // Rows filled proportionally; any nonzero count shows at least one cell.
        let mut fill = (count as f64 / max_count as f64 * height as f64).round() as usize;
        if count > 0 {
            fill = fill.max(1);
        }
        for row in 0..fill {
            grid[height - 1 - row][col] = '#';
        }
    }

    let lo = edges.first().copied().unwrap_or(0.0);
    let hi = edges.last().copied().unwrap_or(0.0);
    let mut out = format!(
        "{}: {}=[{lo:.3}, {hi:.3}] | bins={bins} | peak={max_count}\n",
        series.kind.display_name(),
        series.x_label,
    );
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn render_box(series: &AggregatedSeries, groups: &[(String, Vec<f64>)], width: usize) -> String {
    let width = width.max(40);
    // Box rows share one numeric scale across all groups.
    let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let Some((lo, hi)) = value_range(&all) else {
        return format!("{}: (empty series)\n", series.kind.display_name());
    };
    let (lo, hi) = pad_range(lo, hi, 0.05);

    let label_width = groups
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 16);
    let scale_width = width.saturating_sub(label_width + 2).max(20);

    let mut out = format!(
        "{}: {} by {} | {}=[{lo:.2}, {hi:.2}]\n",
        series.kind.display_name(),
        series.y_label,
        series.x_label,
        series.y_label,
    );

    for (name, values) in groups {
        if values.is_empty() {
            continue;
        }
        let mut row = vec![' '; scale_width];

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let q1 = quantile(values, 0.25).unwrap_or(min);
        let med = quantile(values, 0.5).unwrap_or(min);
        let q3 = quantile(values, 0.75).unwrap_or(max);

        let c_min = map_x(min, lo, hi, scale_width);
        let c_q1 = map_x(q1, lo, hi, scale_width);
        let c_med = map_x(med, lo, hi, scale_width);
        let c_q3 = map_x(q3, lo, hi, scale_width);
        let c_max = map_x(max, lo, hi, scale_width);

        for cell in row.iter_mut().take(c_max + 1).skip(c_min) {
            *cell = '-';
        }
        for cell in row.iter_mut().take(c_q3 + 1).skip(c_q1) {
            *cell = '=';
        }
        row[c_min] = '|';
        row[c_max] = '|';
        row[c_q1] = '[';
        row[c_q3] = ']';
        row[c_med] = '|';

        out.push_str(&format!(
            "{:<label_width$}  {}  n={}\n",
            truncate(name, label_width),
            row.into_iter().collect::<String>(),
            values.len(),
        ));
    }

    out
}

fn render_pie(
    series: &AggregatedSeries,
    labels: &[String],
    counts: &[usize],
    width: usize,
) -> String {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return format!("{}: (empty series)\n", series.kind.display_name());
    }
    let bar_width = width.saturating_sub(24).max(10);

    let mut out = format!(
        "{}: {} | total={total}\n",
        series.kind.display_name(),
        series.x_label,
    );
    for (label, &count) in labels.iter().zip(counts) {
        let share = count as f64 / total as f64;
        let fill = (share * bar_width as f64).round() as usize;
        out.push_str(&format!(
            "{:<12} {:<bar_width$} {:>5.1}% ({count})\n",
            truncate(label, 12),
            "#".repeat(fill),
            share * 100.0,
        ));
    }
    out
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(v: f64, min: f64, max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = if max > min {
        ((v - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, min: f64, max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = if max > min {
        ((v - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregatedSeries, ChartKind, SeriesData};

    fn xy(kind: ChartKind, x: Vec<f64>, y: Vec<f64>) -> AggregatedSeries {
        AggregatedSeries {
            kind,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            data: SeriesData::Xy {
                x,
                y,
                ticks: Vec::new(),
            },
        }
    }

    #[test]
    fn scatter_golden_snapshot_small() {
        let series = xy(ChartKind::Scatter, vec![1.0, 10.0], vec![100.0, 110.0]);
        let txt = render_series(&series, 10, 5);
        let expected = concat!(
            "scatter: x=[1.000, 10.000] | y=[99.50, 110.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn bar_fills_columns_down_to_the_baseline() {
        let series = xy(ChartKind::Bar, vec![0.0, 1.0], vec![1.0, 2.0]);
        let txt = render_series(&series, 10, 5);
        // The taller bar reaches higher than the shorter one; both hit the
        // bottom row (the zero baseline).
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[4].starts_with('#'));
        assert!(rows[4].ends_with('#'));
        assert!(rows[0].ends_with('#'));
        assert!(!rows[0].starts_with('#'));
    }

    #[test]
    fn pie_shares_sum_to_one_hundred_percent() {
        let series = AggregatedSeries {
            kind: ChartKind::Pie,
            x_label: "c".to_string(),
            y_label: "count".to_string(),
            data: SeriesData::Pie {
                labels: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                counts: vec![2, 1, 3],
            },
        };
        let txt = render_series(&series, 40, 5);
        assert!(txt.starts_with("pie: c | total=6\n"));
        assert!(txt.contains("33.3% (2)"));
        assert!(txt.contains("16.7% (1)"));
        assert!(txt.contains("50.0% (3)"));
        // Slice order is first appearance, not count-sorted.
        let a_pos = txt.find("(2)").unwrap();
        let c_pos = txt.find("(3)").unwrap();
        assert!(a_pos < c_pos);
    }

    #[test]
    fn box_rows_mark_quartiles() {
        let series = AggregatedSeries {
            kind: ChartKind::Box,
            x_label: "g".to_string(),
            y_label: "v".to_string(),
            data: SeriesData::Grouped {
                groups: vec![("a".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0])],
            },
        };
        let txt = render_series(&series, 60, 5);
        assert!(txt.contains("n=5"));
        assert!(txt.contains('['));
        assert!(txt.contains(']'));
    }

    #[test]
    fn empty_series_renders_a_notice() {
        let series = xy(ChartKind::Line, Vec::new(), Vec::new());
        assert_eq!(render_series(&series, 40, 10), "line: (empty series)\n");
    }
}
