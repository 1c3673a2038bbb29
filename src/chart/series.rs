//! Per-kind series construction.
//!
//! Rows with a null in any involved column are skipped before grouping, so
//! empty groups never appear in the output. Category order is first-seen;
//! date-group order is chronological.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{AggregatedSeries, Aggregation, ChartKind, ColumnType, SeriesData};
use crate::error::ExploreError;
use crate::stats::{auto_bin_edges, bin_index, histogram_counts};
use crate::table::{Column, Table};

/// How grouped y values collapse to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    Mean,
    Sum,
}

impl Reduce {
    fn apply(self, values: &[f64]) -> f64 {
        let sum: f64 = values.iter().sum();
        match self {
            Reduce::Sum => sum,
            Reduce::Mean => sum / values.len() as f64,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Reduce::Mean => "mean",
            Reduce::Sum => "sum",
        }
    }
}

/// What to do with a numeric (non-temporal) x column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericX {
    /// Bucket into auto-sized bins; the bin index is the effective x (scatter).
    Binned,
    /// Use raw values in original row order (line/bar).
    Raw,
}

/// Date-group key; `Ord` gives chronological ascending iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey {
    Year(i32),
    Month(i32, u32),
    Day(NaiveDate),
}

impl DateKey {
    fn of(date: NaiveDate, agg: Aggregation) -> Option<DateKey> {
        match agg {
            Aggregation::Yearly => Some(DateKey::Year(date.year())),
            Aggregation::Monthly => Some(DateKey::Month(date.year(), date.month())),
            Aggregation::Daily => Some(DateKey::Day(date)),
            Aggregation::None => None,
        }
    }

    /// Effective x coordinate, keeping chronological spacing.
    fn coordinate(self) -> f64 {
        match self {
            DateKey::Year(y) => y as f64,
            DateKey::Month(y, m) => y as f64 + (m as f64 - 1.0) / 12.0,
            DateKey::Day(d) => day_number(d),
        }
    }

    fn label(self) -> String {
        match self {
            DateKey::Year(y) => y.to_string(),
            DateKey::Month(y, m) => format!("{y:04}-{m:02}"),
            DateKey::Day(d) => d.to_string(),
        }
    }
}

fn day_number(d: NaiveDate) -> f64 {
    d.num_days_from_ce() as f64
}

/// Shared x/y builder for scatter, line, and bar.
pub fn xy_series(
    table: &Table,
    x_name: &str,
    y_name: &str,
    aggregation: Aggregation,
    reduce: Reduce,
    numeric_x: NumericX,
    kind: ChartKind,
) -> Result<AggregatedSeries, ExploreError> {
    let x_col = table.require(x_name)?;
    let y_col = table.require(y_name)?;
    let y_cells = y_col
        .as_numeric()
        .ok_or_else(|| mismatch(y_name, ColumnType::Numeric, y_col.column_type()))?;

    let (data, x_label, y_label) = match x_col.column_type() {
        ColumnType::Temporal if aggregation != Aggregation::None => {
            let dates = x_col.as_temporal().unwrap_or(&[]);
            let mut groups: BTreeMap<DateKey, Vec<f64>> = BTreeMap::new();
            for (date, y) in dates.iter().zip(y_cells) {
                let (Some(date), Some(y)) = (date, y) else {
                    continue;
                };
                if let Some(key) = DateKey::of(*date, aggregation) {
                    groups.entry(key).or_default().push(*y);
                }
            }

            let mut x = Vec::with_capacity(groups.len());
            let mut y = Vec::with_capacity(groups.len());
            let mut ticks = Vec::with_capacity(groups.len());
            for (key, values) in &groups {
                x.push(key.coordinate());
                y.push(reduce.apply(values));
                ticks.push((key.coordinate(), key.label()));
            }

            (
                SeriesData::Xy { x, y, ticks },
                format!("{x_name} ({})", aggregation.display_name()),
                format!("{}({y_name})", reduce.label()),
            )
        }
        ColumnType::Temporal => {
            // Aggregation `none`: raw dates in row order.
            let dates = x_col.as_temporal().unwrap_or(&[]);
            let mut x = Vec::new();
            let mut y = Vec::new();
            let mut ticks = Vec::new();
            for (date, value) in dates.iter().zip(y_cells) {
                let (Some(date), Some(value)) = (date, value) else {
                    continue;
                };
                x.push(day_number(*date));
                y.push(*value);
                ticks.push((day_number(*date), date.to_string()));
            }
            (
                SeriesData::Xy { x, y, ticks },
                x_name.to_string(),
                y_name.to_string(),
            )
        }
        ColumnType::Numeric => {
            let x_cells = x_col.as_numeric().unwrap_or(&[]);
            match numeric_x {
                NumericX::Binned => {
                    let edges = auto_bin_edges(&x_col.numeric_values());
                    let mut x = Vec::new();
                    let mut y = Vec::new();
                    for (xv, yv) in x_cells.iter().zip(y_cells) {
                        let (Some(xv), Some(yv)) = (xv, yv) else {
                            continue;
                        };
                        if let Some(idx) = bin_index(*xv, &edges) {
                            x.push(idx as f64);
                            y.push(*yv);
                        }
                    }
                    (
                        SeriesData::Xy {
                            x,
                            y,
                            ticks: Vec::new(),
                        },
                        format!("{x_name} (bin)"),
                        y_name.to_string(),
                    )
                }
                NumericX::Raw => {
                    let mut x = Vec::new();
                    let mut y = Vec::new();
                    for (xv, yv) in x_cells.iter().zip(y_cells) {
                        let (Some(xv), Some(yv)) = (xv, yv) else {
                            continue;
                        };
                        x.push(*xv);
                        y.push(*yv);
                    }
                    (
                        SeriesData::Xy {
                            x,
                            y,
                            ticks: Vec::new(),
                        },
                        x_name.to_string(),
                        y_name.to_string(),
                    )
                }
            }
        }
        ColumnType::Categorical | ColumnType::Boolean => {
            // Categories become 0-based indices in first-seen order.
            let mut order: Vec<String> = Vec::new();
            let mut x = Vec::new();
            let mut y = Vec::new();
            for row in 0..table.row_count() {
                if x_col.is_null(row) {
                    continue;
                }
                let Some(value) = y_cells[row] else {
                    continue;
                };
                let label = x_col.cell_display(row);
                let idx = match order.iter().position(|c| *c == label) {
                    Some(idx) => idx,
                    None => {
                        order.push(label);
                        order.len() - 1
                    }
                };
                x.push(idx as f64);
                y.push(value);
            }
            let ticks = order
                .into_iter()
                .enumerate()
                .map(|(i, label)| (i as f64, label))
                .collect();
            (
                SeriesData::Xy { x, y, ticks },
                x_name.to_string(),
                y_name.to_string(),
            )
        }
    };

    Ok(AggregatedSeries {
        kind,
        x_label,
        y_label,
        data,
    })
}

/// Histogram of one numeric column with auto-derived bins.
pub fn histogram_series(table: &Table, x_name: &str) -> Result<AggregatedSeries, ExploreError> {
    let col = table.require(x_name)?;
    let cells = col
        .as_numeric()
        .ok_or_else(|| mismatch(x_name, ColumnType::Numeric, col.column_type()))?;
    let values: Vec<f64> = cells.iter().copied().flatten().collect();
    if values.is_empty() {
        return Err(ExploreError::Degenerate {
            column: x_name.to_string(),
            reason: "no values to bin".to_string(),
        });
    }

    let edges = auto_bin_edges(&values);
    let counts = histogram_counts(&values, &edges);

    Ok(AggregatedSeries {
        kind: ChartKind::Histogram,
        x_label: x_name.to_string(),
        y_label: "frequency".to_string(),
        data: SeriesData::Histogram { edges, counts },
    })
}

/// Box plot: raw y values grouped by category x, first-seen order.
///
/// No pre-aggregation here; quartile work belongs to the renderer.
pub fn box_series(
    table: &Table,
    x_name: &str,
    y_name: &str,
) -> Result<AggregatedSeries, ExploreError> {
    let x_col = table.require(x_name)?;
    let y_col = table.require(y_name)?;
    let categories = x_col
        .as_text()
        .ok_or_else(|| mismatch(x_name, ColumnType::Categorical, x_col.column_type()))?;
    let values = y_col
        .as_numeric()
        .ok_or_else(|| mismatch(y_name, ColumnType::Numeric, y_col.column_type()))?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (category, value) in categories.iter().zip(values) {
        let (Some(category), Some(value)) = (category, value) else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, bucket)) => bucket.push(*value),
            None => groups.push((category.clone(), vec![*value])),
        }
    }

    Ok(AggregatedSeries {
        kind: ChartKind::Box,
        x_label: x_name.to_string(),
        y_label: y_name.to_string(),
        data: SeriesData::Grouped { groups },
    })
}

/// Pie: value counts per category, slices in first-appearance order.
pub fn pie_series(table: &Table, x_name: &str) -> Result<AggregatedSeries, ExploreError> {
    let col = table.require(x_name)?;
    let cells = col
        .as_text()
        .ok_or_else(|| mismatch(x_name, ColumnType::Categorical, col.column_type()))?;

    let mut labels: Vec<String> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for cell in cells.iter().flatten() {
        match labels.iter().position(|l| l == cell) {
            Some(idx) => counts[idx] += 1,
            None => {
                labels.push(cell.clone());
                counts.push(1);
            }
        }
    }

    Ok(AggregatedSeries {
        kind: ChartKind::Pie,
        x_label: x_name.to_string(),
        y_label: "count".to_string(),
        data: SeriesData::Pie { labels, counts },
    })
}

fn mismatch(column: &str, expected: ColumnType, found: ColumnType) -> ExploreError {
    ExploreError::TypeMismatch {
        column: column.to_string(),
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_series;
    use crate::domain::ChartRequest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated_table() -> Table {
        Table::new(vec![
            Column::temporal(
                "day",
                vec![
                    Some(date(2021, 1, 5)),
                    Some(date(2021, 2, 10)),
                    Some(date(2022, 3, 1)),
                ],
            ),
            Column::numeric("units", vec![Some(10.0), Some(20.0), Some(30.0)]),
        ])
        .unwrap()
    }

    fn request(kind: ChartKind, x: &str, y: Option<&str>, agg: Aggregation) -> ChartRequest {
        ChartRequest {
            kind,
            x: x.to_string(),
            y: y.map(str::to_string),
            aggregation: agg,
        }
    }

    #[test]
    fn yearly_bar_sums_within_each_year() {
        let series = build_series(
            &dated_table(),
            &request(ChartKind::Bar, "day", Some("units"), Aggregation::Yearly),
        )
        .unwrap();
        match series.data {
            SeriesData::Xy { x, y, ticks } => {
                assert_eq!(x, vec![2021.0, 2022.0]);
                assert_eq!(y, vec![30.0, 30.0]);
                assert_eq!(ticks[0].1, "2021");
                assert_eq!(ticks[1].1, "2022");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
        assert_eq!(series.y_label, "sum(units)");
    }

    #[test]
    fn yearly_scatter_means_within_each_year() {
        let series = build_series(
            &dated_table(),
            &request(ChartKind::Scatter, "day", Some("units"), Aggregation::Yearly),
        )
        .unwrap();
        match series.data {
            SeriesData::Xy { y, .. } => assert_eq!(y, vec![15.0, 30.0]),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn monthly_keys_are_chronological_with_padded_labels() {
        let series = build_series(
            &dated_table(),
            &request(ChartKind::Line, "day", Some("units"), Aggregation::Monthly),
        )
        .unwrap();
        match series.data {
            SeriesData::Xy { ticks, .. } => {
                let labels: Vec<&str> = ticks.iter().map(|(_, l)| l.as_str()).collect();
                assert_eq!(labels, vec!["2021-01", "2021-02", "2022-03"]);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn rows_with_nulls_never_form_groups() {
        let table = Table::new(vec![
            Column::temporal("day", vec![Some(date(2021, 1, 5)), Some(date(2023, 6, 1))]),
            Column::numeric("units", vec![Some(10.0), None]),
        ])
        .unwrap();
        let series = build_series(
            &table,
            &request(ChartKind::Bar, "day", Some("units"), Aggregation::Yearly),
        )
        .unwrap();
        // 2023 has no usable rows, so it is omitted rather than emitted as zero.
        match series.data {
            SeriesData::Xy { x, .. } => assert_eq!(x, vec![2021.0]),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn categorical_x_maps_first_seen_indices() {
        let table = Table::new(vec![
            Column::text(
                "region",
                vec![
                    Some("north".to_string()),
                    Some("south".to_string()),
                    Some("north".to_string()),
                ],
            ),
            Column::numeric("units", vec![Some(1.0), Some(2.0), Some(3.0)]),
        ])
        .unwrap();
        let series = build_series(
            &table,
            &request(ChartKind::Line, "region", Some("units"), Aggregation::None),
        )
        .unwrap();
        match series.data {
            SeriesData::Xy { x, ticks, .. } => {
                assert_eq!(x, vec![0.0, 1.0, 0.0]);
                assert_eq!(ticks.len(), 2);
                assert_eq!(ticks[0].1, "north");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn scatter_buckets_numeric_x_into_bin_indices() {
        let xs: Vec<Option<f64>> = (0..32).map(|i| Some(i as f64)).collect();
        let ys: Vec<Option<f64>> = (0..32).map(|i| Some(i as f64 * 2.0)).collect();
        let table = Table::new(vec![
            Column::numeric("x", xs),
            Column::numeric("y", ys),
        ])
        .unwrap();
        let series = build_series(
            &table,
            &request(ChartKind::Scatter, "x", Some("y"), Aggregation::None),
        )
        .unwrap();
        match series.data {
            SeriesData::Xy { x, y, .. } => {
                assert_eq!(y.len(), 32);
                // Bin indices are small integers, not the raw values.
                assert!(x.iter().all(|&v| v.fract() == 0.0 && v < 32.0));
                assert!(x.windows(2).all(|w| w[0] <= w[1]));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
        assert_eq!(series.x_label, "x (bin)");
    }

    #[test]
    fn line_keeps_raw_numeric_x_in_row_order() {
        let table = Table::new(vec![
            Column::numeric("x", vec![Some(3.0), Some(1.0), Some(2.0)]),
            Column::numeric("y", vec![Some(30.0), Some(10.0), Some(20.0)]),
        ])
        .unwrap();
        let series = build_series(
            &table,
            &request(ChartKind::Line, "x", Some("y"), Aggregation::None),
        )
        .unwrap();
        match series.data {
            SeriesData::Xy { x, .. } => assert_eq!(x, vec![3.0, 1.0, 2.0]),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn histogram_rejects_text_column() {
        let table = Table::new(vec![Column::text("c", vec![Some("a".to_string())])]).unwrap();
        let err = build_series(
            &table,
            &request(ChartKind::Histogram, "c", None, Aggregation::None),
        )
        .unwrap_err();
        assert!(matches!(err, ExploreError::TypeMismatch { .. }));
    }

    #[test]
    fn histogram_counts_cover_all_values() {
        let values: Vec<Option<f64>> = (0..50).map(|i| Some((i % 10) as f64)).collect();
        let table = Table::new(vec![Column::numeric("v", values)]).unwrap();
        let series = build_series(
            &table,
            &request(ChartKind::Histogram, "v", None, Aggregation::None),
        )
        .unwrap();
        match series.data {
            SeriesData::Histogram { edges, counts } => {
                assert_eq!(edges.len(), counts.len() + 1);
                assert_eq!(counts.iter().sum::<usize>(), 50);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn pie_rejects_numeric_column() {
        let table = Table::new(vec![Column::numeric("v", vec![Some(1.0)])]).unwrap();
        let err = build_series(
            &table,
            &request(ChartKind::Pie, "v", None, Aggregation::None),
        )
        .unwrap_err();
        assert!(matches!(err, ExploreError::TypeMismatch { .. }));
    }

    #[test]
    fn pie_slices_follow_first_appearance() {
        let cells = ["a", "a", "b", "c", "c", "c"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect();
        let table = Table::new(vec![Column::text("c", cells)]).unwrap();
        let series = build_series(
            &table,
            &request(ChartKind::Pie, "c", None, Aggregation::None),
        )
        .unwrap();
        match series.data {
            SeriesData::Pie { labels, counts } => {
                assert_eq!(labels, vec!["a", "b", "c"]);
                assert_eq!(counts, vec![2, 1, 3]);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn box_groups_keep_raw_values_per_category() {
        let table = Table::new(vec![
            Column::text(
                "g",
                vec![
                    Some("a".to_string()),
                    Some("b".to_string()),
                    Some("a".to_string()),
                ],
            ),
            Column::numeric("v", vec![Some(1.0), Some(5.0), Some(3.0)]),
        ])
        .unwrap();
        let series = build_series(
            &table,
            &request(ChartKind::Box, "g", Some("v"), Aggregation::None),
        )
        .unwrap();
        match series.data {
            SeriesData::Grouped { groups } => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0], ("a".to_string(), vec![1.0, 3.0]));
                assert_eq!(groups[1], ("b".to_string(), vec![5.0]));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
