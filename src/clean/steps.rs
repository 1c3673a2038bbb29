//! The individual cleaning transforms.
//!
//! Each transform takes `&Table` and returns a new table; column-scoped
//! transforms validate their targets first, so a failed step leaves the
//! caller's table untouched.
//!
//! Fixed policies (see DESIGN.md):
//! - parse-dates rejects the whole column on the first unparseable non-null
//!   cell, rather than nulling offenders
//! - standardize uses the sample standard deviation (n − 1) and rejects
//!   zero-variance columns
//! - one-hot turns null source cells into all-false dummy rows

use std::collections::HashSet;

use rayon::prelude::*;

use crate::domain::ColumnType;
use crate::error::ExploreError;
use crate::stats::{mean, quantile, sample_stddev};
use crate::table::{parse_date_cell, Column, Table};

/// Remove any row containing a missing value in any column.
pub fn drop_missing(table: &Table) -> Table {
    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| !table.columns().iter().any(|c| c.is_null(row)))
        .collect();
    table.filter_rows(&keep)
}

/// Map every cell of the named text columns to its lowercase form.
pub fn lowercase(table: &Table, columns: &[String]) -> Result<Table, ExploreError> {
    let mut out = table.clone();
    for name in columns {
        let col = table.require(name)?;
        let cells = require_text(col)?;
        let lowered: Vec<Option<String>> = cells
            .iter()
            .map(|c| c.as_ref().map(|s| s.to_lowercase()))
            .collect();
        let idx = index_of(&out, name)?;
        out.splice_column(idx, vec![Column::text(name.clone(), lowered)])?;
    }
    Ok(out)
}

/// Remove rows that exactly duplicate an earlier row (first occurrence kept).
pub fn drop_duplicates(table: &Table) -> Table {
    let mut seen = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| seen.insert(table.row_key(row)))
        .collect();
    table.filter_rows(&keep)
}

/// Reinterpret the named text columns as calendar dates.
///
/// Policy is reject: the first unparseable non-null cell fails the whole
/// column transform. A column that is already temporal is a no-op; other
/// types are a mismatch.
pub fn parse_dates(table: &Table, columns: &[String]) -> Result<Table, ExploreError> {
    let mut out = table.clone();
    for name in columns {
        let col = table.require(name)?;
        if col.as_temporal().is_some() {
            continue;
        }
        let cells = require_text(col)?;

        let mut dates = Vec::with_capacity(cells.len());
        for (row, cell) in cells.iter().enumerate() {
            match cell {
                None => dates.push(None),
                Some(s) => match parse_date_cell(s) {
                    Some(d) => dates.push(Some(d)),
                    None => {
                        return Err(ExploreError::Parse {
                            column: name.clone(),
                            row,
                            value: s.clone(),
                        });
                    }
                },
            }
        }

        let idx = index_of(&out, name)?;
        out.splice_column(idx, vec![Column::temporal(name.clone(), dates)])?;
    }
    Ok(out)
}

/// Drop every row where any numeric column falls outside its own IQR fence.
///
/// Bounds are `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`, computed once per column from
/// the table as this step sees it. Null cells are never outside; an all-null
/// numeric column is skipped. All-equal columns have IQR 0 and remove nothing.
pub fn remove_outliers(table: &Table) -> Table {
    struct Fence {
        index: usize,
        lo: f64,
        hi: f64,
    }

    let fences: Vec<Fence> = table
        .columns()
        .par_iter()
        .enumerate()
        .filter_map(|(index, col)| {
            col.as_numeric()?;
            let values = col.numeric_values();
            let q1 = quantile(&values, 0.25)?;
            let q3 = quantile(&values, 0.75)?;
            let iqr = q3 - q1;
            Some(Fence {
                index,
                lo: q1 - 1.5 * iqr,
                hi: q3 + 1.5 * iqr,
            })
        })
        .collect();

    let columns = table.columns();
    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| {
            fences.iter().all(|f| {
                match columns[f.index].as_numeric().and_then(|v| v[row]) {
                    Some(x) => x >= f.lo && x <= f.hi,
                    None => true,
                }
            })
        })
        .collect();

    let removed = keep.iter().filter(|&&k| !k).count();
    if removed > 0 {
        log::debug!("remove-outliers: dropping {removed} row(s)");
    }
    table.filter_rows(&keep)
}

/// Replace each value of the named numeric columns with `(v − mean)/stddev`
/// (sample stddev). Zero variance or fewer than two values is degenerate.
pub fn standardize(table: &Table, columns: &[String]) -> Result<Table, ExploreError> {
    let mut out = table.clone();
    for name in columns {
        let col = table.require(name)?;
        let cells = require_numeric(col)?;
        let values = col.numeric_values();

        let m = mean(&values).ok_or_else(|| degenerate(name, "no values to standardize"))?;
        let sd = sample_stddev(&values)
            .ok_or_else(|| degenerate(name, "fewer than two values"))?;
        if sd == 0.0 {
            return Err(degenerate(name, "zero variance"));
        }

        let scaled: Vec<Option<f64>> = cells.iter().map(|c| c.map(|v| (v - m) / sd)).collect();
        let idx = index_of(&out, name)?;
        out.splice_column(idx, vec![Column::numeric(name.clone(), scaled)])?;
    }
    Ok(out)
}

/// Replace each named text column with one boolean column per distinct
/// observed value (first-seen order), named `{column}_{value}`.
///
/// Null source cells become all-false across the dummy group; every non-null
/// row has exactly one true.
pub fn one_hot_encode(table: &Table, columns: &[String]) -> Result<Table, ExploreError> {
    let mut out = table.clone();
    for name in columns {
        let col = table.require(name)?;
        let cells = require_text(col)?;

        let mut values: Vec<&str> = Vec::new();
        let mut seen = HashSet::new();
        for cell in cells.iter().flatten() {
            if seen.insert(cell.as_str()) {
                values.push(cell);
            }
        }

        let dummies: Vec<Column> = values
            .iter()
            .map(|value| {
                let flags: Vec<Option<bool>> = cells
                    .iter()
                    .map(|c| Some(c.as_deref() == Some(*value)))
                    .collect();
                Column::boolean(format!("{name}_{value}"), flags)
            })
            .collect();

        let idx = index_of(&out, name)?;
        out.splice_column(idx, dummies)?;
    }
    Ok(out)
}

/// Replace each named boolean column with a numeric 0/1 column.
pub fn boolean_to_int(table: &Table, columns: &[String]) -> Result<Table, ExploreError> {
    let mut out = table.clone();
    for name in columns {
        let col = table.require(name)?;
        let cells = col
            .as_boolean()
            .ok_or_else(|| mismatch(name, ColumnType::Boolean, col.column_type()))?;
        let ints: Vec<Option<f64>> = cells
            .iter()
            .map(|c| c.map(|b| if b { 1.0 } else { 0.0 }))
            .collect();
        let idx = index_of(&out, name)?;
        out.splice_column(idx, vec![Column::numeric(name.clone(), ints)])?;
    }
    Ok(out)
}

fn require_text(col: &Column) -> Result<&[Option<String>], ExploreError> {
    col.as_text()
        .ok_or_else(|| mismatch(col.name(), ColumnType::Categorical, col.column_type()))
}

fn require_numeric(col: &Column) -> Result<&[Option<f64>], ExploreError> {
    col.as_numeric()
        .ok_or_else(|| mismatch(col.name(), ColumnType::Numeric, col.column_type()))
}

fn mismatch(column: &str, expected: ColumnType, found: ColumnType) -> ExploreError {
    ExploreError::TypeMismatch {
        column: column.to_string(),
        expected,
        found,
    }
}

fn degenerate(column: &str, reason: &str) -> ExploreError {
    ExploreError::Degenerate {
        column: column.to_string(),
        reason: reason.to_string(),
    }
}

fn index_of(table: &Table, name: &str) -> Result<usize, ExploreError> {
    table
        .column_index(name)
        .ok_or_else(|| ExploreError::UnknownColumn {
            column: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;

    fn col_names(s: &str) -> Vec<String> {
        vec![s.to_string()]
    }

    #[test]
    fn drop_missing_removes_rows_with_any_null() {
        let table = Table::new(vec![
            Column::numeric("x", vec![Some(1.0), None, Some(3.0)]),
            Column::text(
                "c",
                vec![Some("a".to_string()), Some("b".to_string()), None],
            ),
        ])
        .unwrap();
        let out = drop_missing(&table);
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.column("x").unwrap().as_numeric().unwrap()[0], Some(1.0));
    }

    #[test]
    fn lowercase_rejects_numeric_column() {
        let table = Table::new(vec![Column::numeric("x", vec![Some(1.0)])]).unwrap();
        let err = lowercase(&table, &col_names("x")).unwrap_err();
        assert!(matches!(err, ExploreError::TypeMismatch { .. }));
    }

    #[test]
    fn lowercase_maps_cells_and_keeps_nulls() {
        let table = Table::new(vec![Column::text(
            "c",
            vec![Some("HeLLo".to_string()), None],
        )])
        .unwrap();
        let out = lowercase(&table, &col_names("c")).unwrap();
        assert_eq!(
            out.column("c").unwrap().as_text().unwrap(),
            &[Some("hello".to_string()), None]
        );
    }

    #[test]
    fn drop_duplicates_is_idempotent() {
        let table = Table::new(vec![Column::numeric(
            "x",
            vec![Some(1.0), Some(2.0), Some(1.0), Some(2.0)],
        )])
        .unwrap();
        let once = drop_duplicates(&table);
        let twice = drop_duplicates(&once);
        assert_eq!(once.row_count(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn parse_dates_rejects_on_first_bad_cell() {
        let table = Table::new(vec![Column::text(
            "d",
            vec![Some("2021-01-05".to_string()), Some("not a date".to_string())],
        )])
        .unwrap();
        let err = parse_dates(&table, &col_names("d")).unwrap_err();
        match err {
            ExploreError::Parse { column, row, value } => {
                assert_eq!(column, "d");
                assert_eq!(row, 1);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_dates_converts_and_passes_nulls_through() {
        let table = Table::new(vec![Column::text(
            "d",
            vec![Some("2021-01-05".to_string()), None, Some("01/02/2021".to_string())],
        )])
        .unwrap();
        let out = parse_dates(&table, &col_names("d")).unwrap();
        let dates = out.column("d").unwrap().as_temporal().unwrap();
        assert_eq!(dates[0], chrono::NaiveDate::from_ymd_opt(2021, 1, 5));
        assert_eq!(dates[1], None);
        // DD/MM/YYYY
        assert_eq!(dates[2], chrono::NaiveDate::from_ymd_opt(2021, 2, 1));
    }

    #[test]
    fn outliers_all_equal_column_removes_nothing() {
        let table = Table::new(vec![Column::numeric(
            "x",
            vec![Some(4.0); 6],
        )])
        .unwrap();
        assert_eq!(remove_outliers(&table).row_count(), 6);
    }

    #[test]
    fn outliers_single_row_is_retained() {
        let table = Table::new(vec![Column::numeric("v", vec![Some(5.0)])]).unwrap();
        assert_eq!(remove_outliers(&table).row_count(), 1);
    }

    #[test]
    fn outliers_drop_rows_outside_the_fence() {
        // 1..=9 plus a wild value; only the wild row leaves.
        let mut values: Vec<Option<f64>> = (1..=9).map(|i| Some(i as f64)).collect();
        values.push(Some(1000.0));
        let table = Table::new(vec![Column::numeric("x", values)]).unwrap();
        let out = remove_outliers(&table);
        assert_eq!(out.row_count(), 9);
        assert!(out
            .column("x")
            .unwrap()
            .numeric_values()
            .iter()
            .all(|&v| v <= 9.0));
    }

    #[test]
    fn outliers_ignore_null_cells() {
        let table = Table::new(vec![
            Column::numeric("x", vec![Some(1.0), None, Some(2.0), Some(3.0)]),
        ])
        .unwrap();
        assert_eq!(remove_outliers(&table).row_count(), 4);
    }

    #[test]
    fn standardize_yields_zero_mean_unit_stddev() {
        let table = Table::new(vec![Column::numeric(
            "x",
            vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)],
        )])
        .unwrap();
        let out = standardize(&table, &col_names("x")).unwrap();
        let values = out.column("x").unwrap().numeric_values();
        assert!(stats::mean(&values).unwrap().abs() < 1e-12);
        assert!((stats::sample_stddev(&values).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn standardize_rejects_zero_variance() {
        let table = Table::new(vec![Column::numeric(
            "x",
            vec![Some(3.0), Some(3.0), Some(3.0)],
        )])
        .unwrap();
        let err = standardize(&table, &col_names("x")).unwrap_err();
        assert!(matches!(err, ExploreError::Degenerate { .. }));
    }

    #[test]
    fn one_hot_produces_k_columns_with_one_true_per_row() {
        let table = Table::new(vec![Column::text(
            "c",
            vec![
                Some("a".to_string()),
                Some("b".to_string()),
                Some("a".to_string()),
                Some("c".to_string()),
            ],
        )])
        .unwrap();
        let out = one_hot_encode(&table, &col_names("c")).unwrap();
        assert_eq!(out.column_names(), vec!["c_a", "c_b", "c_c"]);

        let mut total_true = 0;
        for row in 0..out.row_count() {
            let trues = out
                .columns()
                .iter()
                .filter(|col| col.as_boolean().unwrap()[row] == Some(true))
                .count();
            assert_eq!(trues, 1);
            total_true += trues;
        }
        // Group sums to the original row count.
        assert_eq!(total_true, table.row_count());
    }

    #[test]
    fn one_hot_null_cells_are_all_false() {
        let table = Table::new(vec![Column::text(
            "c",
            vec![Some("a".to_string()), None],
        )])
        .unwrap();
        let out = one_hot_encode(&table, &col_names("c")).unwrap();
        let flags = out.column("c_a").unwrap().as_boolean().unwrap();
        assert_eq!(flags, &[Some(true), Some(false)]);
    }

    #[test]
    fn bool_to_int_maps_true_to_one() {
        let table = Table::new(vec![Column::boolean(
            "b",
            vec![Some(true), Some(false), None],
        )])
        .unwrap();
        let out = boolean_to_int(&table, &col_names("b")).unwrap();
        assert_eq!(
            out.column("b").unwrap().as_numeric().unwrap(),
            &[Some(1.0), Some(0.0), None]
        );
    }
}
