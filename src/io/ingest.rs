//! CSV/Excel ingest and column-type inference.
//!
//! This module turns a heterogeneous upload into a typed [`Table`] that is
//! safe to clean and chart.
//!
//! Design goals:
//! - **Explicit classification**: every column gets one of
//!   {numeric, temporal, categorical, boolean} exactly once, here; nothing
//!   downstream re-sniffs cell values
//! - **Row-level tolerance** (skip malformed CSV records, but report them)
//! - **Deterministic behavior** (fixed date formats, fixed boolean tokens)
//! - **Separation of concerns**: no cleaning or charting logic here

use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;

use crate::error::{AppError, ExploreError};
use crate::table::{parse_date_cell, Column, ColumnData, Table};

/// Boolean tokens accepted during inference. `1`/`0` intentionally stay
/// numeric.
const TRUE_TOKENS: [&str; 2] = ["true", "yes"];
const FALSE_TOKENS: [&str; 2] = ["false", "no"];

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the typed table plus provenance notes.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: Table,
    /// "csv" or "excel".
    pub format: &'static str,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Load a CSV or Excel file into a typed table.
///
/// Unrecognized extensions and unreadable workbooks are format errors; no
/// partial table is produced.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<IngestedTable, AppError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            if sheet.is_some() {
                return Err(ExploreError::Format(
                    "sheet selection only applies to Excel workbooks".to_string(),
                )
                .into());
            }
            load_csv(path)
        }
        "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => load_excel(path, sheet),
        other => Err(ExploreError::Format(format!(
            "unsupported file extension `{other}` for '{}': expected csv, xls, or xlsx",
            path.display()
        ))
        .into()),
    }
}

fn load_csv(path: &Path) -> Result<IngestedTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .enumerate()
        .map(|(idx, name)| normalize_header_name(name, idx))
        .collect();

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        match result {
            Ok(record) => {
                let mut cells = Vec::with_capacity(headers.len());
                for col in 0..headers.len() {
                    let value = record.get(col).map(str::trim).filter(|s| !s.is_empty());
                    cells.push(value.map(str::to_string));
                }
                rows.push(cells);
            }
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    for err in &row_errors {
        log::warn!("{}: line {}: {}", path.display(), err.line, err.message);
    }

    let columns = infer_text_columns(&headers, &rows);
    let table = Table::new(columns).map_err(AppError::from)?;

    Ok(IngestedTable {
        table,
        format: "csv",
        rows_read,
        row_errors,
    })
}

fn load_excel(path: &Path, sheet: Option<&str>) -> Result<IngestedTable, AppError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        AppError::from(ExploreError::Format(format!(
            "cannot open workbook '{}': {e}",
            path.display()
        )))
    })?;

    let sheet_names = workbook.sheet_names().to_owned();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ExploreError::Format(format!(
                    "workbook has no sheet `{name}` (available: {})",
                    sheet_names.join(", ")
                ))
                .into());
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ExploreError::Format("workbook has no sheets".to_string()))
            .map_err(AppError::from)?,
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        AppError::from(ExploreError::Format(format!(
            "cannot read sheet `{sheet_name}`: {e}"
        )))
    })?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, cell)| normalize_header_name(&cell.to_string(), idx))
                .collect()
        })
        .unwrap_or_default();

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for row in rows_iter {
        let mut cells = Vec::with_capacity(headers.len());
        for col in 0..headers.len() {
            cells.push(raw_cell(row.get(col)));
        }
        rows.push(cells);
    }

    let rows_read = rows.len();
    let columns = infer_typed_columns(&headers, &rows);
    let table = Table::new(columns).map_err(AppError::from)?;

    Ok(IngestedTable {
        table,
        format: "excel",
        rows_read,
        row_errors: Vec::new(),
    })
}

/// Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
/// first header (e.g. "﻿id"). If we don't strip it, column lookups silently
/// miss. Empty headers get a positional name.
fn normalize_header_name(name: &str, index: usize) -> String {
    let name = name.trim().trim_start_matches('\u{feff}');
    if name.is_empty() {
        format!("column_{}", index + 1)
    } else {
        name.to_string()
    }
}

/// One ingested cell before column classification.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Null,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

fn raw_cell(cell: Option<&Data>) -> RawCell {
    match cell {
        None | Some(Data::Empty) | Some(Data::Error(_)) => RawCell::Null,
        Some(Data::Float(v)) => RawCell::Number(*v),
        Some(Data::Int(v)) => RawCell::Number(*v as f64),
        Some(Data::Bool(b)) => RawCell::Bool(*b),
        Some(Data::DateTime(dt)) => match dt.as_datetime() {
            Some(dt) => RawCell::Date(dt.date()),
            None => RawCell::Null,
        },
        Some(Data::DateTimeIso(s)) => match parse_date_cell(&s[..10.min(s.len())]) {
            Some(d) => RawCell::Date(d),
            None => RawCell::Text(s.clone()),
        },
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                RawCell::Null
            } else {
                RawCell::Text(trimmed.to_string())
            }
        }
        Some(other) => {
            let s = other.to_string();
            if s.trim().is_empty() {
                RawCell::Null
            } else {
                RawCell::Text(s.trim().to_string())
            }
        }
    }
}

/// Classify one all-text column (CSV path).
///
/// Priority: numeric, then boolean tokens, then dates, else categorical text.
/// A column with no non-null cells stays categorical.
fn infer_from_strings(name: &str, cells: &[Option<String>]) -> Column {
    let non_null: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();

    if !non_null.is_empty() {
        if non_null.iter().all(|s| parse_number(s).is_some()) {
            let values = cells
                .iter()
                .map(|c| c.as_deref().and_then(parse_number))
                .collect();
            return Column::numeric(name, values);
        }
        if non_null.iter().all(|s| parse_bool(s).is_some()) {
            let values = cells
                .iter()
                .map(|c| c.as_deref().and_then(parse_bool))
                .collect();
            return Column::boolean(name, values);
        }
        if non_null.iter().all(|s| parse_date_cell(s).is_some()) {
            let values = cells
                .iter()
                .map(|c| c.as_deref().and_then(parse_date_cell))
                .collect();
            return Column::temporal(name, values);
        }
    }

    Column::text(name, cells.to_vec())
}

fn infer_text_columns(headers: &[String], rows: &[Vec<Option<String>>]) -> Vec<Column> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<String>> = rows.iter().map(|r| r[idx].clone()).collect();
            let column = infer_from_strings(name, &cells);
            log::debug!("column `{}` inferred as {}", name, column.column_type());
            column
        })
        .collect()
}

/// Classify one typed column (Excel path).
///
/// Uniformly-typed cells keep their type; all-string columns go through the
/// CSV inference; mixed columns degrade to text.
fn infer_typed_columns(headers: &[String], rows: &[Vec<RawCell>]) -> Vec<Column> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&RawCell> = rows.iter().map(|r| &r[idx]).collect();

            let non_null: Vec<&RawCell> = cells
                .iter()
                .copied()
                .filter(|c| !matches!(c, RawCell::Null))
                .collect();

            let column = if !non_null.is_empty()
                && non_null.iter().all(|c| matches!(c, RawCell::Number(_)))
            {
                Column::new(
                    name.clone(),
                    ColumnData::Numeric(
                        cells
                            .iter()
                            .map(|c| match c {
                                RawCell::Number(v) => Some(*v),
                                _ => None,
                            })
                            .collect(),
                    ),
                )
            } else if !non_null.is_empty()
                && non_null.iter().all(|c| matches!(c, RawCell::Bool(_)))
            {
                Column::new(
                    name.clone(),
                    ColumnData::Boolean(
                        cells
                            .iter()
                            .map(|c| match c {
                                RawCell::Bool(b) => Some(*b),
                                _ => None,
                            })
                            .collect(),
                    ),
                )
            } else if !non_null.is_empty()
                && non_null.iter().all(|c| matches!(c, RawCell::Date(_)))
            {
                Column::new(
                    name.clone(),
                    ColumnData::Temporal(
                        cells
                            .iter()
                            .map(|c| match c {
                                RawCell::Date(d) => Some(*d),
                                _ => None,
                            })
                            .collect(),
                    ),
                )
            } else if non_null.iter().all(|c| matches!(c, RawCell::Text(_))) {
                let strings: Vec<Option<String>> = cells
                    .iter()
                    .map(|c| match c {
                        RawCell::Text(s) => Some(s.clone()),
                        _ => None,
                    })
                    .collect();
                infer_from_strings(name, &strings)
            } else {
                // Mixed types: degrade to text rather than guessing.
                Column::text(
                    name.clone(),
                    cells
                        .iter()
                        .map(|c| match c {
                            RawCell::Null => None,
                            RawCell::Number(v) => Some(v.to_string()),
                            RawCell::Text(s) => Some(s.clone()),
                            RawCell::Bool(b) => Some(b.to_string()),
                            RawCell::Date(d) => Some(d.to_string()),
                        })
                        .collect(),
                )
            };

            log::debug!("column `{}` inferred as {}", name, column.column_type());
            column
        })
        .collect()
}

fn parse_number(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

fn parse_bool(s: &str) -> Option<bool> {
    let lower = s.to_ascii_lowercase();
    if TRUE_TOKENS.contains(&lower.as_str()) {
        return Some(true);
    }
    if FALSE_TOKENS.contains(&lower.as_str()) {
        return Some(false);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnType;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("datascope_{}_{name}", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn infers_each_semantic_type() {
        let path = write_temp_csv(
            "types.csv",
            "id,amount,flag,when,label\n\
             1,2.5,true,2021-01-05,Alpha\n\
             2,3.5,no,2021-02-10,Beta\n\
             3,,yes,2022-03-01,\n",
        );
        let ingest = load_table(&path, None).unwrap();
        let table = &ingest.table;

        assert_eq!(ingest.format, "csv");
        assert_eq!(ingest.rows_read, 3);
        assert_eq!(table.row_count(), 3);
        let types: Vec<ColumnType> = table.schema().into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Numeric,
                ColumnType::Numeric,
                ColumnType::Boolean,
                ColumnType::Temporal,
                ColumnType::Categorical,
            ]
        );
        // Empty cells became nulls.
        assert_eq!(table.column("amount").unwrap().null_count(), 1);
        assert_eq!(table.column("label").unwrap().null_count(), 1);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn zero_one_columns_stay_numeric() {
        let path = write_temp_csv("zeroone.csv", "flag\n1\n0\n1\n");
        let ingest = load_table(&path, None).unwrap();
        assert_eq!(
            ingest.table.column("flag").unwrap().column_type(),
            ColumnType::Numeric
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn mixed_content_stays_categorical() {
        let path = write_temp_csv("mixed.csv", "c\n1\nhello\n2021-01-05\n");
        let ingest = load_table(&path, None).unwrap();
        assert_eq!(
            ingest.table.column("c").unwrap().column_type(),
            ColumnType::Categorical
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unknown_extension_is_a_format_error() {
        let err = load_table(Path::new("data.parquet"), None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn sheet_flag_on_csv_is_rejected() {
        let path = write_temp_csv("sheeted.csv", "a\n1\n");
        let err = load_table(&path, Some("Sheet1")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn empty_headers_get_positional_names() {
        let path = write_temp_csv("headers.csv", "a,,c\n1,2,3\n");
        let ingest = load_table(&path, None).unwrap();
        assert_eq!(ingest.table.column_names(), vec!["a", "column_2", "c"]);
        std::fs::remove_file(path).ok();
    }
}
