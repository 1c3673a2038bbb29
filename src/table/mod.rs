//! In-memory tabular data.
//!
//! A [`Table`] is an ordered sequence of named, typed columns sharing one row
//! count (a checked invariant). Tables are immutable from the caller's point
//! of view: transforms take `&Table` and produce a new value, so a caller can
//! keep the raw table and re-clean from it at will.

use std::collections::HashSet;

use crate::domain::ColumnType;
use crate::error::ExploreError;

pub mod column;

pub use column::{parse_date_cell, CellKey, Column, ColumnData};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that all columns share one row count.
    pub fn new(columns: Vec<Column>) -> Result<Self, ExploreError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for col in &columns {
                if col.len() != expected {
                    return Err(ExploreError::LengthMismatch {
                        column: col.name().to_string(),
                        len: col.len(),
                        expected,
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Look a column up, or fail with `UnknownColumn`.
    pub fn require(&self, name: &str) -> Result<&Column, ExploreError> {
        self.column(name).ok_or_else(|| ExploreError::UnknownColumn {
            column: name.to_string(),
        })
    }

    /// Columns of one semantic type, in table order.
    pub fn columns_of_type(&self, ty: ColumnType) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.column_type() == ty)
            .collect()
    }

    /// Append a column; its length must match the current row count
    /// (any length is accepted into an empty table).
    pub fn push_column(&mut self, column: Column) -> Result<(), ExploreError> {
        if !self.columns.is_empty() && column.len() != self.row_count() {
            return Err(ExploreError::LengthMismatch {
                column: column.name().to_string(),
                len: column.len(),
                expected: self.row_count(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replace the column at `index` with one or more columns of equal length.
    ///
    /// Used by one-hot encoding, which swaps a text column for its dummy group
    /// in place so column order stays stable.
    pub fn splice_column(
        &mut self,
        index: usize,
        replacement: Vec<Column>,
    ) -> Result<(), ExploreError> {
        let expected = self.row_count();
        for col in &replacement {
            if col.len() != expected {
                return Err(ExploreError::LengthMismatch {
                    column: col.name().to_string(),
                    len: col.len(),
                    expected,
                });
            }
        }
        self.columns.splice(index..=index, replacement);
        Ok(())
    }

    /// A new table keeping only rows where `keep[row]` is true.
    pub fn filter_rows(&self, keep: &[bool]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.filter(keep)).collect(),
        }
    }

    /// The typed key identifying one row, for duplicate detection.
    pub fn row_key(&self, row: usize) -> Vec<CellKey> {
        self.columns.iter().map(|c| c.cell_key(row)).collect()
    }

    /// Rows that are exact duplicates of an earlier row.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.row_count());
        let mut dups = 0;
        for row in 0..self.row_count() {
            if !seen.insert(self.row_key(row)) {
                dups += 1;
            }
        }
        dups
    }

    /// Name/type pairs in table order.
    pub fn schema(&self) -> Vec<(String, ColumnType)> {
        self.columns
            .iter()
            .map(|c| (c.name().to_string(), c.column_type()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Table {
        Table::new(vec![
            Column::numeric("x", vec![Some(1.0), Some(2.0), Some(1.0)]),
            Column::text(
                "c",
                vec![
                    Some("a".to_string()),
                    Some("b".to_string()),
                    Some("a".to_string()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn new_rejects_mismatched_lengths() {
        let err = Table::new(vec![
            Column::numeric("x", vec![Some(1.0)]),
            Column::numeric("y", vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, ExploreError::LengthMismatch { .. }));
    }

    #[test]
    fn filter_rows_keeps_columns_aligned() {
        let t = small().filter_rows(&[true, false, true]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column("x").unwrap().as_numeric().unwrap()[1], Some(1.0));
        assert_eq!(
            t.column("c").unwrap().as_text().unwrap()[1],
            Some("a".to_string())
        );
    }

    #[test]
    fn duplicate_count_sees_full_rows() {
        // Rows 0 and 2 agree in every column.
        assert_eq!(small().duplicate_row_count(), 1);
    }

    #[test]
    fn splice_replaces_in_place() {
        let mut t = small();
        t.splice_column(
            1,
            vec![
                Column::boolean("c_a", vec![Some(true), Some(false), Some(true)]),
                Column::boolean("c_b", vec![Some(false), Some(true), Some(false)]),
            ],
        )
        .unwrap();
        assert_eq!(t.column_names(), vec!["x", "c_a", "c_b"]);
    }

    #[test]
    fn require_reports_unknown_column() {
        let err = small().require("nope").unwrap_err();
        assert!(matches!(err, ExploreError::UnknownColumn { .. }));
    }
}
