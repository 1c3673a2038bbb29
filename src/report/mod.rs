//! Dataset summaries: shape, column types, missing/duplicate counts, and the
//! numeric describe table.
//!
//! We keep formatting code in `format` so:
//! - the summary computation stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::stats::{describe, DescribeRow};
use crate::table::Table;

pub mod format;

pub use format::*;

/// Per-column entry of the summary.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub ty: crate::domain::ColumnType,
    pub missing: usize,
}

/// The descriptive profile of one table snapshot.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub column_summaries: Vec<ColumnSummary>,
    pub duplicate_rows: usize,
    pub describe: Vec<DescribeRow>,
}

/// Metadata attached to an exported report artifact.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub title: String,
    pub description: String,
    pub source: String,
    pub generated: String,
}

/// Compute the full summary for one table snapshot.
pub fn summarize(table: &Table) -> DatasetSummary {
    let column_summaries = table
        .columns()
        .iter()
        .map(|c| ColumnSummary {
            name: c.name().to_string(),
            ty: c.column_type(),
            missing: c.null_count(),
        })
        .collect();

    DatasetSummary {
        rows: table.row_count(),
        columns: table.column_count(),
        column_summaries,
        duplicate_rows: table.duplicate_row_count(),
        describe: describe(table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn summary_counts_missing_and_duplicates() {
        let table = Table::new(vec![
            Column::numeric("x", vec![Some(1.0), Some(1.0), None]),
            Column::text(
                "c",
                vec![Some("a".to_string()), Some("a".to_string()), None],
            ),
        ])
        .unwrap();

        let summary = summarize(&table);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, 2);
        assert_eq!(summary.duplicate_rows, 1);
        assert_eq!(summary.column_summaries[0].missing, 1);
        assert_eq!(summary.describe.len(), 1);
    }
}
