//! The chart-series builder.
//!
//! `build_series(table, request)` is tagged-variant dispatch: each of the six
//! chart kinds is one pure function `Table × request → AggregatedSeries`,
//! independently testable. Rendering is someone else's job (`plot::ascii` for
//! terminals, `tui::SeriesChart` for the interactive session).
//!
//! X-column handling for the shared x/y kinds (scatter/line/bar):
//!
//! - temporal x groups rows by the requested granularity (scatter/line reduce
//!   by mean, bar by sum), keys ascending chronologically
//! - numeric x is auto-binned for scatter and used raw for line/bar
//! - categorical x maps categories to 0-based indices in first-seen order

use crate::domain::{AggregatedSeries, ChartKind, ChartRequest, ColumnType};
use crate::error::ExploreError;
use crate::table::{Column, Table};

pub mod series;

pub use series::*;

/// Build the series for one chart request against one table snapshot.
pub fn build_series(
    table: &Table,
    request: &ChartRequest,
) -> Result<AggregatedSeries, ExploreError> {
    if table.row_count() == 0 {
        return Err(ExploreError::EmptyTable);
    }

    match request.kind {
        ChartKind::Scatter => series::xy_series(
            table,
            &request.x,
            required_y(request)?,
            request.aggregation,
            series::Reduce::Mean,
            series::NumericX::Binned,
            ChartKind::Scatter,
        ),
        ChartKind::Line => series::xy_series(
            table,
            &request.x,
            required_y(request)?,
            request.aggregation,
            series::Reduce::Mean,
            series::NumericX::Raw,
            ChartKind::Line,
        ),
        ChartKind::Bar => series::xy_series(
            table,
            &request.x,
            required_y(request)?,
            request.aggregation,
            series::Reduce::Sum,
            series::NumericX::Raw,
            ChartKind::Bar,
        ),
        ChartKind::Histogram => series::histogram_series(table, &request.x),
        ChartKind::Box => series::box_series(table, &request.x, required_y(request)?),
        ChartKind::Pie => series::pie_series(table, &request.x),
    }
}

/// Gate used before offering a column for histogram selection.
pub fn require_numeric(col: &Column) -> Result<(), ExploreError> {
    match col.column_type() {
        ColumnType::Numeric => Ok(()),
        found => Err(ExploreError::TypeMismatch {
            column: col.name().to_string(),
            expected: ColumnType::Numeric,
            found,
        }),
    }
}

/// Gate used before offering a column for pie/box-category selection.
pub fn require_categorical(col: &Column) -> Result<(), ExploreError> {
    match col.column_type() {
        ColumnType::Categorical => Ok(()),
        found => Err(ExploreError::TypeMismatch {
            column: col.name().to_string(),
            expected: ColumnType::Categorical,
            found,
        }),
    }
}

fn required_y(request: &ChartRequest) -> Result<&str, ExploreError> {
    request.y.as_deref().ok_or_else(|| {
        ExploreError::InvalidRequest(format!(
            "{} charts need both an x and a y column",
            request.kind.display_name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Aggregation;
    use crate::table::Column;

    #[test]
    fn two_variable_kind_without_y_is_rejected() {
        let table = Table::new(vec![Column::numeric("x", vec![Some(1.0)])]).unwrap();
        let request = ChartRequest {
            kind: ChartKind::Scatter,
            x: "x".to_string(),
            y: None,
            aggregation: Aggregation::None,
        };
        let err = build_series(&table, &request).unwrap_err();
        assert!(matches!(err, ExploreError::InvalidRequest(_)));
    }

    #[test]
    fn type_gates_match_column_classification() {
        let numeric = Column::numeric("v", vec![Some(1.0)]);
        let text = Column::text("c", vec![Some("a".to_string())]);
        assert!(require_numeric(&numeric).is_ok());
        assert!(require_numeric(&text).is_err());
        assert!(require_categorical(&text).is_ok());
        assert!(require_categorical(&numeric).is_err());
    }

    #[test]
    fn empty_table_is_rejected_up_front() {
        let request = ChartRequest {
            kind: ChartKind::Histogram,
            x: "x".to_string(),
            y: None,
            aggregation: Aggregation::None,
        };
        let err = build_series(&Table::empty(), &request).unwrap_err();
        assert!(matches!(err, ExploreError::EmptyTable));
    }
}
