//! A single named, typed column.
//!
//! Storage is one `Vec<Option<T>>` per semantic type; `None` is the missing
//! value. The semantic type is carried by the storage variant itself, so the
//! classification produced at ingest is authoritative everywhere downstream.

use chrono::NaiveDate;

use crate::domain::ColumnType;

/// Typed cell storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    Temporal(Vec<Option<NaiveDate>>),
}

/// A hashable, comparable key for one cell, used for duplicate-row detection.
///
/// Floats key on their bit pattern; `-0.0` is normalized to `0.0` so the two
/// zeros compare equal, matching numeric equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Number(u64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values))
    }

    pub fn temporal(name: impl Into<String>, values: Vec<Option<NaiveDate>>) -> Self {
        Self::new(name, ColumnData::Temporal(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Temporal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match &self.data {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Text(_) => ColumnType::Categorical,
            ColumnData::Boolean(_) => ColumnType::Boolean,
            ColumnData::Temporal(_) => ColumnType::Temporal,
        }
    }

    pub fn null_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Boolean(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Temporal(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).is_none_or(|c| c.is_none()),
            ColumnData::Text(v) => v.get(row).is_none_or(|c| c.is_none()),
            ColumnData::Boolean(v) => v.get(row).is_none_or(|c| c.is_none()),
            ColumnData::Temporal(v) => v.get(row).is_none_or(|c| c.is_none()),
        }
    }

    /// Typed accessors. `None` when the column has a different storage type.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&[Option<bool>]> {
        match &self.data {
            ColumnData::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&[Option<NaiveDate>]> {
        match &self.data {
            ColumnData::Temporal(v) => Some(v),
            _ => None,
        }
    }

    /// The non-null numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().copied().flatten().collect(),
            _ => Vec::new(),
        }
    }

    pub fn cell_key(&self, row: usize) -> CellKey {
        match &self.data {
            ColumnData::Numeric(v) => match v.get(row).copied().flatten() {
                Some(x) => {
                    let x = if x == 0.0 { 0.0 } else { x };
                    CellKey::Number(x.to_bits())
                }
                None => CellKey::Null,
            },
            ColumnData::Text(v) => match v.get(row).and_then(|c| c.clone()) {
                Some(s) => CellKey::Text(s),
                None => CellKey::Null,
            },
            ColumnData::Boolean(v) => match v.get(row).copied().flatten() {
                Some(b) => CellKey::Bool(b),
                None => CellKey::Null,
            },
            ColumnData::Temporal(v) => match v.get(row).copied().flatten() {
                Some(d) => CellKey::Date(d),
                None => CellKey::Null,
            },
        }
    }

    /// Display form of one cell ("" for null), for previews and exports.
    pub fn cell_display(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(fmt_number)
                .unwrap_or_default(),
            ColumnData::Text(v) => v
                .get(row)
                .and_then(|c| c.clone())
                .unwrap_or_default(),
            ColumnData::Boolean(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|b| b.to_string())
                .unwrap_or_default(),
            ColumnData::Temporal(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }

    /// A new column keeping only rows where `keep[row]` is true.
    pub fn filter(&self, keep: &[bool]) -> Column {
        fn pick<T: Clone>(values: &[Option<T>], keep: &[bool]) -> Vec<Option<T>> {
            values
                .iter()
                .zip(keep)
                .filter(|&(_, &k)| k)
                .map(|(v, _)| v.clone())
                .collect()
        }

        let data = match &self.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(pick(v, keep)),
            ColumnData::Text(v) => ColumnData::Text(pick(v, keep)),
            ColumnData::Boolean(v) => ColumnData::Boolean(pick(v, keep)),
            ColumnData::Temporal(v) => ColumnData::Temporal(pick(v, keep)),
        };
        Column::new(self.name.clone(), data)
    }
}

/// Parse a date cell.
///
/// We recommend ISO dates (`YYYY-MM-DD`), but exported spreadsheets often use
/// `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common formats to
/// reduce friction while keeping parsing deterministic. Ingest inference and
/// the parse-dates cleaning step both go through this one list.
pub fn parse_date_cell(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Integral values print without a trailing `.0` so CSV round trips stay tidy.
fn fmt_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.0}")
    } else {
        format!("{x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_normalizes_negative_zero() {
        let col = Column::numeric("v", vec![Some(0.0), Some(-0.0)]);
        assert_eq!(col.cell_key(0), col.cell_key(1));
    }

    #[test]
    fn filter_keeps_marked_rows() {
        let col = Column::text(
            "c",
            vec![Some("a".to_string()), None, Some("b".to_string())],
        );
        let kept = col.filter(&[true, false, true]);
        assert_eq!(
            kept.as_text().unwrap(),
            &[Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[test]
    fn null_count_counts_only_missing() {
        let col = Column::boolean("b", vec![Some(true), None, Some(false), None]);
        assert_eq!(col.null_count(), 2);
        assert!(col.is_null(1));
        assert!(!col.is_null(2));
    }

    #[test]
    fn numbers_display_without_spurious_fraction() {
        let col = Column::numeric("n", vec![Some(3.0), Some(2.5)]);
        assert_eq!(col.cell_display(0), "3");
        assert_eq!(col.cell_display(1), "2.5");
    }
}
