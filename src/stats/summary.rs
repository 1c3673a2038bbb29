//! Moments, quantiles, and the per-column describe table.
//!
//! Quantiles use linear interpolation between order statistics (the same
//! scheme spreadsheet tools and pandas default to), so a single-value column
//! yields Q1 = Q3 = that value and an IQR of zero.

use rayon::prelude::*;

use crate::table::{Column, Table};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator).
///
/// Returns `None` for fewer than two values; returns `Some(0.0)` for a
/// zero-variance column, so callers can distinguish "not computable" from
/// "degenerate" explicitly.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() as f64 - 1.0)).sqrt())
}

/// Linear-interpolation quantile, `q` in `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let h = (sorted.len() as f64 - 1.0) * q;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    let a = sorted[lo];
    let b = sorted.get(lo + 1).copied().unwrap_or(a);
    Some(a + frac * (b - a))
}

/// One row of the describe table (one numeric column).
#[derive(Debug, Clone)]
pub struct DescribeRow {
    pub column: String,
    /// Non-null value count.
    pub count: usize,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Descriptive statistics for every numeric column, in table order.
///
/// Column stats are independent, so they are computed in parallel.
pub fn describe(table: &Table) -> Vec<DescribeRow> {
    let numeric: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| c.as_numeric().is_some())
        .collect();

    numeric
        .par_iter()
        .map(|col| {
            let values = col.numeric_values();
            DescribeRow {
                column: col.name().to_string(),
                count: values.len(),
                mean: mean(&values),
                stddev: sample_stddev(&values),
                min: values
                    .iter()
                    .copied()
                    .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)),
                q25: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q75: quantile(&values, 0.75),
                max: values
                    .iter()
                    .copied()
                    .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use crate::table::Table;

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        // h = 3 * 0.25 = 0.75 -> 1.0 + 0.75 * (2.0 - 1.0)
        assert!((quantile(&values, 0.25).unwrap() - 1.75).abs() < 1e-12);
        assert!((quantile(&values, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert!((quantile(&values, 1.0).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn quantile_of_single_value_is_that_value() {
        assert_eq!(quantile(&[5.0], 0.25), Some(5.0));
        assert_eq!(quantile(&[5.0], 0.75), Some(5.0));
    }

    #[test]
    fn sample_stddev_uses_n_minus_one() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sum of squared deviations is 32; 32 / 7 under the sample convention.
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_stddev(&values).unwrap() - expected).abs() < 1e-12);
        assert_eq!(sample_stddev(&[1.0]), None);
        assert_eq!(sample_stddev(&[3.0, 3.0]), Some(0.0));
    }

    #[test]
    fn describe_covers_numeric_columns_only() {
        let table = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(3.0), None]),
            Column::text("c", vec![Some("x".to_string()), None, None]),
        ])
        .unwrap();

        let rows = describe(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column, "a");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].mean, Some(2.0));
        assert_eq!(rows[0].min, Some(1.0));
        assert_eq!(rows[0].max, Some(3.0));
    }
}
