//! Seeded synthetic demo dataset.
//!
//! `ds tui --demo` (and the test suite) need a table without asking the user
//! for a file. The generated data deliberately exercises every cleaning step:
//! it contains missing cells, exact duplicate rows, price outliers, text
//! categories, booleans, and a date column.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Poisson};

use crate::error::AppError;
use crate::table::{Column, Table};

const REGIONS: [&str; 4] = ["north", "south", "east", "west"];

/// Probability that a row exactly duplicates its predecessor.
const DUP_PROB: f64 = 0.05;
/// Probability of a missing `units` / `region` cell.
const MISSING_UNITS_PROB: f64 = 0.04;
const MISSING_REGION_PROB: f64 = 0.03;
/// Probability and magnitude of a price outlier.
const PRICE_JUMP_PROB: f64 = 0.03;
const PRICE_JUMP_K: f64 = 4.0;

/// Generate the demo sales table: `order_date`, `region`, `units`,
/// `unit_price`, `returned`.
pub fn generate_demo_table(seed: u64, rows: usize) -> Result<Table, AppError> {
    if rows == 0 {
        return Err(AppError::new(2, "Demo row count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let units_dist = Poisson::new(20.0_f64)
        .map_err(|e| AppError::new(4, format!("Demo units distribution error: {e}")))?;
    let price_dist = LogNormal::new(3.0, 0.25)
        .map_err(|e| AppError::new(4, format!("Demo price distribution error: {e}")))?;

    let start = NaiveDate::from_ymd_opt(2021, 1, 1)
        .ok_or_else(|| AppError::new(4, "Demo start date out of range."))?;

    let mut dates: Vec<Option<NaiveDate>> = Vec::with_capacity(rows);
    let mut regions: Vec<Option<String>> = Vec::with_capacity(rows);
    let mut units: Vec<Option<f64>> = Vec::with_capacity(rows);
    let mut prices: Vec<Option<f64>> = Vec::with_capacity(rows);
    let mut returned: Vec<Option<bool>> = Vec::with_capacity(rows);

    let mut date = start;
    for i in 0..rows {
        if i > 0 && rng.gen_bool(DUP_PROB) {
            dates.push(dates[i - 1]);
            regions.push(regions[i - 1].clone());
            units.push(units[i - 1]);
            prices.push(prices[i - 1]);
            returned.push(returned[i - 1]);
            continue;
        }

        date = date + Duration::days(rng.gen_range(0..=3));
        dates.push(Some(date));

        regions.push(if rng.gen_bool(MISSING_REGION_PROB) {
            None
        } else {
            Some(REGIONS[rng.gen_range(0..REGIONS.len())].to_string())
        });

        units.push(if rng.gen_bool(MISSING_UNITS_PROB) {
            None
        } else {
            Some(units_dist.sample(&mut rng).round())
        });

        let mut price: f64 = price_dist.sample(&mut rng);
        if rng.gen_bool(PRICE_JUMP_PROB) {
            price *= PRICE_JUMP_K;
        }
        prices.push(Some((price * 100.0).round() / 100.0));

        returned.push(Some(rng.gen_bool(0.08)));
    }

    Table::new(vec![
        Column::temporal("order_date", dates),
        Column::text("region", regions),
        Column::numeric("units", units),
        Column::numeric("unit_price", prices),
        Column::boolean("returned", returned),
    ])
    .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnType;

    #[test]
    fn demo_table_has_the_expected_schema() {
        let table = generate_demo_table(42, 200).unwrap();
        assert_eq!(table.row_count(), 200);
        let types: Vec<ColumnType> = table.schema().into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Temporal,
                ColumnType::Categorical,
                ColumnType::Numeric,
                ColumnType::Numeric,
                ColumnType::Boolean,
            ]
        );
    }

    #[test]
    fn same_seed_reproduces_the_table() {
        let a = generate_demo_table(7, 100).unwrap();
        let b = generate_demo_table(7, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_demo_table(1, 100).unwrap();
        let b = generate_demo_table(2, 100).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn demo_data_exercises_the_cleaning_steps() {
        let table = generate_demo_table(42, 500).unwrap();
        // Missing cells and duplicates are present, so drop-missing and
        // drop-duplicates have something to do.
        let missing: usize = table.columns().iter().map(|c| c.null_count()).sum();
        assert!(missing > 0);
        assert!(table.duplicate_row_count() > 0);
    }
}
