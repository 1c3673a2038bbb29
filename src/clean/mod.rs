//! The cleaning pipeline.
//!
//! `clean(table, plan)` applies the enabled transforms strictly in the
//! declared order (see `CleaningPlan::steps`), producing a new table plus a
//! per-step log. The pipeline never mutates its input and keeps no history;
//! callers that want undo keep the raw table and re-clean from it.
//!
//! Design goals:
//! - **Strict column validation** (unknown or wrong-typed targets fail the
//!   step with a clear error; the caller's table is untouched)
//! - **No silent NaN/Inf** (degenerate computations are rejected, not
//!   propagated)
//! - **Deterministic behavior** (first-seen category order, stable row order)

use crate::domain::{CleaningPlan, CleaningStep};
use crate::error::ExploreError;
use crate::table::{parse_date_cell, Table};

pub mod steps;

pub use steps::*;

/// One-hot candidates are capped so an accidental high-cardinality column
/// (ids, free text) cannot explode the schema from the TUI toggle.
pub const ONE_HOT_MAX_CARDINALITY: usize = 12;

/// What one step did to the table.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
}

impl StepReport {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// Cleaning output: the new table plus the per-step log.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: Table,
    pub log: Vec<StepReport>,
}

/// Apply the enabled steps of `plan` in declared order.
pub fn clean(table: &Table, plan: &CleaningPlan) -> Result<CleanOutcome, ExploreError> {
    let mut current = table.clone();
    let mut log = Vec::new();

    for step in plan.steps() {
        let rows_before = current.row_count();
        let columns_before = current.column_count();

        current = apply_step(&current, &step)?;

        let report = StepReport {
            step: step.display_name().to_string(),
            rows_before,
            rows_after: current.row_count(),
            columns_before,
            columns_after: current.column_count(),
        };
        log::debug!(
            "{}: rows {} -> {}, columns {} -> {}",
            report.step,
            report.rows_before,
            report.rows_after,
            report.columns_before,
            report.columns_after
        );
        log.push(report);
    }

    Ok(CleanOutcome {
        table: current,
        log,
    })
}

fn apply_step(table: &Table, step: &CleaningStep) -> Result<Table, ExploreError> {
    match step {
        CleaningStep::DropMissing => Ok(steps::drop_missing(table)),
        CleaningStep::Lowercase { columns } => steps::lowercase(table, columns),
        CleaningStep::DropDuplicates => Ok(steps::drop_duplicates(table)),
        CleaningStep::ParseDates { columns } => steps::parse_dates(table, columns),
        CleaningStep::RemoveOutliers => Ok(steps::remove_outliers(table)),
        CleaningStep::Standardize { columns } => steps::standardize(table, columns),
        CleaningStep::OneHotEncode { columns } => steps::one_hot_encode(table, columns),
        CleaningStep::BooleanToInt { columns } => steps::boolean_to_int(table, columns),
    }
}

/// Default targets for the column-scoped steps, used by the TUI toggles
/// (the CLI names columns explicitly instead).
pub fn lowercase_candidates(table: &Table) -> Vec<String> {
    text_columns(table)
}

/// Text columns whose non-null cells all parse as dates (and at least one
/// does), so a TUI toggle can never trip the reject policy.
pub fn parse_date_candidates(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter_map(|col| {
            let cells = col.as_text()?;
            let mut seen = false;
            for cell in cells.iter().flatten() {
                if parse_date_cell(cell).is_none() {
                    return None;
                }
                seen = true;
            }
            seen.then(|| col.name().to_string())
        })
        .collect()
}

pub fn standardize_candidates(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.as_numeric().is_some())
        .filter(|c| {
            let values = c.numeric_values();
            crate::stats::sample_stddev(&values).is_some_and(|sd| sd > 0.0)
        })
        .map(|c| c.name().to_string())
        .collect()
}

pub fn one_hot_candidates(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter_map(|col| {
            let cells = col.as_text()?;
            let mut distinct = std::collections::HashSet::new();
            for cell in cells.iter().flatten() {
                distinct.insert(cell.as_str());
                if distinct.len() > ONE_HOT_MAX_CARDINALITY {
                    return None;
                }
            }
            (!distinct.is_empty()).then(|| col.name().to_string())
        })
        .collect()
}

pub fn bool_to_int_candidates(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.as_boolean().is_some())
        .map(|c| c.name().to_string())
        .collect()
}

fn text_columns(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.as_text().is_some())
        .map(|c| c.name().to_string())
        .collect()
}
