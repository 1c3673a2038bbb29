//! Shared domain types.
//!
//! This module defines:
//!
//! - column-type classification (`ColumnType`)
//! - the cleaning plan and its step variants (`CleaningPlan`, `CleaningStep`)
//! - chart requests and their output series (`ChartRequest`, `AggregatedSeries`)
//! - session configuration derived from CLI flags (`SessionConfig`)

pub mod types;

pub use types::*;
