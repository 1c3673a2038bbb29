//! Shared "session pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load/ingest -> clean -> summarize
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::clean::{clean, StepReport};
use crate::data::generate_demo_table;
use crate::domain::{DataSource, SessionConfig};
use crate::error::AppError;
use crate::io::ingest::{load_table, IngestedTable};
use crate::report::{summarize, DatasetSummary};
use crate::table::Table;

/// All computed outputs of one session run.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    /// The raw ingest (kept so the caller can re-clean without reloading).
    pub ingest: IngestedTable,
    pub cleaned: Table,
    pub clean_log: Vec<StepReport>,
    /// Summary of the cleaned table.
    pub summary: DatasetSummary,
}

/// Load the configured source and run cleaning + summary.
pub fn run_session(config: &SessionConfig) -> Result<SessionOutput, AppError> {
    let ingest = load_source(&config.source)?;
    run_session_with_table(config, ingest)
}

/// Run cleaning + summary against an already-ingested table.
///
/// This is useful for the TUI where we want to re-clean after a toggle
/// without re-reading the file.
pub fn run_session_with_table(
    config: &SessionConfig,
    ingest: IngestedTable,
) -> Result<SessionOutput, AppError> {
    let outcome = clean(&ingest.table, &config.plan).map_err(AppError::from)?;
    let summary = summarize(&outcome.table);

    Ok(SessionOutput {
        ingest,
        cleaned: outcome.table,
        clean_log: outcome.log,
        summary,
    })
}

/// Turn a data source into an ingested table.
pub fn load_source(source: &DataSource) -> Result<IngestedTable, AppError> {
    match source {
        DataSource::File { path, sheet } => load_table(path, sheet.as_deref()),
        DataSource::Demo { seed, rows } => {
            let table = generate_demo_table(*seed, *rows)?;
            let rows_read = table.row_count();
            Ok(IngestedTable {
                table,
                format: "demo",
                rows_read,
                row_errors: Vec::new(),
            })
        }
    }
}
