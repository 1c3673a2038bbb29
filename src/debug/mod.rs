//! Debug bundle writer for inspecting a session's inputs and outputs.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::SessionOutput;
use crate::domain::DataSource;
use crate::error::AppError;

/// Write a markdown bundle (schema, clean log, describe table) under `debug/`.
pub fn write_debug_bundle(
    source: &DataSource,
    run: &SessionOutput,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("ds_debug_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;

    emit(&mut file, "# ds debug bundle")?;
    emit(&mut file, &format!("- generated: {}", Local::now().to_rfc3339()))?;
    emit(&mut file, &format!("- source: {}", source.label()))?;
    emit(&mut file, &format!("- format: {}", run.ingest.format))?;
    emit(&mut file, &format!("- rows_read: {}", run.ingest.rows_read))?;
    emit(
        &mut file,
        &format!(
            "- cleaned: {} rows x {} columns",
            run.cleaned.row_count(),
            run.cleaned.column_count()
        ),
    )?;

    emit(&mut file, "\n## Schema (cleaned)")?;
    emit(&mut file, "| column | type | missing |")?;
    emit(&mut file, "| - | - | - |")?;
    for col in &run.summary.column_summaries {
        emit(
            &mut file,
            &format!("| {} | {} | {} |", col.name, col.ty, col.missing),
        )?;
    }

    emit(&mut file, "\n## Clean log")?;
    if run.clean_log.is_empty() {
        emit(&mut file, "(no steps applied)")?;
    } else {
        emit(&mut file, "| step | rows before | rows after | columns |")?;
        emit(&mut file, "| - | - | - | - |")?;
        for report in &run.clean_log {
            emit(
                &mut file,
                &format!(
                    "| {} | {} | {} | {} -> {} |",
                    report.step,
                    report.rows_before,
                    report.rows_after,
                    report.columns_before,
                    report.columns_after
                ),
            )?;
        }
    }

    emit(&mut file, "\n## Describe")?;
    emit(&mut file, "| column | count | mean | std | min | 25% | 50% | 75% | max |")?;
    emit(&mut file, "| - | - | - | - | - | - | - | - | - |")?;
    for row in &run.summary.describe {
        emit(
            &mut file,
            &format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                row.column,
                row.count,
                fmt_opt(row.mean),
                fmt_opt(row.stddev),
                fmt_opt(row.min),
                fmt_opt(row.q25),
                fmt_opt(row.median),
                fmt_opt(row.q75),
                fmt_opt(row.max)
            ),
        )?;
    }

    if !run.ingest.row_errors.is_empty() {
        emit(&mut file, "\n## Ingest row errors")?;
        for err in &run.ingest.row_errors {
            emit(&mut file, &format!("- line {}: {}", err.line, err.message))?;
        }
    }

    Ok(path)
}

fn emit(file: &mut File, line: &str) -> Result<(), AppError> {
    writeln!(file, "{line}").map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => "-".to_string(),
    }
}
