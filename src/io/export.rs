//! Exports: the cleaned table as CSV and the summary report as HTML.
//!
//! The HTML artifact is the "report document" the session can hand out for
//! download; it is a self-contained page with no external assets.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::report::{DatasetSummary, ReportMeta};
use crate::stats::DescribeRow;
use crate::table::Table;

/// Write a table to CSV (headers + display-formatted cells, nulls empty).
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writer
        .write_record(table.column_names())
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.cell_display(row))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write the dataset summary as a standalone HTML report.
pub fn write_report_html(
    path: &Path,
    summary: &DatasetSummary,
    meta: &ReportMeta,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create report '{}': {e}", path.display()),
        )
    })?;

    let html = render_report_html(summary, meta);
    file.write_all(html.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write report: {e}")))?;
    Ok(())
}

fn render_report_html(summary: &DatasetSummary, meta: &ReportMeta) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(&meta.title)));
    out.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; margin: 1em 0; }\n\
         th, td { border: 1px solid #999; padding: 0.3em 0.8em; text-align: right; }\n\
         th { background: #eee; }\n\
         td:first-child, th:first-child { text-align: left; }\n\
         </style>\n</head>\n<body>\n",
    );

    out.push_str(&format!("<h1>{}</h1>\n", escape(&meta.title)));
    if !meta.description.is_empty() {
        out.push_str(&format!("<p>{}</p>\n", escape(&meta.description)));
    }
    out.push_str(&format!(
        "<p>Source: {} &middot; generated {}</p>\n",
        escape(&meta.source),
        escape(&meta.generated)
    ));

    out.push_str(&format!(
        "<p>{} rows &times; {} columns &middot; {} duplicate row(s)</p>\n",
        summary.rows, summary.columns, summary.duplicate_rows
    ));

    out.push_str("<h2>Columns</h2>\n<table>\n<tr><th>column</th><th>type</th><th>missing</th></tr>\n");
    for col in &summary.column_summaries {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&col.name),
            col.ty,
            col.missing
        ));
    }
    out.push_str("</table>\n");

    if !summary.describe.is_empty() {
        out.push_str(
            "<h2>Descriptive statistics</h2>\n<table>\n\
             <tr><th>column</th><th>count</th><th>mean</th><th>std</th>\
             <th>min</th><th>25%</th><th>50%</th><th>75%</th><th>max</th></tr>\n",
        );
        for row in &summary.describe {
            out.push_str(&describe_row_html(row));
        }
        out.push_str("</table>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn describe_row_html(row: &DescribeRow) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&row.column),
        row.count,
        fmt_opt(row.mean),
        fmt_opt(row.stddev),
        fmt_opt(row.min),
        fmt_opt(row.q25),
        fmt_opt(row.median),
        fmt_opt(row.q75),
        fmt_opt(row.max),
    )
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => "-".to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
