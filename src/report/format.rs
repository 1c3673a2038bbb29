//! Formatted terminal output for summaries, clean logs, and previews.

use crate::clean::StepReport;
use crate::domain::DataSource;
use crate::report::DatasetSummary;
use crate::table::Table;

/// Format the session header + dataset overview.
pub fn format_summary(summary: &DatasetSummary, source: &DataSource) -> String {
    let mut out = String::new();

    out.push_str("=== ds - dataset summary ===\n");
    out.push_str(&format!("Source: {}\n", source.label()));
    out.push_str(&format!(
        "Shape: {} rows x {} columns | duplicates: {}\n",
        summary.rows, summary.columns, summary.duplicate_rows
    ));

    out.push_str("\nColumns:\n");
    out.push_str(
        format!("{:<24} {:<12} {:>8}\n", "name", "type", "missing").trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<24} {:-<12} {:-<8}\n", "", "", "").trim_end(),
    );
    out.push('\n');
    for col in &summary.column_summaries {
        out.push_str(
            format!(
                "{:<24} {:<12} {:>8}\n",
                truncate(&col.name, 24),
                col.ty.display_name(),
                col.missing
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the numeric describe table.
pub fn format_describe(summary: &DatasetSummary) -> String {
    if summary.describe.is_empty() {
        return "No numeric columns.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Descriptive statistics:\n");
    out.push_str(
        format!(
            "{:<20} {:>7} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        )
        .trim_end(),
    );
    out.push('\n');

    for row in &summary.describe {
        out.push_str(
            format!(
                "{:<20} {:>7} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
                truncate(&row.column, 20),
                row.count,
                fmt_opt(row.mean),
                fmt_opt(row.stddev),
                fmt_opt(row.min),
                fmt_opt(row.q25),
                fmt_opt(row.median),
                fmt_opt(row.q75),
                fmt_opt(row.max),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the clean log (one line per applied step).
pub fn format_clean_log(log: &[StepReport]) -> String {
    if log.is_empty() {
        return "No cleaning steps applied.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Cleaning steps:\n");
    for report in log {
        let mut line = format!(
            "- {:<16} rows {} -> {}",
            report.step, report.rows_before, report.rows_after
        );
        if report.columns_after != report.columns_before {
            line.push_str(&format!(
                ", columns {} -> {}",
                report.columns_before, report.columns_after
            ));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Format the first `n` rows as an aligned preview table.
pub fn format_preview(table: &Table, n: usize) -> String {
    let rows = table.row_count().min(n);
    let mut out = String::new();

    let mut widths: Vec<usize> = table
        .column_names()
        .iter()
        .map(|name| name.chars().count().clamp(4, 18))
        .collect();
    let cells: Vec<Vec<String>> = (0..rows)
        .map(|row| {
            table
                .columns()
                .iter()
                .enumerate()
                .map(|(idx, col)| {
                    let cell = truncate(&col.cell_display(row), 18);
                    widths[idx] = widths[idx].max(cell.chars().count());
                    cell
                })
                .collect()
        })
        .collect();

    for (idx, name) in table.column_names().iter().enumerate() {
        out.push_str(&format!(
            "{:<width$} ",
            truncate(name, 18),
            width = widths[idx]
        ));
    }
    out.push('\n');
    for row in cells {
        for (idx, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$} ", cell, width = widths[idx]));
        }
        out.push('\n');
    }
    if table.row_count() > rows {
        out.push_str(&format!("... {} more row(s)\n", table.row_count() - rows));
    }
    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::summarize;
    use crate::table::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("units", vec![Some(10.0), Some(20.0)]),
            Column::text(
                "region",
                vec![Some("north".to_string()), Some("south".to_string())],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn summary_lists_each_column() {
        let txt = format_summary(&summarize(&table()), &DataSource::Demo { seed: 1, rows: 2 });
        assert!(txt.contains("2 rows x 2 columns"));
        assert!(txt.contains("units"));
        assert!(txt.contains("categorical"));
    }

    #[test]
    fn describe_renders_numeric_rows() {
        let txt = format_describe(&summarize(&table()));
        assert!(txt.contains("units"));
        assert!(txt.contains("15.0000"));
    }

    #[test]
    fn clean_log_shows_row_deltas() {
        let log = vec![StepReport {
            step: "drop-missing".to_string(),
            rows_before: 10,
            rows_after: 8,
            columns_before: 3,
            columns_after: 3,
        }];
        let txt = format_clean_log(&log);
        assert!(txt.contains("drop-missing"));
        assert!(txt.contains("10 -> 8"));
    }

    #[test]
    fn preview_caps_row_count() {
        let txt = format_preview(&table(), 1);
        assert!(txt.contains("... 1 more row(s)"));
    }
}
