//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the dataset (file, picker, or demo)
//! - runs cleaning + summary
//! - prints reports/charts
//! - writes optional exports

use chrono::Local;
use clap::Parser;

use crate::cli::{
    picker, ChartArgs, CleanCmdArgs, Command, LoadArgs, PlotArgs, ProfileArgs, TuiArgs,
};
use crate::domain::{ChartRequest, DataSource, SessionConfig};
use crate::error::AppError;
use crate::io::counter::{ExportCounter, FileCounter};
use crate::report::ReportMeta;

pub mod pipeline;

/// Entry point for the `ds` binary.
pub fn run() -> Result<(), AppError> {
    // Optional .env for the export-counter path and friends.
    dotenvy::dotenv().ok();

    // We want `ds` and `ds sales.csv` to behave like `ds tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal, so only line-oriented subcommands log.
    if !matches!(cli.command, Command::Tui(_)) {
        let _ = env_logger::try_init();
    }

    match cli.command {
        Command::Clean(args) => handle_clean(args),
        Command::Profile(args) => handle_profile(args),
        Command::Chart(args) => handle_chart(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_clean(args: CleanCmdArgs) -> Result<(), AppError> {
    let config = SessionConfig {
        source: resolve_source(&args.load)?,
        plan: args.clean.to_plan(),
    };
    let run = pipeline::run_session(&config)?;

    println!("{}", crate::report::format_clean_log(&run.clean_log));
    println!(
        "Shape after cleaning: {} rows x {} columns",
        run.cleaned.row_count(),
        run.cleaned.column_count()
    );
    if args.preview > 0 {
        println!();
        print!("{}", crate::report::format_preview(&run.cleaned, args.preview));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_table_csv(path, &run.cleaned)?;
        println!("\nWrote cleaned table: {}", path.display());
    }

    Ok(())
}

fn handle_profile(args: ProfileArgs) -> Result<(), AppError> {
    let config = SessionConfig {
        source: resolve_source(&args.load)?,
        plan: args.clean.to_plan(),
    };
    let run = pipeline::run_session(&config)?;

    println!("{}", crate::report::format_summary(&run.summary, &config.source));
    if !run.clean_log.is_empty() {
        println!("{}", crate::report::format_clean_log(&run.clean_log));
    }
    println!("{}", crate::report::format_describe(&run.summary));

    if let Some(path) = &args.export_html {
        let meta = ReportMeta {
            title: args.title.clone(),
            description: args.description.clone(),
            source: config.source.label(),
            generated: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        crate::io::export::write_report_html(path, &run.summary, &meta)?;

        // The counter lives behind its atomic-increment contract; the core
        // never touches it.
        let counter = FileCounter::from_env();
        let count = counter.increment()?;
        println!("Wrote report: {} (export #{count})", path.display());
    }

    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let config = SessionConfig {
        source: resolve_source(&args.load)?,
        plan: args.clean.to_plan(),
    };
    let run = pipeline::run_session(&config)?;

    let request = ChartRequest {
        kind: args.kind,
        x: args.x.clone(),
        y: args.y.clone(),
        aggregation: args.agg,
    };
    let series = crate::chart::build_series(&run.cleaned, &request).map_err(AppError::from)?;

    print!(
        "{}",
        crate::plot::render_series(&series, args.width, args.height)
    );

    if let Some(path) = &args.export_series {
        crate::io::series::write_series_json(path, &config.source.label(), &request, &series)?;
        println!("\nWrote series: {}", path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::series::read_series_json(&args.series)?;
    print!(
        "{}",
        crate::plot::render_series(&file.series, args.width, args.height)
    );
    Ok(())
}

/// Resolve `-f`/picker into a concrete data source.
fn resolve_source(load: &LoadArgs) -> Result<DataSource, AppError> {
    let path = match &load.file {
        Some(path) => picker::validate_data_path(path)?,
        None => picker::prompt_for_data_path()?,
    };
    Ok(DataSource::File {
        path,
        sheet: load.sheet.clone(),
    })
}

/// Resolve the TUI's source, which may be the demo dataset.
pub(crate) fn resolve_tui_source(args: &TuiArgs) -> Result<DataSource, AppError> {
    if args.demo {
        return Ok(DataSource::Demo {
            seed: args.seed,
            rows: args.rows,
        });
    }
    resolve_source(&args.load)
}

/// Rewrite argv so `ds` defaults to `ds tui`.
///
/// Rules:
/// - `ds`                      -> `ds tui`
/// - `ds sales.csv`            -> `ds tui -f sales.csv`
/// - `ds --demo ...`           -> `ds tui --demo ...`
/// - `ds --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "clean" | "profile" | "chart" | "plot" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // A bare data-file path becomes "tui -f <path>".
    if picker::validate_data_path(std::path::Path::new(&arg1)).is_ok() {
        argv.splice(1..2, ["tui".to_string(), "-f".to_string(), arg1]);
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["ds"])), args(&["ds", "tui"]));
    }

    #[test]
    fn leading_flag_goes_to_tui() {
        assert_eq!(
            rewrite_args(args(&["ds", "--demo"])),
            args(&["ds", "tui", "--demo"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["ds", "profile", "-f", "a.csv"])),
            args(&["ds", "profile", "-f", "a.csv"])
        );
        assert_eq!(rewrite_args(args(&["ds", "--help"])), args(&["ds", "--help"]));
    }

    #[test]
    fn existing_data_path_becomes_tui_file() {
        let path = std::env::temp_dir().join(format!("datascope_app_{}.csv", std::process::id()));
        std::fs::write(&path, "a\n1\n").unwrap();
        let path_str = path.display().to_string();

        assert_eq!(
            rewrite_args(args(&["ds", &path_str])),
            args(&["ds", "tui", "-f", &path_str])
        );

        std::fs::remove_file(&path).ok();
    }
}
