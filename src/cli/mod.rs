//! Command-line parsing for the data explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the cleaning/charting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Aggregation, ChartKind, CleaningPlan};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ds", version, about = "Tabular data explorer: clean, profile, chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply cleaning steps, print the clean log, and optionally export CSV.
    Clean(CleanCmdArgs),
    /// Print the dataset summary and describe table, optionally export HTML.
    Profile(ProfileArgs),
    /// Build one chart and render it in the terminal.
    Chart(ChartArgs),
    /// Re-render a previously exported series JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying clean/chart pipeline as the other
    /// subcommands, but renders results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options for choosing the input dataset.
#[derive(Debug, Parser, Clone)]
pub struct LoadArgs {
    /// CSV or Excel file to explore (an interactive picker prompts if omitted).
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Sheet name for Excel workbooks (first sheet if omitted).
    #[arg(long)]
    pub sheet: Option<String>,
}

/// Options enabling individual cleaning steps.
///
/// Steps always apply in the pipeline's fixed order regardless of flag order
/// on the command line.
#[derive(Debug, Parser, Clone, Default)]
pub struct CleanArgs {
    /// Remove rows containing any missing value.
    #[arg(long)]
    pub drop_missing: bool,

    /// Text columns to convert to lowercase (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "COLS")]
    pub lowercase: Vec<String>,

    /// Remove exact duplicate rows (first occurrence kept).
    #[arg(long)]
    pub drop_duplicates: bool,

    /// Text columns to reinterpret as calendar dates (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "COLS")]
    pub parse_dates: Vec<String>,

    /// Remove IQR outliers across all numeric columns.
    #[arg(long)]
    pub remove_outliers: bool,

    /// Numeric columns to standardize to mean 0 / stddev 1 (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "COLS")]
    pub standardize: Vec<String>,

    /// Text columns to one-hot encode (comma-separated).
    #[arg(long = "one-hot", value_delimiter = ',', value_name = "COLS")]
    pub one_hot: Vec<String>,

    /// Boolean columns to cast to 0/1 (comma-separated).
    #[arg(long = "bool-to-int", value_delimiter = ',', value_name = "COLS")]
    pub bool_to_int: Vec<String>,
}

impl CleanArgs {
    pub fn to_plan(&self) -> CleaningPlan {
        CleaningPlan {
            drop_missing: self.drop_missing,
            lowercase: self.lowercase.clone(),
            drop_duplicates: self.drop_duplicates,
            parse_dates: self.parse_dates.clone(),
            remove_outliers: self.remove_outliers,
            standardize: self.standardize.clone(),
            one_hot: self.one_hot.clone(),
            bool_to_int: self.bool_to_int.clone(),
        }
    }
}

/// `ds clean` options.
#[derive(Debug, Parser)]
pub struct CleanCmdArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    #[command(flatten)]
    pub clean: CleanArgs,

    /// Write the cleaned table to this CSV path.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Preview rows to print after cleaning.
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

/// `ds profile` options.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    #[command(flatten)]
    pub clean: CleanArgs,

    /// Export the summary report as a standalone HTML document.
    #[arg(long = "export-html", value_name = "HTML")]
    pub export_html: Option<PathBuf>,

    /// Report title.
    #[arg(long, default_value = "Profiling Report")]
    pub title: String,

    /// Report description shown under the title.
    #[arg(long, default_value = "")]
    pub description: String,
}

/// `ds chart` options.
#[derive(Debug, Parser)]
pub struct ChartArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    #[command(flatten)]
    pub clean: CleanArgs,

    /// Which chart to draw.
    #[arg(long, value_enum)]
    pub kind: ChartKind,

    /// X column (the only column for histogram/pie).
    #[arg(short = 'x', long)]
    pub x: String,

    /// Y column (required for scatter/line/bar/box).
    #[arg(short = 'y', long)]
    pub y: Option<String>,

    /// Date aggregation granularity (applies when the x column is temporal).
    #[arg(long, value_enum, default_value_t = Aggregation::None)]
    pub agg: Aggregation,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the aggregated series to JSON.
    #[arg(long = "export-series", value_name = "JSON")]
    pub export_series: Option<PathBuf>,
}

/// Options for re-rendering a saved series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Series JSON file produced by `ds chart --export-series`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// `ds tui` options.
#[derive(Debug, Parser)]
pub struct TuiArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Explore the synthetic demo dataset instead of a file.
    #[arg(long)]
    pub demo: bool,

    /// Random seed for the demo dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Row count for the demo dataset.
    #[arg(long, default_value_t = 200)]
    pub rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_args_map_to_plan_slots() {
        let args = CleanArgs {
            drop_missing: true,
            lowercase: vec!["region".to_string()],
            standardize: vec!["units".to_string(), "price".to_string()],
            ..CleanArgs::default()
        };
        let plan = args.to_plan();
        assert!(plan.drop_missing);
        assert_eq!(plan.lowercase, vec!["region"]);
        assert_eq!(plan.standardize.len(), 2);
        assert!(!plan.drop_duplicates);
    }

    #[test]
    fn comma_lists_split_into_columns() {
        let cli = Cli::try_parse_from([
            "ds", "clean", "-f", "data.csv", "--lowercase", "a,b", "--drop-missing",
        ])
        .unwrap();
        match cli.command {
            Command::Clean(args) => {
                assert_eq!(args.clean.lowercase, vec!["a", "b"]);
                assert!(args.clean.drop_missing);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
