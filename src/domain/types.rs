//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during cleaning and charting
//! - exported to JSON (saved series files)
//! - reloaded later for re-rendering or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Semantic type of a table column.
///
/// Classification happens once at ingest (or when a cleaning step changes a
/// column's type); both the cleaning pipeline and the chart builder consume
/// the tag instead of re-sniffing cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Temporal,
    Categorical,
    Boolean,
}

impl ColumnType {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Temporal => "temporal",
            ColumnType::Categorical => "categorical",
            ColumnType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which chart to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Line,
    Bar,
    Histogram,
    Box,
    Pie,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
            ChartKind::Box => "box",
            ChartKind::Pie => "pie",
        }
    }

    /// Single-variable kinds take only an x column.
    pub fn is_single_variable(self) -> bool {
        matches!(self, ChartKind::Histogram | ChartKind::Pie)
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Date-aware aggregation granularity.
///
/// Only meaningful when the x column is temporal; ignored otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    None,
    Yearly,
    Monthly,
    Daily,
}

impl Aggregation {
    pub fn display_name(self) -> &'static str {
        match self {
            Aggregation::None => "none",
            Aggregation::Yearly => "yearly",
            Aggregation::Monthly => "monthly",
            Aggregation::Daily => "daily",
        }
    }
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One chart request against one table snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    /// X column name (the only column for histogram/pie).
    pub x: String,
    /// Y column name; absent for the single-variable kinds.
    pub y: Option<String>,
    pub aggregation: Aggregation,
}

/// X/Y series produced for a chart request.
///
/// The payload is a tagged variant per chart family so each renderer consumes
/// exactly the shape it needs; no renderer re-derives grouping from raw rows
/// except the box plot, which owns its quartile work by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub data: SeriesData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum SeriesData {
    /// Scatter/line/bar: effective x coordinates, y values, and tick labels
    /// for the x positions that have one (dates, categories, bins).
    Xy {
        x: Vec<f64>,
        y: Vec<f64>,
        ticks: Vec<(f64, String)>,
    },
    /// Histogram: `edges.len() == counts.len() + 1`.
    Histogram { edges: Vec<f64>, counts: Vec<usize> },
    /// Box: category -> raw y values, first-appearance order.
    Grouped { groups: Vec<(String, Vec<f64>)> },
    /// Pie: slice labels in first-appearance order and their value counts.
    Pie {
        labels: Vec<String>,
        counts: Vec<usize>,
    },
}

impl SeriesData {
    /// Number of plotted elements (points, bins, groups, or slices).
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Xy { x, .. } => x.len(),
            SeriesData::Histogram { counts, .. } => counts.len(),
            SeriesData::Grouped { groups } => groups.len(),
            SeriesData::Pie { labels, .. } => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single cleaning transform with its targets.
///
/// Variants appear here in the fixed application order; `CleaningPlan::steps`
/// is the only place that order is spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CleaningStep {
    DropMissing,
    Lowercase { columns: Vec<String> },
    DropDuplicates,
    ParseDates { columns: Vec<String> },
    RemoveOutliers,
    Standardize { columns: Vec<String> },
    OneHotEncode { columns: Vec<String> },
    BooleanToInt { columns: Vec<String> },
}

impl CleaningStep {
    pub fn display_name(&self) -> &'static str {
        match self {
            CleaningStep::DropMissing => "drop-missing",
            CleaningStep::Lowercase { .. } => "lowercase",
            CleaningStep::DropDuplicates => "drop-duplicates",
            CleaningStep::ParseDates { .. } => "parse-dates",
            CleaningStep::RemoveOutliers => "remove-outliers",
            CleaningStep::Standardize { .. } => "standardize",
            CleaningStep::OneHotEncode { .. } => "one-hot",
            CleaningStep::BooleanToInt { .. } => "bool-to-int",
        }
    }
}

/// The user's chosen set of cleaning transforms.
///
/// One slot per step; empty column lists and false flags are no-ops. The
/// pipeline applies enabled slots strictly in declared order regardless of
/// how the caller filled them in (outlier removal must see raw distributions
/// before standardization shifts them; one-hot runs after date/boolean
/// handling so it only touches genuinely categorical text columns).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningPlan {
    pub drop_missing: bool,
    pub lowercase: Vec<String>,
    pub drop_duplicates: bool,
    pub parse_dates: Vec<String>,
    pub remove_outliers: bool,
    pub standardize: Vec<String>,
    pub one_hot: Vec<String>,
    pub bool_to_int: Vec<String>,
}

impl CleaningPlan {
    /// Enabled steps in the fixed application order.
    pub fn steps(&self) -> Vec<CleaningStep> {
        let mut out = Vec::new();
        if self.drop_missing {
            out.push(CleaningStep::DropMissing);
        }
        if !self.lowercase.is_empty() {
            out.push(CleaningStep::Lowercase {
                columns: self.lowercase.clone(),
            });
        }
        if self.drop_duplicates {
            out.push(CleaningStep::DropDuplicates);
        }
        if !self.parse_dates.is_empty() {
            out.push(CleaningStep::ParseDates {
                columns: self.parse_dates.clone(),
            });
        }
        if self.remove_outliers {
            out.push(CleaningStep::RemoveOutliers);
        }
        if !self.standardize.is_empty() {
            out.push(CleaningStep::Standardize {
                columns: self.standardize.clone(),
            });
        }
        if !self.one_hot.is_empty() {
            out.push(CleaningStep::OneHotEncode {
                columns: self.one_hot.clone(),
            });
        }
        if !self.bool_to_int.is_empty() {
            out.push(CleaningStep::BooleanToInt {
                columns: self.bool_to_int.clone(),
            });
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.steps().is_empty()
    }
}

/// Where the session's table comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A CSV or Excel file on disk, with an optional sheet name for workbooks.
    File {
        path: PathBuf,
        sheet: Option<String>,
    },
    /// The seeded synthetic demo dataset.
    Demo { seed: u64, rows: usize },
}

impl DataSource {
    /// Short label for headers and report metadata.
    pub fn label(&self) -> String {
        match self {
            DataSource::File { path, sheet: None } => path.display().to_string(),
            DataSource::File {
                path,
                sheet: Some(sheet),
            } => format!("{} [{sheet}]", path.display()),
            DataSource::Demo { seed, rows } => format!("demo (seed={seed}, rows={rows})"),
        }
    }
}

/// A full session's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub source: DataSource,
    pub plan: CleaningPlan,
}

/// A saved series file (JSON).
///
/// The "portable" representation of a built chart: the request that produced
/// it plus the aggregated series, so `ds plot` can re-render without the
/// original dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub source: String,
    pub request: ChartRequest,
    pub series: AggregatedSeries,
}
