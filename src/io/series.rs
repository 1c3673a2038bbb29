//! Read/write series JSON files.
//!
//! Series JSON is the "portable" representation of a built chart:
//! - the request (kind, columns, aggregation)
//! - the aggregated x/y payload
//!
//! `ds plot --series out.json` re-renders one without the original dataset.
//! The schema is defined by `domain::SeriesFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{AggregatedSeries, ChartRequest, SeriesFile};
use crate::error::AppError;

/// Write a series JSON file.
pub fn write_series_json(
    path: &Path,
    source: &str,
    request: &ChartRequest,
    series: &AggregatedSeries,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create series JSON '{}': {e}", path.display()),
        )
    })?;

    let out = SeriesFile {
        tool: "ds".to_string(),
        source: source.to_string(),
        request: request.clone(),
        series: series.clone(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(4, format!("Failed to write series JSON: {e}")))?;
    Ok(())
}

/// Read a series JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open series JSON '{}': {e}", path.display()),
        )
    })?;
    let series: SeriesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Aggregation, ChartKind, SeriesData};

    #[test]
    fn series_json_round_trips() {
        let request = ChartRequest {
            kind: ChartKind::Bar,
            x: "day".to_string(),
            y: Some("units".to_string()),
            aggregation: Aggregation::Yearly,
        };
        let series = AggregatedSeries {
            kind: ChartKind::Bar,
            x_label: "day (yearly)".to_string(),
            y_label: "sum(units)".to_string(),
            data: SeriesData::Xy {
                x: vec![2021.0, 2022.0],
                y: vec![30.0, 30.0],
                ticks: vec![(2021.0, "2021".to_string()), (2022.0, "2022".to_string())],
            },
        };

        let path = std::env::temp_dir().join(format!(
            "datascope_series_{}.json",
            std::process::id()
        ));
        write_series_json(&path, "demo", &request, &series).unwrap();
        let loaded = read_series_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.tool, "ds");
        assert_eq!(loaded.request.x, "day");
        match loaded.series.data {
            SeriesData::Xy { x, y, .. } => {
                assert_eq!(x, vec![2021.0, 2022.0]);
                assert_eq!(y, vec![30.0, 30.0]);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
