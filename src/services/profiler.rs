//! Dataset profiling orchestrator.
//!
//! Pure, synchronous and deterministic: the same dataset always yields the
//! same profile, and independent datasets can be profiled concurrently with
//! no coordination.

use crate::config::AnalysisOptions;
use crate::error::ProfileError;
use crate::models::{
    CellValue, ColumnProfile, ColumnType, Dataset, DatasetProfile,
};
use crate::services::{correlation, inference, outliers, quality, stats};

#[derive(Debug, Clone, Default)]
pub struct DatasetProfiler {
    options: AnalysisOptions,
}

impl DatasetProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Profile every column of the dataset and derive the dataset-level
    /// summary. The only fatal input is an empty row sequence.
    pub fn profile(&self, dataset: &Dataset) -> Result<DatasetProfile, ProfileError> {
        if dataset.is_empty() {
            return Err(ProfileError::EmptyDataset);
        }

        let total_rows = dataset.row_count();
        log::debug!(
            "Profiling dataset: {} rows, {} columns",
            total_rows,
            dataset.columns().len()
        );

        let mut columns = Vec::new();
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        let mut numeric_series: Vec<Vec<Option<f64>>> = Vec::new();

        for name in dataset.columns() {
            let values = dataset.column_values(name);
            let profile = self.profile_column(name, &values, total_rows);

            match profile.column_type {
                ColumnType::Numeric => {
                    numeric_columns.push(name.clone());
                    numeric_series.push(numeric_option_series(&values));
                }
                ColumnType::Categorical => categorical_columns.push(name.clone()),
                _ => {}
            }
            columns.push(profile);
        }

        let correlation_matrix = correlation::correlation_matrix(&numeric_series);
        let overall_quality = quality::overall_quality(&columns);
        let missing_data_pattern = quality::missing_data_pattern(&columns);

        Ok(DatasetProfile {
            total_rows,
            total_columns: columns.len(),
            columns,
            numeric_columns,
            categorical_columns,
            overall_quality,
            missing_data_pattern,
            correlation_matrix,
        })
    }

    fn profile_column(
        &self,
        name: &str,
        values: &[&CellValue],
        total_rows: usize,
    ) -> ColumnProfile {
        let missing_count = values.iter().filter(|v| v.is_missing()).count();
        let count = total_rows - missing_count;
        let column_type = inference::infer_column_type(values, &self.options);
        let unique = stats::unique_count(values);

        let mut profile = ColumnProfile {
            name: name.to_string(),
            column_type,
            count,
            missing_count,
            missing_percentage: stats::percentage(missing_count, total_rows),
            unique,
            mean: None,
            median: None,
            std: None,
            min: None,
            max: None,
            mode: None,
            outliers: None,
            top_values: None,
        };

        match column_type {
            ColumnType::Numeric => {
                // Values that fail to parse inside a numeric column count as
                // missing for the statistics, never as a fatal error.
                let nums = stats::numeric_values(values);
                let summary = stats::numeric_summary(&nums);
                profile.mean = summary.mean;
                profile.median = summary.median;
                profile.std = summary.std;
                profile.min = summary.min;
                profile.max = summary.max;
                profile.outliers =
                    Some(outliers::detect_outliers(&nums, &self.options));
            }
            ColumnType::Categorical => {
                let summary = stats::categorical_summary(values, self.options.top_values);
                profile.mode = summary.mode;
                profile.top_values = Some(summary.top_values);
            }
            ColumnType::Date | ColumnType::Text => {}
        }

        profile
    }
}

/// Per-row numeric view of a column for pairwise-complete correlation:
/// missing or unparseable cells become `None`, keeping row alignment.
fn numeric_option_series(values: &[&CellValue]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| if v.is_missing() { None } else { v.as_f64() })
        .collect()
}
