//! Higher-level dataset signals derived from a profile.
//!
//! Everything here is heuristic: the signals bias chart selection, they are
//! not statistical guarantees.

use crate::config::AnalysisOptions;
use crate::models::{
    ColumnType, Complexity, DataCharacteristics, Dataset, DatasetProfile,
};
use crate::services::stats;

const WIDE_COLUMNS: usize = 20;
const MANY_COLUMNS: usize = 10;
const RICH_TYPE_MIX: usize = 5;
const SOME_TYPE_MIX: usize = 3;
const POOR_QUALITY: f64 = 70.0;
const FAIR_QUALITY: f64 = 85.0;

#[derive(Debug, Clone, Default)]
pub struct CharacteristicsAnalyzer {
    options: AnalysisOptions,
}

impl CharacteristicsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn analyze(&self, dataset: &Dataset, profile: &DatasetProfile) -> DataCharacteristics {
        let has_temporal_data = self.detect_temporal(dataset, profile);
        let has_correlations = self.detect_correlations(profile);
        let has_outliers = profile
            .columns
            .iter()
            .any(|c| c.outliers.as_ref().is_some_and(|o| !o.is_empty()));
        let has_seasonality =
            has_temporal_data && profile.total_rows > self.options.seasonality_min_rows;

        DataCharacteristics {
            has_temporal_data,
            has_correlations,
            has_outliers,
            has_seasonality,
            data_quality: profile.overall_quality,
            complexity: complexity(profile),
        }
    }

    /// A dataset is temporal when it has a date column, or when some numeric
    /// column climbs so evenly that it reads as an implicit time axis.
    fn detect_temporal(&self, dataset: &Dataset, profile: &DatasetProfile) -> bool {
        if profile
            .columns
            .iter()
            .any(|c| c.column_type == ColumnType::Date)
        {
            return true;
        }

        profile.numeric_columns.iter().any(|name| {
            let values = stats::numeric_values(&dataset.column_values(name));
            is_near_sequential(&values, self.options.sequential_tolerance)
        })
    }

    fn detect_correlations(&self, profile: &DatasetProfile) -> bool {
        let Some(matrix) = profile.correlation_matrix.as_ref() else {
            return false;
        };
        matrix.iter().enumerate().any(|(i, row)| {
            row.iter()
                .enumerate()
                .any(|(j, r)| i != j && r.abs() > self.options.strong_correlation)
        })
    }
}

/// Whether the values, in row order, increase with near-even steps: every
/// consecutive step stays within `tolerance` of the expected even step,
/// measured against the total range.
fn is_near_sequential(values: &[f64], tolerance: f64) -> bool {
    if values.len() < 3 {
        return false;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return false;
    }

    let expected_step = range / (values.len() - 1) as f64;
    values.windows(2).all(|w| {
        let step = w[1] - w[0];
        step > 0.0 && (step - expected_step).abs() <= tolerance * range
    })
}

/// Score column count, type diversity and quality into a coarse tier.
fn complexity(profile: &DatasetProfile) -> Complexity {
    let mut score = 0u32;

    if profile.total_columns > WIDE_COLUMNS {
        score += 2;
    } else if profile.total_columns > MANY_COLUMNS {
        score += 1;
    }

    let numeric = profile.numeric_columns.len();
    let categorical = profile.categorical_columns.len();
    if numeric > RICH_TYPE_MIX && categorical > RICH_TYPE_MIX {
        score += 2;
    } else if numeric > SOME_TYPE_MIX || categorical > SOME_TYPE_MIX {
        score += 1;
    }

    if profile.overall_quality < POOR_QUALITY {
        score += 2;
    } else if profile.overall_quality < FAIR_QUALITY {
        score += 1;
    }

    match score {
        s if s >= 4 => Complexity::High,
        s if s >= 2 => Complexity::Medium,
        _ => Complexity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::profiler::DatasetProfiler;
    use serde_json::json;

    fn characteristics(rows: &[serde_json::Value]) -> DataCharacteristics {
        let ds = Dataset::from_json_rows(rows);
        let profile = DatasetProfiler::new().profile(&ds).unwrap();
        CharacteristicsAnalyzer::new().analyze(&ds, &profile)
    }

    #[test]
    fn date_column_marks_temporal() {
        let c = characteristics(&[
            json!({"day": "2024-01-01", "v": 3}),
            json!({"day": "2024-01-02", "v": 5}),
            json!({"day": "2024-01-03", "v": 4}),
        ]);
        assert!(c.has_temporal_data);
        // Only 3 rows, far below the seasonality floor.
        assert!(!c.has_seasonality);
    }

    #[test]
    fn evenly_increasing_numeric_column_marks_temporal() {
        let rows: Vec<_> = (0..10).map(|i| json!({"tick": i, "v": i * i})).collect();
        let c = characteristics(&rows);
        assert!(c.has_temporal_data);
    }

    #[test]
    fn scattered_numeric_data_is_not_temporal() {
        let c = characteristics(&[
            json!({"a": 9.0, "b": 14.0}),
            json!({"a": 2.0, "b": 3.0}),
            json!({"a": 7.0, "b": 12.0}),
            json!({"a": 1.0, "b": 0.5}),
        ]);
        assert!(!c.has_temporal_data);
    }

    #[test]
    fn strong_pairwise_correlation_detected() {
        let rows: Vec<_> = (1..=8).map(|i| json!({"a": i, "b": 2 * i})).collect();
        let c = characteristics(&rows);
        assert!(c.has_correlations);
    }

    #[test]
    fn seasonality_needs_temporal_and_enough_rows() {
        let rows: Vec<_> = (0..20)
            .map(|i| json!({"day": format!("2024-01-{:02}", i + 1), "v": (i * 7) % 13}))
            .collect();
        let c = characteristics(&rows);
        assert!(c.has_temporal_data);
        assert!(c.has_seasonality);
    }

    #[test]
    fn outliers_propagate() {
        let rows: Vec<_> = [5.0, 6.0, 5.5, 6.2, 5.8, 400.0]
            .iter()
            .map(|v| json!({"n": v}))
            .collect();
        assert!(characteristics(&rows).has_outliers);
    }

    #[test]
    fn near_sequential_rejects_short_and_flat_runs() {
        assert!(!is_near_sequential(&[1.0, 2.0], 0.1));
        assert!(!is_near_sequential(&[3.0, 3.0, 3.0, 3.0], 0.1));
        assert!(is_near_sequential(&[10.0, 20.0, 30.0, 40.0], 0.1));
        assert!(!is_near_sequential(&[10.0, 40.0, 20.0, 30.0], 0.1));
    }

    #[test]
    fn complexity_tiers() {
        // Small clean dataset: low.
        let low = characteristics(&[
            json!({"a": 1, "b": "x"}),
            json!({"a": 2, "b": "y"}),
        ]);
        assert_eq!(low.complexity, Complexity::Low);

        // Wide dataset with many numeric columns: at least medium.
        let mut rows = Vec::new();
        for i in 0..10 {
            let mut obj = serde_json::Map::new();
            for c in 0..12 {
                let v = if i % 3 == 0 && c == 0 {
                    json!(null)
                } else {
                    json!((i * 13 + c * 7) % 11)
                };
                obj.insert(format!("n{}", c), v);
            }
            rows.push(serde_json::Value::Object(obj));
        }
        let c = characteristics(&rows);
        assert_ne!(c.complexity, Complexity::Low);
    }
}
