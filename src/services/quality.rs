//! Dataset quality scoring from per-column completeness.

use crate::models::{ColumnProfile, MissingDataEntry};

/// Average per-column completeness, clamped to [0, 100].
pub fn overall_quality(columns: &[ColumnProfile]) -> f64 {
    if columns.is_empty() {
        return 0.0;
    }
    let total: f64 = columns
        .iter()
        .map(|c| 100.0 - c.missing_percentage)
        .sum();
    (total / columns.len() as f64).clamp(0.0, 100.0)
}

/// One entry per column with any missing values, keeping each column's own
/// count and percentage.
pub fn missing_data_pattern(columns: &[ColumnProfile]) -> Vec<MissingDataEntry> {
    columns
        .iter()
        .filter(|c| c.missing_count > 0)
        .map(|c| MissingDataEntry {
            column: c.name.clone(),
            missing_count: c.missing_count,
            missing_percentage: c.missing_percentage,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;

    fn column(name: &str, missing_count: usize, missing_percentage: f64) -> ColumnProfile {
        ColumnProfile {
            name: name.into(),
            column_type: ColumnType::Text,
            count: 0,
            missing_count,
            missing_percentage,
            unique: 0,
            mean: None,
            median: None,
            std: None,
            min: None,
            max: None,
            mode: None,
            outliers: None,
            top_values: None,
        }
    }

    #[test]
    fn complete_dataset_scores_100() {
        let columns = [column("a", 0, 0.0), column("b", 0, 0.0)];
        assert_eq!(overall_quality(&columns), 100.0);
        assert!(missing_data_pattern(&columns).is_empty());
    }

    #[test]
    fn quality_averages_completeness() {
        let columns = [column("a", 5, 50.0), column("b", 0, 0.0)];
        assert_eq!(overall_quality(&columns), 75.0);
    }

    #[test]
    fn quality_stays_in_bounds() {
        let columns = [column("a", 10, 100.0)];
        let q = overall_quality(&columns);
        assert!((0.0..=100.0).contains(&q));
        assert_eq!(overall_quality(&[]), 0.0);
    }

    #[test]
    fn pattern_lists_only_incomplete_columns() {
        let columns = [column("a", 2, 20.0), column("b", 0, 0.0), column("c", 1, 10.0)];
        let pattern = missing_data_pattern(&columns);
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern[0].column, "a");
        assert_eq!(pattern[0].missing_count, 2);
        assert_eq!(pattern[1].column, "c");
    }
}
