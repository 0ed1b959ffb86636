//! IQR-based outlier detection for numeric columns.

use crate::config::AnalysisOptions;
use crate::services::stats::quantile;

/// Flag values outside the Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`.
///
/// Returns flagged values in their original row order. Columns with fewer
/// than `outlier_min_sample` values are never flagged; small samples give
/// meaningless quartiles.
pub fn detect_outliers(values: &[f64], options: &AnalysisOptions) -> Vec<f64> {
    if values.len() < options.outlier_min_sample {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let (q1, q3) = match (quantile(&sorted, 0.25), quantile(&sorted, 0.75)) {
        (Some(q1), Some(q3)) => (q1, q3),
        _ => return Vec::new(),
    };
    let iqr = q3 - q1;
    let lower = q1 - options.iqr_multiplier * iqr;
    let upper = q3 + options.iqr_multiplier * iqr;

    values
        .iter()
        .copied()
        .filter(|v| *v < lower || *v > upper)
        .collect()
}
