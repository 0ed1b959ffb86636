//! Per-column summary statistics.
//!
//! Convention note: standard deviation is the sample deviation (ddof = 1),
//! applied consistently everywhere a spread is needed, including the
//! recommender's value-axis selection.

use std::collections::{HashMap, HashSet};

use crate::models::{CellValue, TopValue};

/// Numeric summary of one column's non-missing, parseable values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Frequency summary of one categorical column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoricalSummary {
    pub mode: Option<String>,
    pub top_values: Vec<TopValue>,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of the sample; average of the two middle elements on even length.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (ddof = 1). `None` below two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Quantile by linear interpolation on the sorted sample, q in [0, 1].
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Percentage with a zero-denominator guard.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Extract the parseable numeric values of a column, in row order.
/// Non-missing values that fail to parse are treated as missing here rather
/// than failing the profile.
pub fn numeric_values(values: &[&CellValue]) -> Vec<f64> {
    values
        .iter()
        .filter(|v| !v.is_missing())
        .filter_map(|v| v.as_f64())
        .collect()
}

pub fn numeric_summary(values: &[f64]) -> NumericSummary {
    NumericSummary {
        mean: mean(values),
        median: median(values),
        std: std_dev(values),
        min: values
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v)))),
        max: values
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v)))),
    }
}

/// Count distinct non-missing values by display form.
pub fn unique_count(values: &[&CellValue]) -> usize {
    values
        .iter()
        .filter(|v| !v.is_missing())
        .map(|v| v.display())
        .collect::<HashSet<_>>()
        .len()
}

/// Mode and top-k frequency table. Ties break by first-seen order: counts
/// live in an insertion-ordered list, with a hashed index alongside so wide
/// columns stay linear.
pub fn categorical_summary(values: &[&CellValue], top_k: usize) -> CategoricalSummary {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut total = 0usize;
    for v in values.iter().filter(|v| !v.is_missing()) {
        total += 1;
        let key = v.display();
        match index.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    if counts.is_empty() {
        return CategoricalSummary::default();
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    CategoricalSummary {
        mode: counts.first().map(|(k, _)| k.clone()),
        top_values: counts
            .iter()
            .take(top_k)
            .map(|(k, n)| TopValue {
                value: k.clone(),
                percentage: percentage(*n, total),
            })
            .collect(),
    }
}
