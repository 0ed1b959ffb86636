//! Column type inference.
//!
//! Decision order, first match wins: date, numeric, categorical, text.
//! Missing cells are excluded from the sample before any rule runs.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::AnalysisOptions;
use crate::models::{CellValue, ColumnType};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Parse a string cell as a point in time under the supported formats.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn is_date_like(value: &CellValue) -> bool {
    match value {
        CellValue::Date(_) => true,
        // Integer-like strings never count as date evidence, so a column of
        // plain year numbers stays numeric.
        CellValue::Text(s) => value.as_f64().is_none() && parse_date(s).is_some(),
        _ => false,
    }
}

/// Classify a column from its non-missing values.
pub fn infer_column_type(values: &[&CellValue], options: &AnalysisOptions) -> ColumnType {
    let sample: Vec<&CellValue> = values.iter().copied().filter(|v| !v.is_missing()).collect();
    if sample.is_empty() {
        return ColumnType::Text;
    }

    if sample.iter().all(|v| is_date_like(v)) {
        return ColumnType::Date;
    }

    // Inclusive bound: a column sitting exactly at the threshold counts.
    let numeric = sample.iter().filter(|v| v.as_f64().is_some()).count();
    if numeric as f64 / sample.len() as f64 >= options.numeric_fraction {
        return ColumnType::Numeric;
    }

    let unique = super::stats::unique_count(&sample);
    if unique <= options.categorical_max_unique
        || unique as f64 / sample.len() as f64 <= options.categorical_unique_ratio
    {
        return ColumnType::Categorical;
    }

    ColumnType::Text
}
