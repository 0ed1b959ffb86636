use serde::{Deserialize, Serialize};

/// Inferred type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Date,
    Text,
}

/// One of the most frequent values in a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopValue {
    pub value: String,
    pub percentage: f64,
}

/// Statistical profile of a single column.
///
/// Numeric summaries are populated only for `Numeric` columns; `mode` and
/// `top_values` only for `Categorical` columns. A column where a statistic
/// cannot be computed carries `None` rather than a partial value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    /// Non-missing cell count. `count + missing_count == total_rows`.
    pub count: usize,
    pub missing_count: usize,
    pub missing_percentage: f64,
    pub unique: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_values: Option<Vec<TopValue>>,
}

/// Missing-data report entry for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingDataEntry {
    pub column: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
}

/// Full statistical description of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<ColumnProfile>,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    /// 0-100, averaged column completeness.
    pub overall_quality: f64,
    pub missing_data_pattern: Vec<MissingDataEntry>,
    /// Square, symmetric, unit-diagonal; rows/columns follow
    /// `numeric_columns` order. Absent when fewer than two numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_matrix: Option<Vec<Vec<f64>>>,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Correlation between two numeric columns, if both are in the matrix.
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        let matrix = self.correlation_matrix.as_ref()?;
        let i = self.numeric_columns.iter().position(|c| c == a)?;
        let j = self.numeric_columns.iter().position(|c| c == b)?;
        matrix.get(i)?.get(j).copied()
    }
}
