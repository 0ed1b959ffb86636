use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Coarse structural-difficulty tier of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Derived signals that drive visualization choice. Recomputed per analysis,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCharacteristics {
    pub has_temporal_data: bool,
    pub has_correlations: bool,
    pub has_outliers: bool,
    pub has_seasonality: bool,
    pub data_quality: f64,
    pub complexity: Complexity,
}

/// What a recommended chart is meant to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Distribution,
    Correlation,
    Trend,
    Anomaly,
    Pattern,
}

/// One suggested chart with the metadata justifying its inclusion and rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecommendation {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub chart_type: String,
    pub title: String,
    pub description: String,
    pub rationale: String,
    /// 1 (lowest) to 10 (highest).
    pub priority: u8,
    /// 0.0 to 1.0.
    pub confidence: f64,
    /// Every name must exist in the profiled column set.
    pub data_columns: Vec<String>,
    pub color_scheme: String,
    pub insight_type: InsightType,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A narrative observation about the dataset, independent of any one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub recommendation: String,
}

/// Suggested page layout for the recommended charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Grid,
    Dashboard,
    Story,
}

/// Ranked chart recommendations plus layout, as returned to the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationAnalysis {
    pub recommendations: Vec<ChartRecommendation>,
    pub insights: Vec<Insight>,
    pub data_characteristics: DataCharacteristics,
    pub suggested_layout: Layout,
}
