//! Chart recommendation: advisory first, deterministic rule engine always.
//!
//! The advisory path may fail in any way (timeout, HTTP error, malformed or
//! schema-invalid output); the caller never sees those failures. The rule
//! engine produces an equally valid result on its own, so no retries are
//! needed.

use log::{debug, info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::config::AnalysisOptions;
use crate::error::AdvisoryError;
use crate::models::{
    ChartRecommendation, ColumnType, Complexity, DataCharacteristics, DatasetProfile,
    Insight, InsightType, Layout, Severity, VisualizationAnalysis,
};
use crate::services::advisory::AdvisoryClient;

const HISTOGRAM_LIMIT: usize = 3;
const BREAKDOWN_LIMIT: usize = 2;
const BOX_PLOT_LIMIT: usize = 2;
const DASHBOARD_CHART_COUNT: usize = 6;
const QUALITY_INSIGHT_THRESHOLD: f64 = 80.0;
const QUALITY_CRITICAL_THRESHOLD: f64 = 60.0;

pub struct VisualizationRecommender {
    advisor: Option<Box<dyn AdvisoryClient>>,
    options: AnalysisOptions,
}

impl VisualizationRecommender {
    /// Rule-engine-only recommender.
    pub fn deterministic() -> Self {
        Self {
            advisor: None,
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_advisor(advisor: Box<dyn AdvisoryClient>) -> Self {
        Self {
            advisor: Some(advisor),
            options: AnalysisOptions::default(),
        }
    }

    pub fn options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Produce ranked recommendations, insights and a layout for a profiled
    /// dataset. Never fails: advisory trouble degrades to the rule engine.
    pub async fn analyze(
        &self,
        profile: &DatasetProfile,
        characteristics: &DataCharacteristics,
        query: Option<&str>,
        max_charts: usize,
    ) -> VisualizationAnalysis {
        let mut recommendations = match self
            .consult_advisor(profile, characteristics, query, max_charts)
            .await
        {
            Ok(recs) => {
                info!("Using {} advisory recommendations", recs.len());
                recs
            }
            Err(AdvisoryError::Disabled) => {
                debug!("No advisory client configured, using rule engine");
                self.rule_engine(profile, characteristics, max_charts)
            }
            Err(e) => {
                warn!("Advisory unavailable ({}), falling back to rule engine", e);
                self.rule_engine(profile, characteristics, max_charts)
            }
        };

        // Stable sort: ties keep rule order.
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        recommendations.truncate(max_charts);

        let insights = self.build_insights(characteristics);
        let suggested_layout = suggest_layout(characteristics, recommendations.len());

        VisualizationAnalysis {
            recommendations,
            insights,
            data_characteristics: characteristics.clone(),
            suggested_layout,
        }
    }

    async fn consult_advisor(
        &self,
        profile: &DatasetProfile,
        characteristics: &DataCharacteristics,
        query: Option<&str>,
        max_charts: usize,
    ) -> Result<Vec<ChartRecommendation>, AdvisoryError> {
        let advisor = self.advisor.as_ref().ok_or(AdvisoryError::Disabled)?;
        let recommendations = advisor
            .recommend(profile, characteristics, query, max_charts)
            .await?;
        validate_recommendations(&recommendations, profile)?;
        Ok(recommendations)
    }

    /// Deterministic rule engine, fixed rule order, collecting until
    /// `max_charts` recommendations exist.
    fn rule_engine(
        &self,
        profile: &DatasetProfile,
        characteristics: &DataCharacteristics,
        max_charts: usize,
    ) -> Vec<ChartRecommendation> {
        let mut recs: Vec<ChartRecommendation> = Vec::new();

        // 1. Histogram per numeric column.
        for name in profile.numeric_columns.iter().take(HISTOGRAM_LIMIT) {
            if recs.len() >= max_charts {
                break;
            }
            recs.push(chart(
                "histogram",
                &format!("Distribution of {}", name),
                &format!("Value distribution of the {} column", name),
                "Numeric columns are best understood through their distribution first",
                8,
                0.9,
                vec![name.clone()],
                "sequential",
                InsightType::Distribution,
                json!({ "bins": 20 }),
            ));
        }

        // 2. Categorical breakdowns, skipping high-cardinality columns.
        let mut breakdowns = 0;
        for name in &profile.categorical_columns {
            if recs.len() >= max_charts || breakdowns >= BREAKDOWN_LIMIT {
                break;
            }
            let Some(column) = profile.column(name) else {
                continue;
            };
            if column.unique > self.options.breakdown_max_unique {
                debug!(
                    "Skipping breakdown of '{}': {} unique values",
                    name, column.unique
                );
                continue;
            }
            let chart_type = if column.unique <= self.options.pie_max_unique {
                "pie"
            } else {
                "bar"
            };
            recs.push(chart(
                chart_type,
                &format!("Breakdown of {}", name),
                &format!("Share of each {} category", name),
                "Low-cardinality categories are readable as a direct breakdown",
                7,
                0.85,
                vec![name.clone()],
                "categorical",
                InsightType::Distribution,
                json!({ "unique_values": column.unique }),
            ));
            breakdowns += 1;
        }

        // 3. Time series over the date column and the most volatile metric.
        if recs.len() < max_charts && characteristics.has_temporal_data {
            let date_column = profile
                .columns
                .iter()
                .find(|c| c.column_type == ColumnType::Date)
                .map(|c| c.name.clone());
            let value_column = self.most_volatile_numeric(profile);
            if let (Some(date), Some(value)) = (date_column, value_column) {
                recs.push(chart(
                    "line",
                    &format!("{} over time", value),
                    &format!("How {} evolves along {}", value, date),
                    "Temporal data with a numeric measure calls for a trend view",
                    9,
                    0.9,
                    vec![date, value],
                    "sequential",
                    InsightType::Trend,
                    json!({}),
                ));
            }
        }

        // 4. Correlation heatmap across all numeric columns.
        if recs.len() < max_charts
            && characteristics.has_correlations
            && profile.numeric_columns.len() >= 2
        {
            recs.push(chart(
                "heatmap",
                "Correlation matrix",
                "Pairwise correlation strength across numeric columns",
                "Strong correlations exist; the full matrix shows where",
                9,
                0.9,
                profile.numeric_columns.clone(),
                "diverging",
                InsightType::Correlation,
                json!({}),
            ));
        }

        // 5. Scatter for the single strongest correlated pair.
        if recs.len() < max_charts {
            if let Some((a, b, r)) = self.strongest_pair(profile) {
                recs.push(chart(
                    "scatter",
                    &format!("{} vs {}", a, b),
                    &format!("Relationship between {} and {} (r = {:.2})", a, b, r),
                    "The strongest correlated pair deserves a direct look",
                    8,
                    0.85,
                    vec![a, b],
                    "default",
                    InsightType::Correlation,
                    json!({ "correlation": r }),
                ));
            }
        }

        // 6. Missing-data overview.
        if recs.len() < max_charts && !profile.missing_data_pattern.is_empty() {
            recs.push(chart(
                "bar",
                "Missing data overview",
                "Missing-value counts per affected column",
                "Incomplete columns shape how far other charts can be trusted",
                6,
                0.8,
                profile
                    .missing_data_pattern
                    .iter()
                    .map(|e| e.column.clone())
                    .collect(),
                "default",
                InsightType::Pattern,
                json!({}),
            ));
        }

        // 7. Box plot per outlier-bearing numeric column.
        let mut box_plots = 0;
        for column in &profile.columns {
            if recs.len() >= max_charts || box_plots >= BOX_PLOT_LIMIT {
                break;
            }
            let has_outliers = column
                .outliers
                .as_ref()
                .is_some_and(|o| !o.is_empty());
            if column.column_type != ColumnType::Numeric || !has_outliers {
                continue;
            }
            recs.push(chart(
                "box",
                &format!("Outliers in {}", column.name),
                &format!("Spread and flagged outliers of {}", column.name),
                "Flagged outliers are easiest to judge against the quartiles",
                7,
                0.85,
                vec![column.name.clone()],
                "default",
                InsightType::Anomaly,
                json!({ "outlier_count": column.outliers.as_ref().map_or(0, |o| o.len()) }),
            ));
            box_plots += 1;
        }

        recs
    }

    fn most_volatile_numeric(&self, profile: &DatasetProfile) -> Option<String> {
        profile
            .columns
            .iter()
            .filter(|c| c.column_type == ColumnType::Numeric)
            .filter_map(|c| c.std.map(|s| (c.name.clone(), s)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(name, _)| name)
            .or_else(|| profile.numeric_columns.first().cloned())
    }

    /// Strongest off-diagonal pair with |r| above the scatter threshold.
    fn strongest_pair(&self, profile: &DatasetProfile) -> Option<(String, String, f64)> {
        let matrix = profile.correlation_matrix.as_ref()?;
        let names = &profile.numeric_columns;
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let r = matrix[i][j];
                if best.map_or(true, |(_, _, b)| r.abs() > b.abs()) {
                    best = Some((i, j, r));
                }
            }
        }
        let (i, j, r) = best?;
        if r.abs() > self.options.scatter_min_correlation {
            Some((names[i].clone(), names[j].clone(), r))
        } else {
            None
        }
    }

    fn build_insights(&self, characteristics: &DataCharacteristics) -> Vec<Insight> {
        let mut insights = Vec::new();

        if characteristics.data_quality < QUALITY_INSIGHT_THRESHOLD {
            let severity = if characteristics.data_quality < QUALITY_CRITICAL_THRESHOLD {
                Severity::Critical
            } else {
                Severity::Warning
            };
            insights.push(Insight {
                title: "Data quality below target".to_string(),
                description: format!(
                    "Overall completeness is {:.1}%, driven by missing values",
                    characteristics.data_quality
                ),
                severity,
                recommendation:
                    "Review the missing-data overview and consider imputation or dropping sparse columns"
                        .to_string(),
            });
        }

        if characteristics.has_correlations {
            insights.push(Insight {
                title: "Strong correlations present".to_string(),
                description: "At least one pair of numeric columns is strongly correlated"
                    .to_string(),
                severity: Severity::Info,
                recommendation:
                    "Inspect the correlation heatmap before treating columns as independent"
                        .to_string(),
            });
        }

        if characteristics.has_outliers {
            insights.push(Insight {
                title: "Outliers detected".to_string(),
                description: "One or more numeric columns contain values outside the IQR fences"
                    .to_string(),
                severity: Severity::Warning,
                recommendation:
                    "Check the box plots and decide whether the flagged values are errors or signal"
                        .to_string(),
            });
        }

        if characteristics.has_temporal_data {
            insights.push(Insight {
                title: "Temporal structure detected".to_string(),
                description: "The dataset carries a date column or an implicit time axis"
                    .to_string(),
                severity: Severity::Info,
                recommendation: "Prefer trend views and keep rows in time order when sampling"
                    .to_string(),
            });
        }

        insights
    }
}

/// Structural validation of advisory output before it is trusted.
fn validate_recommendations(
    recommendations: &[ChartRecommendation],
    profile: &DatasetProfile,
) -> Result<(), AdvisoryError> {
    if recommendations.is_empty() {
        return Err(AdvisoryError::InvalidRecommendations(
            "empty recommendation list".to_string(),
        ));
    }
    for rec in recommendations {
        if !(1..=10).contains(&rec.priority) {
            return Err(AdvisoryError::InvalidRecommendations(format!(
                "priority {} out of range in '{}'",
                rec.priority, rec.title
            )));
        }
        if !(0.0..=1.0).contains(&rec.confidence) {
            return Err(AdvisoryError::InvalidRecommendations(format!(
                "confidence {} out of range in '{}'",
                rec.confidence, rec.title
            )));
        }
        for column in &rec.data_columns {
            if !profile.has_column(column) {
                return Err(AdvisoryError::InvalidRecommendations(format!(
                    "unknown column '{}' in '{}'",
                    column, rec.title
                )));
            }
        }
    }
    Ok(())
}

fn suggest_layout(characteristics: &DataCharacteristics, chart_count: usize) -> Layout {
    if characteristics.complexity == Complexity::High || chart_count > DASHBOARD_CHART_COUNT {
        Layout::Dashboard
    } else if characteristics.has_temporal_data && characteristics.has_correlations {
        Layout::Story
    } else {
        Layout::Grid
    }
}

#[allow(clippy::too_many_arguments)]
fn chart(
    chart_type: &str,
    title: &str,
    description: &str,
    rationale: &str,
    priority: u8,
    confidence: f64,
    data_columns: Vec<String>,
    color_scheme: &str,
    insight_type: InsightType,
    config: serde_json::Value,
) -> ChartRecommendation {
    ChartRecommendation {
        id: Uuid::new_v4(),
        chart_type: chart_type.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        rationale: rationale.to_string(),
        priority,
        confidence,
        data_columns,
        color_scheme: color_scheme.to_string(),
        insight_type,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dataset;
    use crate::services::characteristics::CharacteristicsAnalyzer;
    use crate::services::profiler::DatasetProfiler;
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingAdvisor;

    #[async_trait]
    impl AdvisoryClient for FailingAdvisor {
        async fn recommend(
            &self,
            _profile: &DatasetProfile,
            _characteristics: &DataCharacteristics,
            _query: Option<&str>,
            _max_charts: usize,
        ) -> Result<Vec<ChartRecommendation>, AdvisoryError> {
            Err(AdvisoryError::MalformedResponse("boom".to_string()))
        }
    }

    struct CannedAdvisor {
        recommendations: Vec<ChartRecommendation>,
    }

    #[async_trait]
    impl AdvisoryClient for CannedAdvisor {
        async fn recommend(
            &self,
            _profile: &DatasetProfile,
            _characteristics: &DataCharacteristics,
            _query: Option<&str>,
            _max_charts: usize,
        ) -> Result<Vec<ChartRecommendation>, AdvisoryError> {
            Ok(self.recommendations.clone())
        }
    }

    fn analyzed(rows: &[serde_json::Value]) -> (DatasetProfile, DataCharacteristics) {
        let ds = Dataset::from_json_rows(rows);
        let profile = DatasetProfiler::new().profile(&ds).unwrap();
        let characteristics = CharacteristicsAnalyzer::new().analyze(&ds, &profile);
        (profile, characteristics)
    }

    fn sales_rows() -> Vec<serde_json::Value> {
        (0..20)
            .map(|i| {
                json!({
                    "day": format!("2024-01-{:02}", i + 1),
                    "revenue": 100.0 + 7.3 * i as f64,
                    "units": 10 + (i * 3) % 8,
                    "region": (["north", "south", "east"][i % 3]),
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn failing_advisor_still_yields_recommendations() {
        let (profile, characteristics) = analyzed(&sales_rows());
        let recommender = VisualizationRecommender::with_advisor(Box::new(FailingAdvisor));
        let analysis = recommender
            .analyze(&profile, &characteristics, None, 8)
            .await;
        assert!(!analysis.recommendations.is_empty());
    }

    #[tokio::test]
    async fn advisor_output_with_unknown_columns_is_rejected() {
        let (profile, characteristics) = analyzed(&sales_rows());
        let bogus = chart(
            "bar",
            "Made up",
            "References a column that does not exist",
            "n/a",
            5,
            0.5,
            vec!["no_such_column".to_string()],
            "default",
            InsightType::Distribution,
            json!({}),
        );
        let recommender = VisualizationRecommender::with_advisor(Box::new(CannedAdvisor {
            recommendations: vec![bogus],
        }));
        let analysis = recommender
            .analyze(&profile, &characteristics, None, 8)
            .await;
        // Fallback ran: none of the results reference the bogus column.
        assert!(!analysis.recommendations.is_empty());
        assert!(analysis
            .recommendations
            .iter()
            .all(|r| !r.data_columns.contains(&"no_such_column".to_string())));
    }

    #[tokio::test]
    async fn valid_advisor_output_is_used() {
        let (profile, characteristics) = analyzed(&sales_rows());
        let canned = chart(
            "bar",
            "Revenue by region",
            "Advisory pick",
            "n/a",
            9,
            0.95,
            vec!["region".to_string(), "revenue".to_string()],
            "categorical",
            InsightType::Distribution,
            json!({}),
        );
        let recommender = VisualizationRecommender::with_advisor(Box::new(CannedAdvisor {
            recommendations: vec![canned],
        }));
        let analysis = recommender
            .analyze(&profile, &characteristics, None, 8)
            .await;
        assert_eq!(analysis.recommendations.len(), 1);
        assert_eq!(analysis.recommendations[0].title, "Revenue by region");
    }

    #[tokio::test]
    async fn rule_engine_ranks_by_priority_and_truncates() {
        let (profile, characteristics) = analyzed(&sales_rows());
        let recommender = VisualizationRecommender::deterministic();
        let analysis = recommender
            .analyze(&profile, &characteristics, None, 3)
            .await;
        assert_eq!(analysis.recommendations.len(), 3);
        let priorities: Vec<u8> = analysis
            .recommendations
            .iter()
            .map(|r| r.priority)
            .collect();
        let mut sorted = priorities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(priorities, sorted);
    }

    #[tokio::test]
    async fn temporal_data_gets_line_chart() {
        let (profile, characteristics) = analyzed(&sales_rows());
        assert!(characteristics.has_temporal_data);
        let recommender = VisualizationRecommender::deterministic();
        let analysis = recommender
            .analyze(&profile, &characteristics, None, 10)
            .await;
        let types: Vec<&str> = analysis
            .recommendations
            .iter()
            .map(|r| r.chart_type.as_str())
            .collect();
        assert!(types.contains(&"line"));
        assert!(types.contains(&"histogram"));
    }

    #[tokio::test]
    async fn high_cardinality_categorical_is_skipped() {
        // 100 rows, 60 unique codes: categorical, but over the breakdown cap.
        let rows: Vec<_> = (0..100)
            .map(|i| json!({ "code": format!("c{}", i % 60), "flag": i % 2 == 0 }))
            .collect();
        let (profile, characteristics) = analyzed(&rows);
        let code = profile.column("code").unwrap();
        assert_eq!(code.column_type, ColumnType::Categorical);
        assert_eq!(code.unique, 60);

        let recommender = VisualizationRecommender::deterministic();
        let analysis = recommender
            .analyze(&profile, &characteristics, None, 10)
            .await;
        assert!(analysis
            .recommendations
            .iter()
            .filter(|r| r.chart_type == "pie" || r.chart_type == "bar")
            .all(|r| !r.data_columns.contains(&"code".to_string())));
    }

    #[tokio::test]
    async fn pie_for_few_categories_bar_for_many() {
        let rows: Vec<_> = (0..40)
            .map(|i| {
                json!({
                    "small": format!("s{}", i % 4),
                    "large": format!("l{}", i % 20),
                })
            })
            .collect();
        let (profile, characteristics) = analyzed(&rows);
        let recommender = VisualizationRecommender::deterministic();
        let analysis = recommender
            .analyze(&profile, &characteristics, None, 10)
            .await;
        let of = |name: &str| {
            analysis
                .recommendations
                .iter()
                .find(|r| r.data_columns == vec![name.to_string()])
                .map(|r| r.chart_type.clone())
        };
        assert_eq!(of("small").as_deref(), Some("pie"));
        assert_eq!(of("large").as_deref(), Some("bar"));
    }

    #[tokio::test]
    async fn layout_rules() {
        // Story: temporal + correlated, few charts.
        let (profile, characteristics) = analyzed(&sales_rows());
        if characteristics.has_correlations {
            let analysis = VisualizationRecommender::deterministic()
                .analyze(&profile, &characteristics, None, 4)
                .await;
            assert_eq!(analysis.suggested_layout, Layout::Story);
        }

        // Grid: small plain dataset.
        let (p2, c2) = analyzed(&[
            json!({"name": "a", "kind": "x"}),
            json!({"name": "b", "kind": "y"}),
            json!({"name": "c", "kind": "x"}),
        ]);
        let analysis = VisualizationRecommender::deterministic()
            .analyze(&p2, &c2, None, 4)
            .await;
        assert_eq!(analysis.suggested_layout, Layout::Grid);
    }

    #[tokio::test]
    async fn insights_track_characteristics() {
        let rows: Vec<_> = (0..10)
            .map(|i| {
                json!({
                    "v": if i == 9 { 1000.0 } else { i as f64 * 0.1 + 5.0 },
                    "w": if i % 2 == 0 { json!(null) } else { json!(i) },
                })
            })
            .collect();
        let (profile, characteristics) = analyzed(&rows);
        assert!(characteristics.has_outliers);
        assert!(characteristics.data_quality < 80.0);

        let analysis = VisualizationRecommender::deterministic()
            .analyze(&profile, &characteristics, None, 8)
            .await;
        let titles: Vec<&str> = analysis.insights.iter().map(|i| i.title.as_str()).collect();
        assert!(titles.contains(&"Outliers detected"));
        assert!(titles.contains(&"Data quality below target"));
    }
}
