use dotenv::dotenv;
use std::env;

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key for the advisory endpoint. Absent key means the
    /// deterministic rule engine serves every request.
    pub open_ai_key: Option<String>,
    /// Bound on the single outbound advisory request, in seconds.
    pub advisory_timeout_secs: u64,
    /// Default maximum number of chart recommendations per analysis.
    pub max_charts: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            open_ai_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            advisory_timeout_secs: env::var("ADVISORY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("ADVISORY_TIMEOUT_SECS must be a number of seconds"),
            max_charts: env::var("MAX_CHARTS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("MAX_CHARTS must be a positive integer"),
        }
    }
}

/// Heuristic thresholds used across profiling and recommendation.
///
/// These encode product judgment rather than mathematical necessity, so they
/// live as named fields callers can override instead of magic numbers buried
/// in the components.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Fraction of numeric-parseable values required to classify a column
    /// as numeric.
    pub numeric_fraction: f64,
    /// A column is categorical when its distinct count stays at or below
    /// this bound...
    pub categorical_max_unique: usize,
    /// ...or when distinct/non-missing stays at or below this ratio.
    pub categorical_unique_ratio: f64,
    /// Minimum non-missing sample size before outlier detection applies.
    pub outlier_min_sample: usize,
    /// IQR fence multiplier (Tukey's 1.5 by convention).
    pub iqr_multiplier: f64,
    /// |r| above which a pair counts as strongly correlated.
    pub strong_correlation: f64,
    /// |r| a pair must exceed to earn a fallback scatter plot.
    pub scatter_min_correlation: f64,
    /// Step tolerance (as a fraction of total range) for the implicit
    /// time-axis heuristic on numeric columns.
    pub sequential_tolerance: f64,
    /// Rows required before a temporal dataset is suspected of seasonality.
    pub seasonality_min_rows: usize,
    /// How many top categorical values each profile keeps.
    pub top_values: usize,
    /// Cardinality above which a categorical column is skipped by the
    /// fallback pie/bar rule.
    pub breakdown_max_unique: usize,
    /// Unique-count bound for preferring a pie over a bar chart.
    pub pie_max_unique: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            numeric_fraction: 0.8,
            categorical_max_unique: 50,
            categorical_unique_ratio: 0.6,
            outlier_min_sample: 4,
            iqr_multiplier: 1.5,
            strong_correlation: 0.5,
            scatter_min_correlation: 0.3,
            sequential_tolerance: 0.1,
            seasonality_min_rows: 12,
            top_values: 3,
            breakdown_max_unique: 50,
            pie_max_unique: 8,
        }
    }
}
