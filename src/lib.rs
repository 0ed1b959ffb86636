//! Dataset profiling and visualization recommendation engine.
//!
//! Given an ordered sequence of heterogeneous string-keyed records, the
//! engine produces a [`models::DatasetProfile`] (per-column statistics,
//! missing-data accounting, outliers, correlations, a quality score) and a
//! [`models::VisualizationAnalysis`] (ranked chart recommendations with a
//! suggested layout). Recommendations come from an external AI advisory
//! endpoint when one is configured and reachable, and from a deterministic
//! rule engine otherwise; advisory failures never reach the caller.
//!
//! The profiling path is pure and synchronous; independent datasets can be
//! profiled concurrently with no coordination. All results are immutable,
//! caller-owned values recomputed per request.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{AnalysisOptions, Config};
pub use error::{AdvisoryError, ProfileError};
pub use models::{
    CellValue, ChartRecommendation, ColumnProfile, ColumnType, Complexity,
    DataCharacteristics, Dataset, DatasetProfile, Insight, InsightType, Layout,
    MissingDataEntry, Severity, TopValue, VisualizationAnalysis,
};
pub use services::{
    AdvisoryClient, CharacteristicsAnalyzer, DatasetProfiler, OpenAiAdvisor,
    VisualizationRecommender,
};
