use thiserror::Error;

/// Errors surfaced by the dataset profiler.
///
/// Profiling has exactly one fatal condition: an empty row sequence leaves
/// nothing to infer columns from. Every other degenerate input (all-missing
/// columns, unparseable cells) degrades to `None` fields in the profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("dataset contains no rows")]
    EmptyDataset,
}

/// Failures of the external AI advisory call.
///
/// These never cross the recommender boundary; every variant collapses into
/// the deterministic rule engine.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("no advisory client configured")]
    Disabled,
    #[error("advisory request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("advisory endpoint returned status {status}: {detail}")]
    BadStatus { status: u16, detail: String },
    #[error("advisory response was malformed: {0}")]
    MalformedResponse(String),
    #[error("advisory recommendations failed validation: {0}")]
    InvalidRecommendations(String),
}
