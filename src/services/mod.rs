pub mod advisory;
pub mod characteristics;
pub mod correlation;
pub mod inference;
pub mod outliers;
pub mod profiler;
pub mod quality;
pub mod recommender;
pub mod stats;

pub use advisory::{AdvisoryClient, OpenAiAdvisor};
pub use characteristics::CharacteristicsAnalyzer;
pub use profiler::DatasetProfiler;
pub use recommender::VisualizationRecommender;
