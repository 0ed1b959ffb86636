use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use insight_engine::{
    Config, Dataset, CharacteristicsAnalyzer, DatasetProfiler, OpenAiAdvisor,
    VisualizationRecommender,
};

/// Parse the input file as a JSON array of objects, or NDJSON (one object
/// per line).
fn read_rows(raw: &str) -> Result<Vec<Value>> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(raw).context("Failed to parse JSON array input");
    }
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).context("Failed to parse NDJSON line"))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("🚀 Starting dataset analysis");

    let config = Config::from_env();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: insight-engine <rows.json> [query]"),
    };
    let query = std::env::args().nth(2);

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path))?;
    let rows = read_rows(&raw)?;
    let dataset = Dataset::from_json_rows(&rows);
    log::info!(
        "📊 Loaded {} rows, {} columns from {}",
        dataset.row_count(),
        dataset.columns().len(),
        path
    );

    let profiler = DatasetProfiler::new();
    let profile = profiler.profile(&dataset)?;
    log::info!(
        "✅ Profiled dataset: quality {:.1}, {} numeric / {} categorical columns",
        profile.overall_quality,
        profile.numeric_columns.len(),
        profile.categorical_columns.len()
    );

    let characteristics = CharacteristicsAnalyzer::new().analyze(&dataset, &profile);

    let recommender = match OpenAiAdvisor::from_config(&config) {
        Some(advisor) => VisualizationRecommender::with_advisor(Box::new(advisor)),
        None => {
            log::info!("🧮 No advisory key configured, using the rule engine");
            VisualizationRecommender::deterministic()
        }
    };
    let analysis = recommender
        .analyze(&profile, &characteristics, query.as_deref(), config.max_charts)
        .await;
    log::info!(
        "🎯 {} chart recommendations, layout {:?}",
        analysis.recommendations.len(),
        analysis.suggested_layout
    );

    let document = json!({
        "profile": profile,
        "analysis": analysis,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}
