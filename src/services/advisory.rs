//! External AI advisory client for chart recommendations.
//!
//! The advisory call is a single outbound request with a bounded timeout.
//! It is treated as unreliable end to end; every failure mode maps to an
//! `AdvisoryError` the recommender collapses into its deterministic
//! fallback.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::AdvisoryError;
use crate::models::{ChartRecommendation, DataCharacteristics, DatasetProfile};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The advisory collaborator consulted before the rule engine.
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    async fn recommend(
        &self,
        profile: &DatasetProfile,
        characteristics: &DataCharacteristics,
        query: Option<&str>,
        max_charts: usize,
    ) -> Result<Vec<ChartRecommendation>, AdvisoryError>;
}

/// OpenAI-backed advisory client.
#[derive(Clone, Debug)]
pub struct OpenAiAdvisor {
    client: Client,
    api_key: String,
}

impl OpenAiAdvisor {
    /// Build an advisor from config; `None` when no API key is set, in
    /// which case the caller runs on the rule engine alone.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.open_ai_key.clone()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.advisory_timeout_secs))
            .build()
            .ok()?;
        info!(
            "Advisory client initialized (timeout {}s)",
            config.advisory_timeout_secs
        );
        Some(Self { client, api_key })
    }

    fn build_prompt(
        profile: &DatasetProfile,
        characteristics: &DataCharacteristics,
        query: Option<&str>,
        max_charts: usize,
    ) -> String {
        let summary = json!({
            "total_rows": profile.total_rows,
            "total_columns": profile.total_columns,
            "numeric_columns": profile.numeric_columns,
            "categorical_columns": profile.categorical_columns,
            "overall_quality": profile.overall_quality,
            "columns": profile.columns.iter().map(|c| json!({
                "name": c.name,
                "type": c.column_type,
                "missing_percentage": c.missing_percentage,
                "unique": c.unique,
            })).collect::<Vec<_>>(),
            "characteristics": characteristics,
        });

        let user_focus = query
            .map(|q| format!("\nThe user is specifically interested in: {}\n", q))
            .unwrap_or_default();

        format!(
            r#"Here is a JSON summary of a tabular dataset profile:

{}
{}
Recommend at most {} visualizations for this dataset.

Respond with a JSON object of the shape:
{{
    "recommendations": [
        {{
            "chart_type": "bar",
            "title": "Distribution of Values",
            "description": "What the chart shows",
            "rationale": "Why this chart fits the data",
            "priority": 8,
            "confidence": 0.9,
            "data_columns": ["column1"],
            "color_scheme": "default",
            "insight_type": "distribution",
            "config": {{}}
        }}
    ]
}}

Only reference columns that exist in the profile."#,
            summary, user_focus, max_charts
        )
    }
}

#[async_trait]
impl AdvisoryClient for OpenAiAdvisor {
    async fn recommend(
        &self,
        profile: &DatasetProfile,
        characteristics: &DataCharacteristics,
        query: Option<&str>,
        max_charts: usize,
    ) -> Result<Vec<ChartRecommendation>, AdvisoryError> {
        let prompt = Self::build_prompt(profile, characteristics, query, max_charts);

        let request_body = json!({
            "model": "gpt-4o",
            "messages": [
                {
                    "role": "system",
                    "content": "You are a data visualization assistant. Given a dataset profile, recommend the most useful charts. Respond with JSON only."
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "response_format": { "type": "json_object" }
        });

        info!("Requesting chart recommendations from advisory endpoint");
        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "could not read error body".to_string());
            warn!("Advisory endpoint returned {}: {}", status, detail);
            return Err(AdvisoryError::BadStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let body: Value = response.json().await?;
        debug!("Advisory response received");

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AdvisoryError::MalformedResponse("missing message content".to_string())
            })?;

        let parsed: Value = serde_json::from_str(content).map_err(|e| {
            AdvisoryError::MalformedResponse(format!("content is not valid JSON: {}", e))
        })?;

        let recommendations: Vec<ChartRecommendation> =
            serde_json::from_value(parsed["recommendations"].clone()).map_err(|e| {
                AdvisoryError::MalformedResponse(format!(
                    "recommendations failed to deserialize: {}",
                    e
                ))
            })?;

        info!(
            "Advisory endpoint returned {} recommendations",
            recommendations.len()
        );
        Ok(recommendations)
    }
}
