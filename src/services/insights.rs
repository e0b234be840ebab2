//! Narrative insight generation over pre-aggregated summaries
//!
//! The provider is called with an already-computed report rendered as a
//! plain-text table; it never participates in the aggregation itself. One
//! synchronous request per call, no retry.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ReportError, Result};
use crate::models::{GroupSummary, Season};

/// Text-generation backend for report commentary.
#[async_trait]
pub trait InsightProvider {
    /// Generate commentary for a prompt, returning the text or an error.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Client for a Gemini-style `generateContent` endpoint.
pub struct GeminiInsightProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiInsightProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl InsightProvider for GeminiInsightProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 2048,
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Insight(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ReportError::Insight(format!(
                "generation endpoint returned {}: {}",
                status, text
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ReportError::Insight(format!("invalid response body: {}", e)))?;

        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ReportError::Insight("no generated text in response".to_string()))
    }
}

/// Provider used when no generation endpoint is configured; returns a
/// fixed notice instead of calling out.
pub struct PlaceholderInsightProvider;

#[async_trait]
impl InsightProvider for PlaceholderInsightProvider {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("Insight generation is not configured.".to_string())
    }
}

/// Render a report as the plain-text summary table injected into the
/// commentary prompt.
pub fn summary_prompt(summaries: &[GroupSummary], current: Season, prior: Season) -> String {
    let mut prompt = format!(
        "Seasonal sales comparison, {} vs {}. One line per group: \
         rank, name, current total, prior total, growth %, rank change.\n",
        current, prior
    );
    for summary in summaries {
        prompt.push_str(&format!(
            "{}. {} | current {:.0} | prior {:.0} | growth {:.1}% | {}\n",
            summary.rank,
            summary.key,
            summary.current_total,
            summary.prior_total,
            summary.growth_total,
            summary.rank_move(summaries.len()),
        ));
    }
    prompt.push_str(
        "Write a short commentary on the standout performers, notable \
         declines, and rank movements in this table.",
    );
    prompt
}
