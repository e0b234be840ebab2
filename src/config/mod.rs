//! Environment-driven configuration

use std::env;

const DEFAULT_DATA_PATH: &str = "data/outlet_sales.csv";
const DEFAULT_INSIGHT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent";

/// Deployment environment name, defaulting to "sandbox".
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Service configuration read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the sales snapshot CSV.
    pub data_path: String,
    /// Text-generation endpoint for narrative insights.
    pub insight_endpoint: String,
    /// API key for the generation endpoint; insights are disabled when
    /// absent.
    pub insight_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_path: env::var("SALES_DATA_PATH")
                .unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string()),
            insight_endpoint: env::var("INSIGHT_API_URL")
                .unwrap_or_else(|_| DEFAULT_INSIGHT_ENDPOINT.to_string()),
            insight_api_key: env::var("INSIGHT_API_KEY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            insight_endpoint: DEFAULT_INSIGHT_ENDPOINT.to_string(),
            insight_api_key: None,
        }
    }
}
