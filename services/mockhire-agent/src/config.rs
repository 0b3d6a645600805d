//! Application Configuration Module
//!
//! Centralizes the configuration for the agent service. Settings are loaded
//! from environment variables into a single struct that is passed around
//! explicitly.

use mockhire_core::target::TargetConfig;
use std::env;
use tracing::Level;

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub assistant_id: Option<String>,
    pub workflow_id: Option<String>,
    pub relay_url: Option<String>,
    pub relay_api_key: String,
    pub feedback_url: String,
    pub feedback_api_key: Option<String>,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid log level provided for RUST_LOG: {0}")]
    InvalidLogLevel(String),
}

// Reads an optional variable, treating empty values as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    // *   `VOICEGATE_API_KEY`: Key for the VoiceGate call relay. Required.
    // *   `VOICEGATE_ASSISTANT_ID`: Assistant to dial. Preferred when both ids are set.
    // *   `VOICEGATE_WORKFLOW_ID`: Workflow to dial when no assistant id is set.
    // *   `VOICEGATE_RELAY_URL`: (Optional) Overrides the relay endpoint.
    // *   `FEEDBACK_API_URL`: (Optional) Feedback service base URL. Defaults to "http://localhost:3000".
    // *   `FEEDBACK_API_KEY`: (Optional) Bearer token for the feedback service.
    // *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. Useful for local development, ignored if not present.
        dotenvy::dotenv().ok();

        let relay_api_key = optional_var("VOICEGATE_API_KEY").ok_or_else(|| {
            ConfigError::MissingVar("VOICEGATE_API_KEY must be set".to_string())
        })?;

        // Neither id is required here. A session started without one reports
        // the problem on its own error surface instead of aborting startup.
        let assistant_id = optional_var("VOICEGATE_ASSISTANT_ID");
        let workflow_id = optional_var("VOICEGATE_WORKFLOW_ID");
        let relay_url = optional_var("VOICEGATE_RELAY_URL");

        let feedback_url = optional_var("FEEDBACK_API_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        let feedback_api_key = optional_var("FEEDBACK_API_KEY");

        // Configure logging level from RUST_LOG, with a sensible default.
        let log_level_str = env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(log_level_str))?;

        Ok(Self {
            assistant_id,
            workflow_id,
            relay_url,
            relay_api_key,
            feedback_url,
            feedback_api_key,
            log_level,
        })
    }

    /// The configured entry points, in the shape the session resolver takes.
    pub fn targets(&self) -> TargetConfig {
        TargetConfig {
            assistant_id: self.assistant_id.clone(),
            workflow_id: self.workflow_id.clone(),
        }
    }
}
