use crate::transcript::TranscriptEntry;
use anyhow::{Context, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Everything the feedback service needs to score a finished interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptEntry>,
    /// Present when the session is regenerating an existing review in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

/// What the feedback service reports back after a scoring run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

// The `FeedbackEngine` trait is the contract for anything that can turn a
// finished transcript into a stored review. The session core only ever talks
// to this abstraction, which keeps the post-call hand-off testable without a
// running feedback service.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait FeedbackEngine {
    /// Scores the interview and stores the result, returning whether it was
    /// saved and under which id.
    async fn generate(&self, request: FeedbackRequest) -> Result<FeedbackOutcome>;
}

/// Talks to the feedback HTTP service.
pub struct FeedbackServiceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FeedbackServiceClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl FeedbackEngine for FeedbackServiceClient {
    async fn generate(&self, request: FeedbackRequest) -> Result<FeedbackOutcome> {
        let url = format!("{}/api/feedback", self.base_url.trim_end_matches('/'));

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to reach the feedback service")?
            .error_for_status()
            .context("Feedback service rejected the request")?;

        response
            .json::<FeedbackOutcome>()
            .await
            .context("Failed to decode the feedback service response")
    }
}
