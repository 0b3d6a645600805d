use thiserror::Error;

/// Shown when a rejected connect carries no usable detail of its own.
pub const GENERIC_CONNECT_FAILURE: &str =
    "Failed to start the call. Please check your configuration.";

/// Failures that can occur over the life of a call session.
///
/// None of these abort the program. The session records the most recent one
/// as its displayable error state and carries on in whatever state the
/// failure left it.
#[derive(Debug, Error)]
pub enum CallError {
    /// Neither an assistant id nor a workflow id was configured.
    #[error(
        "Missing call configuration. Set VOICEGATE_ASSISTANT_ID or VOICEGATE_WORKFLOW_ID in the environment"
    )]
    ConfigurationMissing,

    /// The relay refused to open the call.
    #[error("{detail}")]
    ConnectionRejected { detail: String },

    /// The relay reported a fault while the call was up.
    #[error("Call error: {detail}")]
    TransportRuntime { detail: String },

    /// The post-call feedback hand-off did not produce a stored review.
    #[error("Feedback generation failed: {reason}")]
    FeedbackDispatch { reason: String },
}

/// Pulls the most specific cause out of a connect failure for display.
///
/// Relay errors tend to arrive wrapped in several layers of context; the
/// innermost message is the one worth showing. A blank chain falls back to a
/// generic hint.
pub(crate) fn connect_failure_detail(err: &anyhow::Error) -> String {
    let detail = err.root_cause().to_string();
    if detail.trim().is_empty() {
        GENERIC_CONNECT_FAILURE.to_string()
    } else {
        detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_detail_prefers_the_root_cause() {
        let err: anyhow::Error = anyhow::anyhow!("relay refused the token")
            .context("websocket handshake failed")
            .context("could not open the call");
        assert_eq!(connect_failure_detail(&err), "relay refused the token");
    }

    #[test]
    fn test_connect_detail_falls_back_when_the_cause_is_blank() {
        let err = anyhow::anyhow!("   ");
        assert_eq!(connect_failure_detail(&err), GENERIC_CONNECT_FAILURE);
    }

    #[test]
    fn test_missing_configuration_names_the_variables() {
        let message = CallError::ConfigurationMissing.to_string();
        assert!(message.contains("VOICEGATE_ASSISTANT_ID"));
        assert!(message.contains("VOICEGATE_WORKFLOW_ID"));
    }
}
