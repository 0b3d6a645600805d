use serde::{Deserialize, Serialize};

/// Who a transcript line belongs to, in the relay's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallRole {
    User,
    System,
    Assistant,
}

/// Whether a transcript chunk is still being revised or is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptKind {
    Partial,
    Final,
}

/// Payload of `call.start`: the entry point to dial plus the template
/// variables the agent interpolates into its script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStart {
    pub call_id: String,
    #[serde(default)]
    pub variable_values: serde_json::Map<String, serde_json::Value>,
}

/// Messages the client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "call.start")]
    CallStart(CallStart),
    #[serde(rename = "call.end")]
    CallEnd,
}

/// Messages the relay sends back during a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "call.started")]
    CallStarted,
    #[serde(rename = "call.ended")]
    CallEnded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    #[serde(rename = "transcript", rename_all = "camelCase")]
    Transcript {
        role: CallRole,
        transcript_type: TranscriptKind,
        transcript: String,
    },
    #[serde(rename = "speech.started")]
    SpeechStarted,
    #[serde(rename = "speech.stopped")]
    SpeechStopped,
    #[serde(rename = "error")]
    Error { message: String },
}
