use crate::error::CallError;
use crate::session::SessionMode;
use serde_json::{Map, Value};

/// Which kind of relay entry point a call dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Assistant,
    Workflow,
}

/// Everything the transport needs to place a call: the entry point to dial
/// and the template variables the agent interpolates into its script.
#[derive(Debug, Clone)]
pub struct ConnectionTarget {
    pub kind: TargetKind,
    pub id: String,
    pub variables: Map<String, Value>,
}

/// The configured relay entry points. Both are optional; resolution decides
/// which one a session actually uses.
#[derive(Debug, Clone, Default)]
pub struct TargetConfig {
    pub assistant_id: Option<String>,
    pub workflow_id: Option<String>,
}

/// Loose shape check for relay ids: 36 characters of hex digits and hyphens.
/// The relay is the authority on validity, so a failed check is only worth a
/// warning, never a refusal to dial.
pub fn looks_like_call_id(id: &str) -> bool {
    id.len() == 36 && id.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// Picks the entry point for a session and assembles its template variables.
///
/// The assistant id wins when both are configured. `username` and `userid`
/// are always present; `questions` is included only for sessions that run a
/// prepared interview, formatted as a bulleted list.
pub fn resolve(
    config: &TargetConfig,
    participant_name: &str,
    participant_id: &str,
    mode: SessionMode,
    questions: Option<&[String]>,
) -> Result<ConnectionTarget, CallError> {
    let (kind, id) = if let Some(id) = &config.assistant_id {
        (TargetKind::Assistant, id.clone())
    } else if let Some(id) = &config.workflow_id {
        (TargetKind::Workflow, id.clone())
    } else {
        return Err(CallError::ConfigurationMissing);
    };

    if !looks_like_call_id(&id) {
        tracing::warn!(
            kind = ?kind,
            "configured id does not look like a relay id, dialing anyway"
        );
    }

    let mut variables = Map::new();
    variables.insert(
        "username".to_string(),
        Value::String(participant_name.to_string()),
    );
    variables.insert(
        "userid".to_string(),
        Value::String(participant_id.to_string()),
    );
    if mode != SessionMode::Generate {
        if let Some(questions) = questions {
            let formatted = questions
                .iter()
                .map(|question| format!("- {question}"))
                .collect::<Vec<_>>()
                .join("\n");
            variables.insert("questions".to_string(), Value::String(formatted));
        }
    }

    Ok(ConnectionTarget {
        kind,
        id,
        variables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSISTANT: &str = "11111111-2222-3333-4444-555555555555";
    const WORKFLOW: &str = "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee";

    fn both_ids() -> TargetConfig {
        TargetConfig {
            assistant_id: Some(ASSISTANT.to_string()),
            workflow_id: Some(WORKFLOW.to_string()),
        }
    }

    #[test]
    fn test_assistant_id_wins_over_workflow_id() {
        let target = resolve(&both_ids(), "Ada", "user-7", SessionMode::Evaluate, None)
            .expect("target should resolve");
        assert_eq!(target.kind, TargetKind::Assistant);
        assert_eq!(target.id, ASSISTANT);
    }

    #[test]
    fn test_workflow_id_is_the_fallback() {
        let config = TargetConfig {
            assistant_id: None,
            workflow_id: Some(WORKFLOW.to_string()),
        };
        let target = resolve(&config, "Ada", "user-7", SessionMode::Generate, None)
            .expect("target should resolve");
        assert_eq!(target.kind, TargetKind::Workflow);
        assert_eq!(target.id, WORKFLOW);
    }

    #[test]
    fn test_missing_both_ids_is_a_configuration_error() {
        let err = resolve(
            &TargetConfig::default(),
            "Ada",
            "user-7",
            SessionMode::Evaluate,
            None,
        )
        .expect_err("resolution should fail");
        assert!(matches!(err, CallError::ConfigurationMissing));
    }

    #[test]
    fn test_identity_variables_are_always_present() {
        let target = resolve(&both_ids(), "Ada", "user-7", SessionMode::Generate, None)
            .expect("target should resolve");
        assert_eq!(
            target.variables.get("username"),
            Some(&Value::String("Ada".to_string()))
        );
        assert_eq!(
            target.variables.get("userid"),
            Some(&Value::String("user-7".to_string()))
        );
    }

    #[test]
    fn test_questions_are_bulleted_for_prepared_interviews() {
        let questions = vec!["Why Rust?".to_string(), "What is Send?".to_string()];
        let target = resolve(
            &both_ids(),
            "Ada",
            "user-7",
            SessionMode::Evaluate,
            Some(&questions),
        )
        .expect("target should resolve");
        assert_eq!(
            target.variables.get("questions"),
            Some(&Value::String("- Why Rust?\n- What is Send?".to_string()))
        );
    }

    #[test]
    fn test_generate_sessions_omit_questions() {
        let questions = vec!["Why Rust?".to_string()];
        let target = resolve(
            &both_ids(),
            "Ada",
            "user-7",
            SessionMode::Generate,
            Some(&questions),
        )
        .expect("target should resolve");
        assert!(!target.variables.contains_key("questions"));
    }

    #[test]
    fn test_id_shape_check_accepts_uuids_and_rejects_junk() {
        assert!(looks_like_call_id(ASSISTANT));
        assert!(looks_like_call_id("ABCDEF00-1111-2222-3333-444444444444"));
        assert!(!looks_like_call_id("not-an-id"));
        assert!(!looks_like_call_id(
            "zzzzzzzz-2222-3333-4444-555555555555"
        ));
    }
}
