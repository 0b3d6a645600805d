//! Loads interview plans from disk.
//!
//! A scored session runs against a prepared interview: its id, the role it
//! targets, and the question list the agent works through. Plans live in
//! JSON files so they can be edited without touching code.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A prepared interview for a scored session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPlan {
    /// Identifies the interview to the feedback service.
    pub interview_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    /// Set when re-running an interview whose review should be replaced.
    #[serde(default)]
    pub feedback_id: Option<String>,
}

/// Reads a plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<InterviewPlan> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read interview plan at {:?}", path))?;
    let plan: InterviewPlan = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid interview plan in {:?}", path))?;

    if plan.questions.is_empty() {
        tracing::warn!("interview plan has no questions, the agent will improvise");
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_plan_successfully() -> Result<()> {
        // 1. Arrange: Write a plan file into a temporary directory.
        let dir = tempdir()?;
        let path = dir.path().join("backend.json");
        let mut file = File::create(&path)?;
        write!(
            file,
            r#"{{
                "interviewId": "int-9",
                "role": "Backend Engineer",
                "questions": ["Explain ownership.", "What does Send mean?"]
            }}"#
        )?;

        // 2. Act: Load it back.
        let plan = load_plan(&path)?;

        // 3. Assert: Every field round-tripped.
        assert_eq!(plan.interview_id, "int-9");
        assert_eq!(plan.role.as_deref(), Some("Backend Engineer"));
        assert_eq!(plan.questions.len(), 2);
        assert_eq!(plan.questions[0], "Explain ownership.");
        assert!(plan.feedback_id.is_none());
        Ok(())
    }

    #[test]
    fn test_load_plan_defaults_optional_fields() -> Result<()> {
        // Arrange: A minimal plan with only the required id.
        let dir = tempdir()?;
        let path = dir.path().join("minimal.json");
        let mut file = File::create(&path)?;
        write!(file, r#"{{"interviewId": "int-1"}}"#)?;

        let plan = load_plan(&path)?;

        assert_eq!(plan.interview_id, "int-1");
        assert!(plan.role.is_none());
        assert!(plan.questions.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_plan_from_nonexistent_file() {
        // Arrange: A path that does not exist.
        let result = load_plan(Path::new("no/such/plan.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_plan_rejects_invalid_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.json");
        let mut file = File::create(&path)?;
        write!(file, "not json at all")?;

        let result = load_plan(&path);
        assert!(result.is_err());
        Ok(())
    }
}
