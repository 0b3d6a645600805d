use serde::{Deserialize, Serialize};

/// Who produced a line of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The human being interviewed.
    Candidate,
    /// Injected prompts and announcements.
    System,
    /// The AI interviewer.
    Agent,
}

/// One finalized utterance, attributed to its speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// The finalized utterances of a call, in arrival order.
///
/// Interim recognition results never land here; callers commit a line only
/// once the transport marks it final. Entries are append-only for the life
/// of the session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finalized utterance.
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            speaker,
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// The text of the most recent utterance, if any.
    pub fn last_line(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_arrival_order() {
        let mut transcript = Transcript::new();
        transcript.push(Speaker::Agent, "Tell me about yourself.");
        transcript.push(Speaker::Candidate, "I write Rust.");
        transcript.push(Speaker::Agent, "Go on.");

        let texts: Vec<&str> = transcript
            .entries()
            .iter()
            .map(|entry| entry.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec!["Tell me about yourself.", "I write Rust.", "Go on."]
        );
        assert_eq!(transcript.entries()[1].speaker, Speaker::Candidate);
    }

    #[test]
    fn test_last_line_tracks_the_newest_entry() {
        let mut transcript = Transcript::new();
        assert!(transcript.last_line().is_none());

        transcript.push(Speaker::Agent, "First question.");
        assert_eq!(transcript.last_line(), Some("First question."));

        transcript.push(Speaker::Candidate, "An answer.");
        assert_eq!(transcript.last_line(), Some("An answer."));
    }

    #[test]
    fn test_duplicate_lines_pass_through_unchanged() {
        // The relay is trusted on finality; a repeated final event is two
        // entries, not one.
        let mut transcript = Transcript::new();
        transcript.push(Speaker::Candidate, "Yes.");
        transcript.push(Speaker::Candidate, "Yes.");
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_empty_transcript_reports_as_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
    }
}
