pub mod error;
pub mod feedback;
pub mod session;
pub mod target;
pub mod transcript;
pub mod transport;

/// Represents commands the session core issues to the hosting runtime.
///
/// The session never performs navigation itself; it asks the runtime to do
/// it through this channel. This keeps the core's decisions decoupled from
/// whatever surface (CLI, web shell) is actually showing the interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Take the user to the given screen.
    Navigate(Route),
}

/// Screens the runtime can be asked to show after a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The start screen.
    Landing,
    /// The feedback page for a finished interview.
    InterviewFeedback { interview_id: String },
}

impl Route {
    /// The URL-style path for this screen.
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::InterviewFeedback { interview_id } => {
                format!("/interview/{interview_id}/feedback")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_render_their_paths() {
        assert_eq!(Route::Landing.path(), "/");
        assert_eq!(
            Route::InterviewFeedback {
                interview_id: "int-42".to_string(),
            }
            .path(),
            "/interview/int-42/feedback"
        );
    }
}
