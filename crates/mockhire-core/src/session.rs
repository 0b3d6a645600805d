use crate::error::{self, CallError};
use crate::feedback::{FeedbackEngine, FeedbackRequest};
use crate::target::{self, TargetConfig};
use crate::transcript::Transcript;
use crate::transport::{CallEvent, VoiceTransport};
use crate::{Command, Route};
use std::fmt;
use tokio::sync::mpsc;

/// The lifecycle of a call session. It only ever moves forward,
/// `Idle -> Connecting -> Active -> Finished`, with one exception: a connect
/// that fails drops back from `Connecting` to `Idle` so the user can retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Idle,
    Connecting,
    Active,
    Finished,
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CallStatus::Idle => "idle",
            CallStatus::Connecting => "connecting",
            CallStatus::Active => "active",
            CallStatus::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// What kind of interview a session carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// The agent interviews the candidate in order to produce interview
    /// questions. No feedback is generated afterwards.
    Generate,
    /// The agent conducts a prepared interview that gets scored afterwards.
    Evaluate,
}

/// Inputs for a new session. Identity fields are optional and fall back to
/// placeholder values, so an anonymous practice run still works.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub mode: SessionMode,
    pub participant_name: Option<String>,
    pub participant_id: Option<String>,
    pub interview_id: Option<String>,
    pub feedback_id: Option<String>,
    pub questions: Option<Vec<String>>,
}

// Consumed the first time the session reaches `Finished`, no matter which
// path got it there. While this is `Some`, the post-call hand-off has not
// run yet.
#[derive(Debug)]
struct CompletionToken;

/// Tracks one interview call from dial to post-call hand-off.
///
/// The session owns no I/O. It is driven from the outside: `start` dials a
/// transport, `handle_event` applies whatever the transport reports, and the
/// resulting navigation is issued as a [`Command`] on the channel the caller
/// provides. That keeps every state decision in one place and testable with
/// plain channels and mocks.
#[derive(Debug)]
pub struct CallSession {
    status: CallStatus,
    mode: SessionMode,
    participant_name: String,
    participant_id: String,
    interview_id: Option<String>,
    feedback_id: Option<String>,
    questions: Option<Vec<String>>,
    transcript: Transcript,
    last_error: Option<String>,
    agent_speaking: bool,
    completion: Option<CompletionToken>,
}

impl CallSession {
    pub fn new(params: SessionParams) -> Self {
        Self {
            status: CallStatus::Idle,
            mode: params.mode,
            participant_name: params
                .participant_name
                .unwrap_or_else(|| "User".to_string()),
            participant_id: params
                .participant_id
                .unwrap_or_else(|| "unknown".to_string()),
            interview_id: params.interview_id,
            feedback_id: params.feedback_id,
            questions: params.questions,
            transcript: Transcript::new(),
            last_error: None,
            agent_speaking: false,
            completion: Some(CompletionToken),
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.status == CallStatus::Finished
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The text of the most recent finalized utterance, for live display.
    pub fn last_line(&self) -> Option<&str> {
        self.transcript.last_line()
    }

    /// Whether the agent is currently speaking.
    pub fn agent_speaking(&self) -> bool {
        self.agent_speaking
    }

    /// The most recent user-facing failure, if any. Cleared by the next
    /// connect attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Dials the transport. On success the session is `Connecting` and the
    /// returned receiver carries the events of this call. On failure the
    /// session is back at `Idle` with `last_error` describing the cause; the
    /// failure is never propagated as a hard error.
    ///
    /// Calling this while a call is underway does nothing.
    pub async fn start<T: VoiceTransport>(
        &mut self,
        transport: &mut T,
        targets: &TargetConfig,
    ) -> Option<mpsc::Receiver<CallEvent>> {
        if self.status != CallStatus::Idle {
            tracing::warn!(status = %self.status, "start ignored, a call is already underway");
            return None;
        }

        self.last_error = None;
        self.status = CallStatus::Connecting;

        let target = match target::resolve(
            targets,
            &self.participant_name,
            &self.participant_id,
            self.mode,
            self.questions.as_deref(),
        ) {
            Ok(target) => target,
            Err(err) => {
                self.fail_connect(err);
                return None;
            }
        };

        tracing::info!(kind = ?target.kind, id = %target.id, "starting call");
        match transport.start(&target).await {
            Ok(events) => Some(events),
            Err(err) => {
                let detail = error::connect_failure_detail(&err);
                self.fail_connect(CallError::ConnectionRejected { detail });
                None
            }
        }
    }

    fn fail_connect(&mut self, err: CallError) {
        tracing::error!("call could not be started: {}", err);
        self.last_error = Some(err.to_string());
        self.status = CallStatus::Idle;
    }

    /// Applies one transport event. Finalized utterances land in the
    /// transcript; the end-of-call event finishes the session and runs the
    /// post-call hand-off. Events arriving after the session finished are
    /// dropped.
    pub async fn handle_event<F: FeedbackEngine>(
        &mut self,
        event: CallEvent,
        feedback: &F,
        commands: &mpsc::Sender<Command>,
    ) {
        if self.status == CallStatus::Finished {
            tracing::debug!("event after the call finished, dropping");
            return;
        }

        match event {
            CallEvent::CallStarted => {
                if self.status == CallStatus::Connecting {
                    tracing::info!("call is live");
                    self.status = CallStatus::Active;
                } else {
                    tracing::debug!(status = %self.status, "unexpected call start confirmation");
                }
            }
            CallEvent::CallEnded => {
                tracing::info!("call ended");
                self.status = CallStatus::Finished;
                self.agent_speaking = false;
                self.complete(feedback, commands).await;
            }
            CallEvent::Utterance {
                speaker,
                text,
                is_final,
            } => {
                if is_final {
                    self.transcript.push(speaker, text);
                } else {
                    tracing::trace!("interim utterance dropped");
                }
            }
            CallEvent::SpeechStarted => {
                self.agent_speaking = true;
            }
            CallEvent::SpeechStopped => {
                self.agent_speaking = false;
            }
            CallEvent::Error { detail } => {
                let err = CallError::TransportRuntime { detail };
                tracing::error!("transport reported an error: {}", err);
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Hangs up an active call. The session finishes immediately; a transport
    /// that fails to shut down cleanly is logged and otherwise ignored, since
    /// the call is over either way.
    pub async fn stop<T: VoiceTransport, F: FeedbackEngine>(
        &mut self,
        transport: &mut T,
        feedback: &F,
        commands: &mpsc::Sender<Command>,
    ) {
        if self.status != CallStatus::Active {
            tracing::warn!(status = %self.status, "stop ignored, no active call");
            return;
        }

        tracing::info!("hanging up");
        self.status = CallStatus::Finished;
        self.agent_speaking = false;
        if let Err(err) = transport.stop().await {
            tracing::warn!("transport hang-up failed: {:#}", err);
        }
        self.complete(feedback, commands).await;
    }

    // Runs the post-call hand-off exactly once per session, no matter how
    // many end signals arrive.
    async fn complete<F: FeedbackEngine>(
        &mut self,
        feedback: &F,
        commands: &mpsc::Sender<Command>,
    ) {
        if self.completion.take().is_none() {
            tracing::debug!("post-call hand-off already ran");
            return;
        }

        let route = match self.mode {
            SessionMode::Generate => Route::Landing,
            SessionMode::Evaluate => self.dispatch_feedback(feedback).await,
        };

        if commands.send(Command::Navigate(route)).await.is_err() {
            tracing::warn!("command channel closed, navigation dropped");
        }
    }

    // Sends the transcript off for scoring and decides where to send the
    // user next. Every failure here degrades to the landing route; a lost
    // review is an inconvenience, not a crash.
    async fn dispatch_feedback<F: FeedbackEngine>(&self, feedback: &F) -> Route {
        let Some(interview_id) = self.interview_id.clone() else {
            tracing::warn!("session finished without an interview id, skipping feedback");
            return Route::Landing;
        };

        let request = FeedbackRequest {
            interview_id: interview_id.clone(),
            user_id: self.participant_id.clone(),
            transcript: self.transcript.entries().to_vec(),
            feedback_id: self.feedback_id.clone(),
        };

        match feedback.generate(request).await {
            Ok(outcome) => {
                if outcome.success {
                    if let Some(feedback_id) = outcome.feedback_id {
                        tracing::info!(%feedback_id, "feedback saved");
                        return Route::InterviewFeedback { interview_id };
                    }
                }
                tracing::warn!("feedback service did not save the review");
                Route::Landing
            }
            Err(err) => {
                let err = CallError::FeedbackDispatch {
                    reason: format!("{:#}", err),
                };
                tracing::warn!("{}", err);
                Route::Landing
            }
        }
    }
}
