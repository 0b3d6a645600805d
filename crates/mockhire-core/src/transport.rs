use crate::target::ConnectionTarget;
use crate::transcript::Speaker;
use anyhow::Result;
use async_trait::async_trait;

/// Events a live call reports back over its session-scoped channel.
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    /// The relay confirmed the call is live.
    CallStarted,
    /// The call ended, remotely or after a local hang-up.
    CallEnded,
    /// A piece of recognized speech. Interim chunks carry `is_final: false`
    /// and are superseded by a later final chunk for the same line.
    Utterance {
        speaker: Speaker,
        text: String,
        is_final: bool,
    },
    /// The agent began speaking.
    SpeechStarted,
    /// The agent stopped speaking.
    SpeechStopped,
    /// A runtime fault inside the transport. Does not end the call by itself.
    Error { detail: String },
}

/// A trait abstracting the real-time voice provider that carries a call.
/// The session drives the call through this interface, so different relays
/// (or test doubles) can sit behind the same call logic.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Dials the given target. On success the returned receiver carries every
    /// event of this call, in the order the relay emitted them; dropping it
    /// stops delivery.
    async fn start(
        &mut self,
        target: &ConnectionTarget,
    ) -> Result<tokio::sync::mpsc::Receiver<CallEvent>>;

    /// Hangs up the current call.
    async fn stop(&mut self) -> Result<()>;
}
