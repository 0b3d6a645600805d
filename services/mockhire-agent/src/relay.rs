//! Bridges the VoiceGate relay client to the session's transport interface.

use anyhow::{Context, Result};
use async_trait::async_trait;
use mockhire_core::target::ConnectionTarget;
use mockhire_core::transcript::Speaker;
use mockhire_core::transport::{CallEvent, VoiceTransport};
use tokio::sync::{broadcast, mpsc};
use voicegate_realtime::types::{CallRole, CallStart, ServerMessage, TranscriptKind};

/// An adapter that implements the session's `VoiceTransport` on top of the
/// `voicegate_realtime::Client`, translating relay wire messages into the
/// session's event vocabulary as they arrive.
pub struct RelayTransport {
    client: voicegate_realtime::Client,
}

impl RelayTransport {
    pub fn new(client: voicegate_realtime::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VoiceTransport for RelayTransport {
    async fn start(&mut self, target: &ConnectionTarget) -> Result<mpsc::Receiver<CallEvent>> {
        // Subscribe before dialing so the start confirmation cannot be missed.
        let server_rx = self.client.server_events().await?;
        let (tx, rx) = mpsc::channel(128);
        spawn_forwarder(server_rx, tx);

        self.client
            .start_call(CallStart {
                call_id: target.id.clone(),
                variable_values: target.variables.clone(),
            })
            .await
            .context("Failed to send the call start request")?;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.client.end_call().await
    }
}

/// Translates one relay message into the session's event vocabulary.
fn translate(message: ServerMessage) -> CallEvent {
    match message {
        ServerMessage::CallStarted => CallEvent::CallStarted,
        ServerMessage::CallEnded { reason } => {
            if let Some(reason) = reason {
                tracing::debug!("relay ended the call: {}", reason);
            }
            CallEvent::CallEnded
        }
        ServerMessage::Transcript {
            role,
            transcript_type,
            transcript,
        } => CallEvent::Utterance {
            speaker: speaker_for(role),
            text: transcript,
            is_final: transcript_type == TranscriptKind::Final,
        },
        ServerMessage::SpeechStarted => CallEvent::SpeechStarted,
        ServerMessage::SpeechStopped => CallEvent::SpeechStopped,
        ServerMessage::Error { message } => CallEvent::Error { detail: message },
    }
}

fn speaker_for(role: CallRole) -> Speaker {
    match role {
        CallRole::User => Speaker::Candidate,
        CallRole::System => Speaker::System,
        CallRole::Assistant => Speaker::Agent,
    }
}

// Pumps relay messages into the session's event channel until either side
// goes away. A relay hang-up without a call.ended message still ends the
// session.
fn spawn_forwarder(mut server_rx: broadcast::Receiver<ServerMessage>, tx: mpsc::Sender<CallEvent>) {
    tokio::spawn(async move {
        loop {
            match server_rx.recv().await {
                Ok(message) => {
                    if tx.send(translate(message)).await.is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("relay event stream lagged by {} messages", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    let _ = tx.send(CallEvent::CallEnded).await;
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_relay_messages_translate_to_session_events() {
        // --- Arrange ---
        let (server_tx, server_rx) = broadcast::channel(32);
        let (tx, mut rx) = mpsc::channel(32);
        spawn_forwarder(server_rx, tx);

        // --- Act & Assert ---
        server_tx.send(ServerMessage::CallStarted).unwrap();
        assert_eq!(rx.recv().await.unwrap(), CallEvent::CallStarted);

        server_tx
            .send(ServerMessage::Transcript {
                role: CallRole::User,
                transcript_type: TranscriptKind::Final,
                transcript: "I like borrow checking.".to_string(),
            })
            .unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            CallEvent::Utterance {
                speaker: Speaker::Candidate,
                text: "I like borrow checking.".to_string(),
                is_final: true,
            }
        );

        server_tx
            .send(ServerMessage::Transcript {
                role: CallRole::Assistant,
                transcript_type: TranscriptKind::Partial,
                transcript: "Interest".to_string(),
            })
            .unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            CallEvent::Utterance {
                speaker: Speaker::Agent,
                text: "Interest".to_string(),
                is_final: false,
            }
        );

        server_tx
            .send(ServerMessage::Error {
                message: "no route to agent".to_string(),
            })
            .unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            CallEvent::Error {
                detail: "no route to agent".to_string(),
            }
        );

        server_tx
            .send(ServerMessage::CallEnded { reason: None })
            .unwrap();
        assert_eq!(rx.recv().await.unwrap(), CallEvent::CallEnded);
    }

    #[tokio::test]
    async fn test_relay_hang_up_still_ends_the_session() {
        let (server_tx, server_rx) = broadcast::channel(8);
        let (tx, mut rx) = mpsc::channel(8);
        spawn_forwarder(server_rx, tx);

        // The relay disappearing entirely must read as an end of call.
        drop(server_tx);
        assert_eq!(rx.recv().await.unwrap(), CallEvent::CallEnded);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_every_role_maps_to_a_speaker() {
        assert_eq!(speaker_for(CallRole::User), Speaker::Candidate);
        assert_eq!(speaker_for(CallRole::System), Speaker::System);
        assert_eq!(speaker_for(CallRole::Assistant), Speaker::Agent);
    }
}
