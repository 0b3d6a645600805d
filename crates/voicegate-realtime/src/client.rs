use crate::types;
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

mod config;
mod consts;
mod utils;

pub use config::Config;

pub type ClientTx = tokio::sync::mpsc::Sender<types::ClientMessage>;
type ServerTx = tokio::sync::broadcast::Sender<types::ServerMessage>;
pub type ServerRx = tokio::sync::broadcast::Receiver<types::ServerMessage>;

/// Handles for the two pump tasks that own the socket halves. They detach
/// when dropped and run until the socket closes.
pub struct Connection {
    pub(crate) send_handle: tokio::task::JoinHandle<()>,
    pub(crate) recv_handle: tokio::task::JoinHandle<()>,
}

/// A client for the VoiceGate call relay.
///
/// Outbound messages flow through an mpsc channel into the socket's send
/// task; inbound messages fan out over a broadcast channel to any number of
/// subscribers.
pub struct Client {
    capacity: usize,
    config: Config,
    c_tx: Option<ClientTx>,
    s_tx: Option<ServerTx>,
}

impl Client {
    fn new(capacity: usize, config: Config) -> Self {
        Self {
            capacity,
            config,
            c_tx: None,
            s_tx: None,
        }
    }

    async fn connect(&mut self) -> Result<Connection> {
        if self.c_tx.is_some() {
            anyhow::bail!("already connected");
        }

        let request = utils::build_request(&self.config).context("invalid relay request")?;
        let (ws_stream, _) = tokio_tungstenite::connect_async(request)
            .await
            .context("Failed to connect to the VoiceGate relay")?;

        let (mut write, mut read) = ws_stream.split();

        let (c_tx, mut c_rx) = tokio::sync::mpsc::channel(self.capacity);
        let (s_tx, _) = tokio::sync::broadcast::channel(self.capacity);

        self.c_tx = Some(c_tx.clone());
        self.s_tx = Some(s_tx.clone());

        let send_handle = tokio::spawn(async move {
            while let Some(message) = c_rx.recv().await {
                match serde_json::to_string(&message) {
                    Ok(text) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            tracing::error!("failed to send message: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::error!("failed to serialize message: {}", e);
                    }
                }
            }
        });

        let recv_handle = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                let message = match message {
                    Err(e) => {
                        tracing::error!("failed to read message: {}", e);
                        break;
                    }
                    Ok(message) => message,
                };
                match message {
                    Message::Text(text) => {
                        match serde_json::from_str::<types::ServerMessage>(&text) {
                            Ok(event) => {
                                if s_tx.send(event).is_err() {
                                    tracing::debug!("no subscribers for relay event");
                                }
                            }
                            Err(e) => {
                                tracing::error!(
                                    "failed to deserialize relay message: {}, text=> {:?}",
                                    e,
                                    text
                                );
                            }
                        }
                    }
                    Message::Binary(bin) => {
                        tracing::warn!("unexpected binary message: {} bytes", bin.len());
                    }
                    Message::Close(reason) => {
                        tracing::info!("connection closed: {:?}", reason);
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(Connection {
            send_handle,
            recv_handle,
        })
    }

    /// Subscribes to the relay's event stream. Each call returns a fresh
    /// receiver that sees every message from its moment of subscription on.
    pub async fn server_events(&mut self) -> Result<ServerRx> {
        match self.s_tx {
            Some(ref tx) => Ok(tx.subscribe()),
            None => anyhow::bail!("not connected yet"),
        }
    }

    async fn send_client_message(&mut self, message: types::ClientMessage) -> Result<()> {
        match self.c_tx {
            Some(ref tx) => {
                tx.send(message).await.context("relay send queue closed")?;
                Ok(())
            }
            None => anyhow::bail!("not connected yet"),
        }
    }

    /// Asks the relay to dial the given assistant or workflow.
    pub async fn start_call(&mut self, call: types::CallStart) -> Result<()> {
        self.send_client_message(types::ClientMessage::CallStart(call))
            .await
    }

    /// Asks the relay to hang up the current call.
    pub async fn end_call(&mut self) -> Result<()> {
        self.send_client_message(types::ClientMessage::CallEnd)
            .await
    }
}

pub async fn connect_with_config(capacity: usize, config: Config) -> Result<Client> {
    let mut client = Client::new(capacity, config);
    client.connect().await?;
    Ok(client)
}

pub async fn connect() -> Result<Client> {
    let config = Config::new();
    connect_with_config(1024, config).await
}
