//! Live transcription over the Gemini `BidiGenerateContent` WebSocket.
//!
//! Architecture:
//! - Writer task: drains an unbounded channel of JSON frames into the socket
//! - Reader task: parses server messages and pushes them into the sink
//! - `connect` resolves once the server acknowledges setup, or times out
//!
//! Only the input transcription is consumed; the model's own audio output
//! is ignored.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use async_trait::async_trait;
use futures::channel::{mpsc, oneshot};
use futures::future::{self, Either};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message};
use gloo_timers::future::TimeoutFuture;
use serde_json::{json, Value};
use wasm_bindgen_futures::spawn_local;

use chat_core::codec::PcmFrame;
use chat_core::ports::{RealtimeEvent, RealtimeSink, RealtimeTranscription, TranscriptionConfig};
use chat_types::{ChatError, Result};

const SETUP_TIMEOUT_MS: u32 = 10_000;

/// What the reader task cares about in a server message
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    SetupComplete,
    Transcript(String),
    Error(String),
    Ignored,
}

pub fn setup_message(config: &TranscriptionConfig) -> Value {
    json!({
        "setup": {
            "model": format!("models/{}", config.model),
            "generationConfig": { "responseModalities": ["AUDIO"] },
            "inputAudioTranscription": {},
        }
    })
}

pub fn audio_message(frame: &PcmFrame) -> Value {
    json!({
        "realtimeInput": {
            "mediaChunks": [{
                "mimeType": frame.mime_type,
                "data": frame.data,
            }]
        }
    })
}

pub fn parse_server_message(text: &str) -> ServerMessage {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return ServerMessage::Error(format!("Malformed server message: {}", e)),
    };
    if value.get("setupComplete").is_some() {
        return ServerMessage::SetupComplete;
    }
    if let Some(error) = value.get("error") {
        let message = error["message"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return ServerMessage::Error(message);
    }
    match value["serverContent"]["inputTranscription"]["text"].as_str() {
        Some(text) if !text.is_empty() => ServerMessage::Transcript(text.to_string()),
        _ => ServerMessage::Ignored,
    }
}

/// Event handed to the sink for a message read once setup is done.
/// Nothing is forwarded after the session was closed locally.
pub fn sink_event(message: ServerMessage, closed: bool) -> Option<RealtimeEvent> {
    if closed {
        return None;
    }
    match message {
        ServerMessage::Transcript(fragment) => Some(RealtimeEvent::Transcript(fragment)),
        ServerMessage::Error(message) => Some(RealtimeEvent::Error(message)),
        ServerMessage::SetupComplete | ServerMessage::Ignored => None,
    }
}

pub struct GeminiLiveTranscription {
    outbound: mpsc::UnboundedSender<String>,
    closed: Rc<Cell<bool>>,
    writer_done: RefCell<Option<oneshot::Receiver<()>>>,
}

impl GeminiLiveTranscription {
    /// Open the socket, send the setup message and wait for the server to
    /// acknowledge it.
    pub async fn connect(url: &str, config: &TranscriptionConfig, sink: RealtimeSink) -> Result<Self> {
        let socket = WebSocket::open(url)
            .map_err(|e| ChatError::Voice(format!("Failed to open live session: {}", e)))?;
        let (mut write, mut read) = socket.split();

        let (outbound, mut queue) = mpsc::unbounded::<String>();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        outbound
            .unbounded_send(setup_message(config).to_string())
            .map_err(|e| ChatError::Voice(e.to_string()))?;

        spawn_local(async move {
            while let Some(frame) = queue.next().await {
                if let Err(e) = write.send(Message::Text(frame)).await {
                    log::warn!("Live session write failed: {}", e);
                    break;
                }
            }
            if let Err(e) = write.close().await {
                log::debug!("Live session close: {}", e);
            }
            let _ = done_tx.send(());
        });

        let closed = Rc::new(Cell::new(false));
        let reader_closed = closed.clone();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();
        spawn_local(async move {
            let mut ready_tx = Some(ready_tx);
            while let Some(incoming) = read.next().await {
                let text = match incoming {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Bytes(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(e) => {
                        let message = e.to_string();
                        match ready_tx.take() {
                            Some(tx) => {
                                let _ = tx.send(Err(ChatError::Voice(message)));
                            }
                            None if !reader_closed.get() => sink(RealtimeEvent::Error(message)),
                            None => {}
                        }
                        return;
                    }
                };

                match parse_server_message(&text) {
                    ServerMessage::SetupComplete => {
                        if let Some(tx) = ready_tx.take() {
                            let _ = tx.send(Ok(()));
                        }
                    }
                    ServerMessage::Error(message) if ready_tx.is_some() => {
                        if let Some(tx) = ready_tx.take() {
                            let _ = tx.send(Err(ChatError::Voice(message)));
                        }
                        return;
                    }
                    other => {
                        if let Some(event) = sink_event(other, reader_closed.get()) {
                            sink(event);
                        }
                    }
                }
            }

            match ready_tx.take() {
                Some(tx) => {
                    let _ = tx.send(Err(ChatError::Voice(
                        "Live session closed before setup completed".to_string(),
                    )));
                }
                None => sink(RealtimeEvent::Closed),
            }
        });

        let session = Self {
            outbound,
            closed,
            writer_done: RefCell::new(Some(done_rx)),
        };

        let timeout = Box::pin(TimeoutFuture::new(SETUP_TIMEOUT_MS));
        match future::select(ready_rx, timeout).await {
            Either::Left((Ok(Ok(())), _)) => {
                log::info!("Live transcription session open");
                Ok(session)
            }
            Either::Left((Ok(Err(e)), _)) => {
                session.shutdown();
                Err(e)
            }
            Either::Left((Err(_), _)) => {
                session.shutdown();
                Err(ChatError::Voice("Live session reader stopped".to_string()))
            }
            Either::Right(_) => {
                session.shutdown();
                Err(ChatError::Timeout(SETUP_TIMEOUT_MS as u64))
            }
        }
    }

    fn shutdown(&self) {
        self.closed.set(true);
        self.outbound.close_channel();
    }
}

#[async_trait(?Send)]
impl RealtimeTranscription for GeminiLiveTranscription {
    fn send_audio_frame(&self, frame: &PcmFrame) -> Result<()> {
        if self.closed.get() {
            return Err(ChatError::Voice("Live session is closed".to_string()));
        }
        self.outbound
            .unbounded_send(audio_message(frame).to_string())
            .map_err(|e| ChatError::Voice(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.get() {
            return Ok(());
        }
        self.shutdown();
        let done = self.writer_done.borrow_mut().take();
        if let Some(done) = done {
            done.await
                .map_err(|_| ChatError::Voice("Live session writer dropped".to_string()))?;
        }
        log::info!("Live transcription session closed");
        Ok(())
    }
}
