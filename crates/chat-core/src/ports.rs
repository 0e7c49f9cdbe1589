//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! Implementations live in `chat-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use std::rc::Rc;
use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use chat_types::{
    Result,
    config::VoiceConfig,
    message::InlineImage,
};
use crate::codec::PcmFrame;

// ─── Chat Backend Port ───────────────────────────────────────

/// One item of a streaming reply
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyStreamEvent {
    /// A text fragment, in arrival order
    Delta(String),
    /// Stream finished normally
    Done,
    /// Stream broke down
    Error(String),
}

/// Ordered, finite, non-restartable reply sequence
pub type ReplyStream = Pin<Box<dyn Stream<Item = ReplyStreamEvent>>>;

/// The AI provider.
#[async_trait(?Send)]
pub trait ChatBackend {
    /// Create a conversational session conditioned on a persona instruction
    async fn create_session(&self, persona: &str) -> Result<Rc<dyn ChatSession>>;

    /// Non-streaming request for reply suggestions, constrained by `schema`.
    /// Returns the structured JSON the provider produced.
    async fn generate_suggestions(&self, source_text: &str, schema: &Value) -> Result<Value>;

    /// Open a realtime audio transcription session.
    /// `sink` receives transcript fragments and lifecycle notices.
    async fn open_realtime_transcription(
        &self,
        config: &TranscriptionConfig,
        sink: RealtimeSink,
    ) -> Result<Rc<dyn RealtimeTranscription>>;
}

/// A live conversational session bound to one persona.
#[async_trait(?Send)]
pub trait ChatSession {
    /// Send a user turn and receive the reply incrementally
    async fn send_streaming(&self, text: &str, image: Option<&InlineImage>) -> Result<ReplyStream>;
}

// ─── Realtime Transcription Port ─────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionConfig {
    pub model: String,
    pub sample_rate: u32,
}

/// Pushed by a realtime session while it is open
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    Transcript(String),
    Error(String),
    Closed,
}

pub type RealtimeSink = Box<dyn Fn(RealtimeEvent)>;

#[async_trait(?Send)]
pub trait RealtimeTranscription {
    /// Forward one PCM frame as realtime media input
    fn send_audio_frame(&self, frame: &PcmFrame) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

// ─── Audio Capture Port ──────────────────────────────────────

/// Receives each raw float frame produced by the processing pipeline
pub type FrameSink = Box<dyn FnMut(Vec<f32>)>;

#[async_trait(?Send)]
pub trait AudioCapturePort {
    /// Acquire the microphone and start the processing pipeline.
    async fn open(&self, config: &VoiceConfig, on_frame: FrameSink) -> Result<Box<dyn CaptureHandle>>;
}

/// Handles held while capturing. Each release step is independent.
#[async_trait(?Send)]
pub trait CaptureHandle {
    /// Stop and release the microphone stream
    fn stop_tracks(&self) -> Result<()>;

    /// Disconnect the processing pipeline
    fn disconnect(&self) -> Result<()>;

    /// Close the audio context
    async fn close(&self) -> Result<()>;
}

// ─── Object URL Port ─────────────────────────────────────────

/// Turns bytes into a locally resolvable reference (e.g. a blob URL)
pub trait ObjectUrlPort {
    fn create_object_url(&self, bytes: &[u8], mime_type: &str) -> Result<String>;

    fn revoke_object_url(&self, url: &str) -> Result<()>;
}
