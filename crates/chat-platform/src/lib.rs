//! Browser adapters for the chat-core ports.
//!
//! - `llm`: Gemini REST streaming, reply suggestions, live transcription
//! - `media`: microphone capture and object URLs

pub mod llm;
pub mod media;
