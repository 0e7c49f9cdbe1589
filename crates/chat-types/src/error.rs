use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Suggestion error: {0}")]
    Suggestion(String),

    #[error("Voice session error: {0}")]
    Voice(String),

    #[error("Microphone error: {0}")]
    Microphone(String),

    #[error("Audio pipeline error: {0}")]
    Audio(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
