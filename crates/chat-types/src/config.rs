use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LIVE_MODEL: &str = "gemini-2.5-flash-native-audio-preview-09-2025";

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub backend: BackendConfig,
    pub voice: VoiceConfig,
    pub reply: ReplyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub chat_model: String,
    pub live_model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: option_env!("GEMINI_API_KEY").unwrap_or_default().to_string(),
            api_base: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            live_model: DEFAULT_LIVE_MODEL.to_string(),
        }
    }
}

impl BackendConfig {
    pub fn base_url(&self) -> &str {
        self.api_base
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// WebSocket origin derived from the HTTP base URL
    pub fn ws_base_url(&self) -> String {
        let base = self.base_url();
        if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        }
    }
}

/// Microphone capture parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub sample_rate: u32,
    /// Samples per processing block
    pub frame_size: u32,
    pub channels: u16,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_size: 4096,
            channels: 1,
        }
    }
}

impl VoiceConfig {
    /// MIME type of the PCM frames forwarded to the transcription session
    pub fn pcm_mime_type(&self) -> String {
        format!("audio/pcm;rate={}", self.sample_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Text of the reply placeholder before any fragment arrives
    pub placeholder_text: String,
    /// Appended to streamed text while the reply is in flight
    pub cursor: String,
    /// Replaces the placeholder when the reply fails
    pub error_text: String,
    pub max_suggestions: usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            placeholder_text: "...".to_string(),
            cursor: "▌".to_string(),
            error_text: "Sorry, I encountered an error. Please try again.".to_string(),
            max_suggestions: 3,
        }
    }
}
