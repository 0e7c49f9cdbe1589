//! UI-level state that drives rendering.
//! A read-only projection of the store and controllers, updated each
//! frame by draining the EventBus.

use std::collections::{HashMap, HashSet};
use chat_types::config::BackendConfig;
use chat_types::conversation::Conversation;
use chat_types::event::{ChatEvent, ReplyOutcome};
use chat_types::message::InlineImage;

/// State visible to UI panels
pub struct UiState {
    /// Conversation list, most recent first
    pub conversations: Vec<Conversation>,
    pub active_conversation: Option<String>,
    /// Input field content
    pub input_text: String,
    /// Image attached to the next send
    pub attachment: Option<InlineImage>,
    pub recording: bool,
    pub live_transcript: String,
    pub voice_error: Option<String>,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Settings being edited, applied on demand
    pub settings_draft: BackendConfig,
    /// Status line text
    pub status_text: String,
    responding: HashSet<String>,
    suggestions: HashMap<String, Vec<String>>,
    stale: bool,
}

impl UiState {
    pub fn new(settings: BackendConfig) -> Self {
        Self {
            conversations: Vec::new(),
            active_conversation: None,
            input_text: String::new(),
            attachment: None,
            recording: false,
            live_transcript: String::new(),
            voice_error: None,
            show_settings: false,
            settings_draft: settings,
            status_text: "Ready".to_string(),
            responding: HashSet::new(),
            suggestions: HashMap::new(),
            stale: true,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::MessageApplied { .. } => {
                    self.stale = true;
                }
                ChatEvent::ReplyStarted { conversation_id } => {
                    self.responding.insert(conversation_id);
                }
                ChatEvent::ReplyFinished { conversation_id, outcome } => {
                    self.responding.remove(&conversation_id);
                    self.status_text = match outcome {
                        ReplyOutcome::Failed => "Reply failed".to_string(),
                        _ => "Ready".to_string(),
                    };
                }
                ChatEvent::SuggestionsUpdated { conversation_id, suggestions } => {
                    if suggestions.is_empty() {
                        self.suggestions.remove(&conversation_id);
                    } else {
                        self.suggestions.insert(conversation_id, suggestions);
                    }
                }
                ChatEvent::RecordingStarted => {
                    self.recording = true;
                    self.live_transcript.clear();
                    self.voice_error = None;
                    self.status_text = "Recording...".to_string();
                }
                ChatEvent::TranscriptDelta { text } => {
                    self.live_transcript.push_str(&text);
                }
                ChatEvent::RecordingStopped => {
                    self.recording = false;
                    self.live_transcript.clear();
                    if self.voice_error.is_none() {
                        self.status_text = "Ready".to_string();
                    }
                }
                ChatEvent::RecordingFailed { message } => {
                    self.recording = false;
                    self.status_text = format!("Voice error: {}", message);
                    self.voice_error = Some(message);
                }
            }
        }
    }

    /// Whether the conversation list must be re-read from the store
    pub fn needs_sync(&self) -> bool {
        self.stale
    }

    pub fn sync_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
        self.stale = false;
    }

    pub fn select(&mut self, conversation_id: &str) {
        if self.active_conversation.as_deref() != Some(conversation_id) {
            self.active_conversation = Some(conversation_id.to_string());
            self.input_text.clear();
            self.attachment = None;
        }
    }

    pub fn active(&self) -> Option<&Conversation> {
        let id = self.active_conversation.as_deref()?;
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn is_responding(&self, conversation_id: &str) -> bool {
        self.responding.contains(conversation_id)
    }

    pub fn suggestions(&self, conversation_id: &str) -> &[String] {
        self.suggestions
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when the input bar would send something
    pub fn can_send(&self) -> bool {
        !self.input_text.trim().is_empty() || self.attachment.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.recording || !self.responding.is_empty()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}
