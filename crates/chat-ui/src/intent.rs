//! What the user asked for during a frame.

use chat_types::config::BackendConfig;
use chat_types::message::InlineImage;

#[derive(Debug, Clone, PartialEq)]
pub enum UiIntent {
    SelectConversation(String),
    Send {
        conversation_id: String,
        text: String,
        image: Option<InlineImage>,
    },
    /// A reply suggestion was clicked; sent like typed text
    PickSuggestion {
        conversation_id: String,
        text: String,
    },
    StartRecording,
    StopRecording,
    AttachImage(InlineImage),
    ClearAttachment,
    ApplySettings(BackendConfig),
}
