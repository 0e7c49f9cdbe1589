use serde::{Deserialize, Serialize};

/// How a single send/receive cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyOutcome {
    Completed,
    Failed,
    Cancelled,
}

/// Events emitted by the chat controllers.
/// The UI drains these each frame for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A message was appended or replaced in a conversation
    MessageApplied { conversation_id: String, message_id: String },

    /// A reply cycle began for a conversation
    ReplyStarted { conversation_id: String },

    /// A reply cycle ended; the conversation accepts sends again
    ReplyFinished { conversation_id: String, outcome: ReplyOutcome },

    /// The suggestion set for a conversation changed (empty means cleared)
    SuggestionsUpdated { conversation_id: String, suggestions: Vec<String> },

    /// Microphone and transcription session are live
    RecordingStarted,

    /// A transcript fragment arrived during recording
    TranscriptDelta { text: String },

    /// Recording was torn down
    RecordingStopped,

    /// Recording could not start or broke down
    RecordingFailed { message: String },
}
