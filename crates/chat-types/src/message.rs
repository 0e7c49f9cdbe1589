use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Contact,
}

/// Local delivery status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Delivered,
    Read,
    Error,
}

impl MessageStatus {
    pub fn label(&self) -> &str {
        match self {
            MessageStatus::Sending => "sending",
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
            MessageStatus::Error => "error",
        }
    }
}

/// A single message in a conversation.
///
/// `id` is assigned once when the message is created and is reused for
/// every later update of the same logical message (streamed text, final
/// status, error replacement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
    /// `data:` URI of an attached image
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    /// Locally resolvable audio reference (object URL)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audio_url: Option<String>,
}

impl Message {
    /// A fresh outgoing user message in the `sending` state.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: new_message_id("user"),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            status: MessageStatus::Sending,
            image_url: None,
            audio_url: None,
        }
    }

    /// A contact reply placeholder. Its id is the target of every streamed update.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::placeholder_with_id(new_message_id("ai"), text)
    }

    pub fn placeholder_with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: Sender::Contact,
            text: text.into(),
            timestamp: Utc::now(),
            status: MessageStatus::Sending,
            image_url: None,
            audio_url: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_image(mut self, image: &InlineImage) -> Self {
        self.image_url = Some(image.data_uri());
        self
    }

    pub fn with_audio(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = Some(audio_url.into());
        self
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Generate a message identifier with a readable prefix, e.g. `user-3f1c…`.
pub fn new_message_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// An image attached to an outgoing message, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// What the user asked to send: text plus optional image or voice attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub image: Option<InlineImage>,
    pub audio_url: Option<String>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_audio(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = Some(audio_url.into());
        self
    }

    /// Whitespace-only text with no image attached
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }
}
