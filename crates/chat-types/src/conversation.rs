use serde::{Deserialize, Serialize};
use crate::message::Message;

/// Profile of an AI-backed contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

/// A contact pairing plus its message history and persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub contact: Contact,
    /// Chronological as authored
    pub messages: Vec<Message>,
    /// Handed to the backend when the conversation's session is created.
    pub persona: String,
}

impl Conversation {
    pub fn new(id: impl Into<String>, contact: Contact, persona: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            contact,
            messages: Vec::new(),
            persona: persona.into(),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Sidebar preview line
    pub fn preview(&self) -> &str {
        match self.last_message() {
            Some(m) if !m.text.is_empty() => &m.text,
            _ => "No messages yet",
        }
    }
}
