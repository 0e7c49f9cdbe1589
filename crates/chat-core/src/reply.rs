//! Streaming reply controller: drives one send/receive cycle.
//!
//! Per send: Idle → Sending → Streaming → {Completed | Failed}.
//! 1. Reject empty input or a conversation that is already responding
//! 2. Apply the user message, acquire the session, register a placeholder
//! 3. Fold each streamed fragment into the placeholder (with a cursor)
//! 4. Finalise the placeholder, then fetch reply suggestions
//! 5. On any failure, replace the placeholder with an apology
//!
//! Backend errors never leave this module.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use futures::StreamExt;
use chat_types::{
    ChatError, Result,
    config::ReplyConfig,
    event::{ChatEvent, ReplyOutcome},
    message::{Message, MessageStatus, OutgoingMessage},
};
use crate::cancel::CancellationToken;
use crate::event_bus::EventBus;
use crate::ports::ReplyStreamEvent;
use crate::sessions::SessionRegistry;
use crate::store::MessageStore;
use crate::suggestions::SuggestionGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Whitespace-only text and no image
    Empty,
    /// A reply is already in flight for this conversation
    Busy,
    UnknownConversation,
}

/// Result of a `send` call. Rejections create no message and are not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(RejectReason),
    Replied(ReplyOutcome),
}

struct StreamedReply {
    text: String,
    cancelled: bool,
}

pub struct ReplyController {
    store: MessageStore,
    sessions: Rc<SessionRegistry>,
    suggestions: SuggestionGenerator,
    events: EventBus,
    config: ReplyConfig,
    responding: RefCell<HashSet<String>>,
    suggestion_sets: RefCell<HashMap<String, Vec<String>>>,
}

impl ReplyController {
    pub fn new(
        store: MessageStore,
        sessions: Rc<SessionRegistry>,
        events: EventBus,
        config: ReplyConfig,
    ) -> Self {
        Self {
            suggestions: SuggestionGenerator::new(config.max_suggestions),
            store,
            sessions,
            events,
            config,
            responding: RefCell::new(HashSet::new()),
            suggestion_sets: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_responding(&self, conversation_id: &str) -> bool {
        self.responding.borrow().contains(conversation_id)
    }

    /// Current suggestion set for a conversation
    pub fn suggestions(&self, conversation_id: &str) -> Vec<String> {
        self.suggestion_sets
            .borrow()
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn clear_suggestions(&self, conversation_id: &str) {
        let had_any = self
            .suggestion_sets
            .borrow_mut()
            .remove(conversation_id)
            .is_some_and(|s| !s.is_empty());
        if had_any {
            self.events.emit(ChatEvent::SuggestionsUpdated {
                conversation_id: conversation_id.to_string(),
                suggestions: Vec::new(),
            });
        }
    }

    pub async fn send(&self, conversation_id: &str, outgoing: OutgoingMessage) -> SendOutcome {
        self.send_with_cancel(conversation_id, outgoing, None).await
    }

    /// Like [`send`](Self::send), but stops consuming the reply once `cancel`
    /// fires. The placeholder keeps the text received so far.
    pub async fn send_with_cancel(
        &self,
        conversation_id: &str,
        outgoing: OutgoingMessage,
        cancel: Option<CancellationToken>,
    ) -> SendOutcome {
        // Idle → Sending
        if outgoing.is_empty() {
            log::debug!("Ignoring empty send for {}", conversation_id);
            return SendOutcome::Rejected(RejectReason::Empty);
        }
        let Some(persona) = self.store.persona(conversation_id) else {
            log::warn!("Send to unknown conversation {}", conversation_id);
            return SendOutcome::Rejected(RejectReason::UnknownConversation);
        };
        if self.is_responding(conversation_id) {
            log::debug!("Ignoring send for {}: reply in flight", conversation_id);
            return SendOutcome::Rejected(RejectReason::Busy);
        }

        let guard = RespondingGuard::acquire(&self.responding, conversation_id);
        self.clear_suggestions(conversation_id);

        let mut user_message = Message::user(outgoing.text.clone());
        if let Some(ref image) = outgoing.image {
            user_message = user_message.with_image(image);
        }
        if let Some(ref audio_url) = outgoing.audio_url {
            user_message = user_message.with_audio(audio_url.clone());
        }
        self.store.apply(conversation_id, user_message);
        self.events.emit(ChatEvent::ReplyStarted {
            conversation_id: conversation_id.to_string(),
        });

        // The placeholder id is reserved up front so a failure before
        // streaming starts still lands on it.
        let placeholder = Message::placeholder(self.config.placeholder_text.clone());

        let outcome = match self
            .stream_reply(conversation_id, &persona, &outgoing, &placeholder, cancel.as_ref())
            .await
        {
            Ok(reply) => self.complete(conversation_id, &placeholder, reply).await,
            Err(e) => {
                log::error!("Error sending message to {}: {}", conversation_id, e);
                let failed = Message::placeholder_with_id(placeholder.id.clone(), self.config.error_text.clone())
                    .with_status(MessageStatus::Error);
                self.store.apply(conversation_id, failed);
                ReplyOutcome::Failed
            }
        };

        drop(guard);
        self.events.emit(ChatEvent::ReplyFinished {
            conversation_id: conversation_id.to_string(),
            outcome,
        });
        SendOutcome::Replied(outcome)
    }

    /// Sending → Streaming, then fold every increment into the placeholder.
    async fn stream_reply(
        &self,
        conversation_id: &str,
        persona: &str,
        outgoing: &OutgoingMessage,
        placeholder: &Message,
        cancel: Option<&CancellationToken>,
    ) -> Result<StreamedReply> {
        let session = self.sessions.get_session(conversation_id, persona).await?;
        self.store.apply(conversation_id, placeholder.clone());

        let mut stream = session
            .send_streaming(&outgoing.text, outgoing.image.as_ref())
            .await?;

        let cancelled = || cancel.is_some_and(|c| c.is_cancelled());
        let mut buffer = String::new();
        while !cancelled() {
            let Some(event) = stream.next().await else {
                return Ok(StreamedReply { text: buffer, cancelled: false });
            };
            match event {
                ReplyStreamEvent::Delta(_) if cancelled() => break,
                ReplyStreamEvent::Delta(fragment) => {
                    buffer.push_str(&fragment);
                    let typing = placeholder
                        .clone()
                        .with_text(format!("{}{}", buffer, self.config.cursor));
                    self.store.apply(conversation_id, typing);
                }
                ReplyStreamEvent::Done => {
                    return Ok(StreamedReply { text: buffer, cancelled: false });
                }
                ReplyStreamEvent::Error(message) => return Err(ChatError::Stream(message)),
            }
        }

        log::info!("Reply for {} cancelled", conversation_id);
        Ok(StreamedReply { text: buffer, cancelled: true })
    }

    /// Streaming → Completed
    async fn complete(
        &self,
        conversation_id: &str,
        placeholder: &Message,
        reply: StreamedReply,
    ) -> ReplyOutcome {
        let final_message = placeholder
            .clone()
            .with_text(reply.text.clone())
            .with_status(MessageStatus::Sent)
            .with_timestamp(chrono::Utc::now());
        self.store.apply(conversation_id, final_message);

        if reply.cancelled {
            return ReplyOutcome::Cancelled;
        }

        if !reply.text.is_empty() {
            let backend = self.sessions.backend();
            let suggestions = self.suggestions.suggest(backend.as_ref(), &reply.text).await;
            self.publish_suggestions(conversation_id, suggestions);
        }

        ReplyOutcome::Completed
    }

    fn publish_suggestions(&self, conversation_id: &str, suggestions: Vec<String>) {
        self.suggestion_sets
            .borrow_mut()
            .insert(conversation_id.to_string(), suggestions.clone());
        self.events.emit(ChatEvent::SuggestionsUpdated {
            conversation_id: conversation_id.to_string(),
            suggestions,
        });
    }
}

/// Holds the per-conversation "responding" flag for the duration of a send.
struct RespondingGuard<'a> {
    responding: &'a RefCell<HashSet<String>>,
    conversation_id: String,
}

impl<'a> RespondingGuard<'a> {
    fn acquire(responding: &'a RefCell<HashSet<String>>, conversation_id: &str) -> Self {
        responding.borrow_mut().insert(conversation_id.to_string());
        Self {
            responding,
            conversation_id: conversation_id.to_string(),
        }
    }
}

impl Drop for RespondingGuard<'_> {
    fn drop(&mut self) {
        self.responding.borrow_mut().remove(&self.conversation_id);
    }
}
