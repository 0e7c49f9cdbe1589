//! Message store: the ordered, append-or-replace log of messages for every
//! conversation.
//!
//! `apply` is the only mutation path. It is called once per streamed chunk,
//! so it must stay cheap and must never fail.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use chat_types::{
    conversation::Conversation,
    event::ChatEvent,
    message::Message,
};
use crate::event_bus::EventBus;

/// Shared conversation state: clone-cheap via Rc.
#[derive(Clone)]
pub struct MessageStore {
    inner: Rc<RefCell<StoreInner>>,
    events: EventBus,
}

struct StoreInner {
    conversations: Vec<Conversation>,
    revision: u64,
}

impl MessageStore {
    pub fn new(conversations: Vec<Conversation>, events: EventBus) -> Self {
        let mut conversations = conversations;
        sort_by_recency(&mut conversations);
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                conversations,
                revision: 0,
            })),
            events,
        }
    }

    /// Append `message` to the conversation, or replace the message that
    /// already carries its id in place. Conversations are then re-sorted by
    /// the timestamp of their last message, newest first.
    pub fn apply(&self, conversation_id: &str, message: Message) {
        let message_id = message.id.clone();
        {
            let mut inner = self.inner.borrow_mut();
            let Some(convo) = inner
                .conversations
                .iter_mut()
                .find(|c| c.id == conversation_id)
            else {
                log::warn!("Dropping message {} for unknown conversation {}", message_id, conversation_id);
                return;
            };

            match convo.messages.iter().position(|m| m.id == message.id) {
                Some(index) => convo.messages[index] = message,
                None => convo.messages.push(message),
            }

            sort_by_recency(&mut inner.conversations);
            inner.revision += 1;
        }

        self.events.emit(ChatEvent::MessageApplied {
            conversation_id: conversation_id.to_string(),
            message_id,
        });
    }

    /// Snapshot of every conversation in display order
    pub fn conversations(&self) -> Vec<Conversation> {
        self.inner.borrow().conversations.clone()
    }

    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.inner
            .borrow()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn persona(&self, id: &str) -> Option<String> {
        self.inner
            .borrow()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.persona.clone())
    }

    pub fn message(&self, conversation_id: &str, message_id: &str) -> Option<Message> {
        self.inner
            .borrow()
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .and_then(|c| c.message(message_id).cloned())
    }

    /// Bumped on every successful `apply`
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Newest last-message first. A conversation without messages compares
/// equal to every other conversation.
pub fn compare_recency(a: &Conversation, b: &Conversation) -> Ordering {
    match (a.last_message(), b.last_message()) {
        (Some(x), Some(y)) => y.timestamp.cmp(&x.timestamp),
        _ => Ordering::Equal,
    }
}

/// Stable in-place sort by [`compare_recency`].
///
/// `compare_recency` is not a total order once empty conversations are
/// involved, so this uses an insertion sort: it never panics on such a
/// comparator and keeps equal elements in their current relative order.
pub fn sort_by_recency(conversations: &mut [Conversation]) {
    for i in 1..conversations.len() {
        let mut j = i;
        while j > 0 && compare_recency(&conversations[j - 1], &conversations[j]) == Ordering::Greater {
            conversations.swap(j - 1, j);
            j -= 1;
        }
    }
}
