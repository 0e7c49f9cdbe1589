//! WASM-target tests for chat-core.
//!
//! Runs the store, codec and reply controller under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chat_core::codec::{encode_wav, samples_to_pcm16, WAV_HEADER_LEN};
use chat_core::event_bus::EventBus;
use chat_core::ports::*;
use chat_core::reply::{ReplyController, SendOutcome};
use chat_core::sessions::SessionRegistry;
use chat_core::store::MessageStore;
use chat_types::config::ReplyConfig;
use chat_types::conversation::{Contact, Conversation};
use chat_types::event::ReplyOutcome;
use chat_types::message::*;
use chat_types::{ChatError, Result};

use std::rc::Rc;
use async_trait::async_trait;
use serde_json::{json, Value};

fn conversation(id: &str) -> Conversation {
    let contact = Contact {
        id: format!("contact-{}", id),
        name: "Leo".to_string(),
        avatar_url: String::new(),
    };
    Conversation::new(id, contact, "You are Leo, a chef")
}

// ─── Mocks ───────────────────────────────────────────────

struct MockSession {
    fragments: Vec<&'static str>,
}

#[async_trait(?Send)]
impl ChatSession for MockSession {
    async fn send_streaming(&self, _text: &str, _image: Option<&InlineImage>) -> Result<ReplyStream> {
        let mut events: Vec<ReplyStreamEvent> = self
            .fragments
            .iter()
            .map(|f| ReplyStreamEvent::Delta(f.to_string()))
            .collect();
        events.push(ReplyStreamEvent::Done);
        Ok(Box::pin(futures::stream::iter(events)))
    }
}

struct MockBackend;

#[async_trait(?Send)]
impl ChatBackend for MockBackend {
    async fn create_session(&self, _persona: &str) -> Result<Rc<dyn ChatSession>> {
        Ok(Rc::new(MockSession {
            fragments: vec!["Use ", "a warm ", "spot."],
        }))
    }

    async fn generate_suggestions(&self, _source_text: &str, _schema: &Value) -> Result<Value> {
        Ok(json!({ "suggestions": ["Thanks!", "How warm?"] }))
    }

    async fn open_realtime_transcription(
        &self,
        _config: &TranscriptionConfig,
        _sink: RealtimeSink,
    ) -> Result<Rc<dyn RealtimeTranscription>> {
        Err(ChatError::Voice("not available".to_string()))
    }
}

// ─── Store ───────────────────────────────────────────────

#[wasm_bindgen_test]
fn store_apply_is_idempotent_per_id() {
    let store = MessageStore::new(vec![conversation("convo-3")], EventBus::new());
    let msg = Message::user("sourdough?");
    store.apply("convo-3", msg.clone());
    store.apply("convo-3", msg.clone().with_status(MessageStatus::Delivered));

    let convo = store.conversation("convo-3").unwrap();
    assert_eq!(convo.messages.len(), 1);
    assert_eq!(convo.messages[0].status, MessageStatus::Delivered);
}

// ─── Codec ───────────────────────────────────────────────

#[wasm_bindgen_test]
fn pcm_conversion_matches_native() {
    assert_eq!(samples_to_pcm16(&[0.5, -0.5]), vec![16383, -16384]);
}

#[wasm_bindgen_test]
fn wav_header_size() {
    let wav = encode_wav(&[0.0; 8], 16_000);
    assert_eq!(wav.len(), WAV_HEADER_LEN + 16);
    assert_eq!(&wav[0..4], b"RIFF");
}

// ─── Reply controller ────────────────────────────────────

#[wasm_bindgen_test]
async fn reply_streams_into_one_message() {
    let store = MessageStore::new(vec![conversation("convo-3")], EventBus::new());
    let sessions = Rc::new(SessionRegistry::new(Rc::new(MockBackend)));
    let reply = ReplyController::new(store.clone(), sessions, EventBus::new(), ReplyConfig::default());

    let outcome = reply
        .send("convo-3", OutgoingMessage::text("Where should dough rise?"))
        .await;
    assert_eq!(outcome, SendOutcome::Replied(ReplyOutcome::Completed));

    let convo = store.conversation("convo-3").unwrap();
    assert_eq!(convo.messages.len(), 2);
    assert_eq!(convo.messages[1].text, "Use a warm spot.");
    assert_eq!(convo.messages[1].status, MessageStatus::Sent);
    assert_eq!(reply.suggestions("convo-3"), vec!["Thanks!", "How warm?"]);
}
