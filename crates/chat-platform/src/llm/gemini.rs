//! Gemini backend adapter.
//!
//! - Chat sessions: `streamGenerateContent?alt=sse`, history kept client side
//! - Suggestions: one-shot `generateContent` with a JSON response schema
//! - Live transcription: delegated to [`super::live`]
//!
//! Uses browser `fetch()` via gloo-net for WASM compatibility.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use async_trait::async_trait;
use futures::stream;
use gloo_net::http::{Request, Response};
use serde_json::{json, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::ReadableStreamDefaultReader;

use chat_core::ports::*;
use chat_core::suggestions::suggestion_prompt;
use chat_types::{
    ChatError, Result,
    config::BackendConfig,
    message::InlineImage,
};
use super::live::GeminiLiveTranscription;
use super::sse::SseDecoder;

const API_VERSION: &str = "v1beta";
const LIVE_PATH: &str = "ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Provider speaking the Gemini `generativelanguage` API.
pub struct GeminiBackend {
    config: BackendConfig,
}

impl GeminiBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        model_url(self.config.base_url(), model, method)
    }

    fn require_key(&self) -> Result<()> {
        if self.config.api_key.trim().is_empty() {
            return Err(ChatError::Config("No Gemini API key configured".to_string()));
        }
        Ok(())
    }
}

pub fn model_url(base_url: &str, model: &str, method: &str) -> String {
    format!("{}/{}/models/{}:{}", base_url, API_VERSION, model, method)
}

pub fn live_url(ws_base_url: &str, api_key: &str) -> String {
    format!("{}/{}?key={}", ws_base_url, LIVE_PATH, api_key)
}

#[async_trait(?Send)]
impl ChatBackend for GeminiBackend {
    async fn create_session(&self, persona: &str) -> Result<Rc<dyn ChatSession>> {
        self.require_key()?;
        Ok(Rc::new(GeminiChatSession {
            url: format!(
                "{}?alt=sse",
                self.model_url(&self.config.chat_model, "streamGenerateContent")
            ),
            api_key: self.config.api_key.clone(),
            persona: persona.to_string(),
            history: Rc::new(RefCell::new(Vec::new())),
        }))
    }

    async fn generate_suggestions(&self, source_text: &str, schema: &Value) -> Result<Value> {
        self.require_key()?;
        let url = self.model_url(&self.config.chat_model, "generateContent");
        let body = suggestion_request_body(source_text, schema);

        let response = post_json(&url, &self.config.api_key, &body).await?;
        let data: Value = response
            .json()
            .await
            .map_err(|e| ChatError::Suggestion(e.to_string()))?;

        if let Some(message) = extract_error(&data) {
            return Err(ChatError::Suggestion(message));
        }
        let text = extract_text(&data)
            .ok_or_else(|| ChatError::Suggestion("Empty suggestion response".to_string()))?;
        Ok(serde_json::from_str(text.trim())?)
    }

    async fn open_realtime_transcription(
        &self,
        config: &TranscriptionConfig,
        sink: RealtimeSink,
    ) -> Result<Rc<dyn RealtimeTranscription>> {
        self.require_key()?;
        let url = live_url(&self.config.ws_base_url(), &self.config.api_key);
        let session = GeminiLiveTranscription::connect(&url, config, sink).await?;
        Ok(Rc::new(session))
    }
}

// ─── Chat session ────────────────────────────────────────────

/// One persona-bound conversation. Completed turns are appended to
/// `history` and replayed with every request.
pub struct GeminiChatSession {
    url: String,
    api_key: String,
    persona: String,
    history: Rc<RefCell<Vec<Value>>>,
}

impl GeminiChatSession {
    pub fn history_len(&self) -> usize {
        self.history.borrow().len()
    }
}

#[async_trait(?Send)]
impl ChatSession for GeminiChatSession {
    async fn send_streaming(&self, text: &str, image: Option<&InlineImage>) -> Result<ReplyStream> {
        let turn = user_content(text, image);
        let body = chat_request_body(&self.persona, &self.history.borrow(), &turn);

        let response = post_json(&self.url, &self.api_key, &body).await?;
        let reader: ReadableStreamDefaultReader = response
            .body()
            .ok_or_else(|| ChatError::Stream("Response has no body".to_string()))?
            .get_reader()
            .unchecked_into();

        let state = ReplyReader {
            reader,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            reply: String::new(),
            finished: false,
            turn,
            history: self.history.clone(),
        };

        Ok(Box::pin(stream::unfold(state, |mut state| async move {
            loop {
                if let Some(event) = state.pending.pop_front() {
                    return Some((event, state));
                }
                if state.finished {
                    return None;
                }
                match read_chunk(&state.reader).await {
                    Ok(Some(bytes)) => {
                        for payload in state.decoder.push(&bytes) {
                            state.handle_payload(&payload);
                        }
                    }
                    Ok(None) => {
                        for payload in state.decoder.finish() {
                            state.handle_payload(&payload);
                        }
                        if !state.finished {
                            state.commit();
                            state.pending.push_back(ReplyStreamEvent::Done);
                            state.finished = true;
                        }
                    }
                    Err(e) => {
                        state.fail(e.to_string());
                    }
                }
            }
        })))
    }
}

/// Unfold state of one streaming reply
struct ReplyReader {
    reader: ReadableStreamDefaultReader,
    decoder: SseDecoder,
    pending: VecDeque<ReplyStreamEvent>,
    reply: String,
    finished: bool,
    turn: Value,
    history: Rc<RefCell<Vec<Value>>>,
}

impl ReplyReader {
    fn handle_payload(&mut self, payload: &str) {
        if self.finished {
            return;
        }
        let chunk: Value = match serde_json::from_str(payload) {
            Ok(chunk) => chunk,
            Err(e) => {
                log::warn!("Skipping malformed stream chunk: {}", e);
                return;
            }
        };
        if let Some(message) = extract_error(&chunk) {
            self.fail(message);
            return;
        }
        if let Some(text) = extract_text(&chunk) {
            if !text.is_empty() {
                self.reply.push_str(&text);
                self.pending.push_back(ReplyStreamEvent::Delta(text));
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.pending.push_back(ReplyStreamEvent::Error(message));
        self.finished = true;
    }

    /// Record the completed exchange so the next turn sees it
    fn commit(&self) {
        let mut history = self.history.borrow_mut();
        history.push(self.turn.clone());
        history.push(json!({
            "role": "model",
            "parts": [{ "text": self.reply }],
        }));
    }
}

impl Drop for ReplyReader {
    fn drop(&mut self) {
        if !self.finished {
            // Consumer went away mid-reply; release the body.
            let _ = self.reader.cancel();
        }
    }
}

async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>> {
    let result = JsFuture::from(reader.read())
        .await
        .map_err(|e| ChatError::Stream(format!("{:?}", e)))?;
    let done = js_sys::Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }
    let value = js_sys::Reflect::get(&result, &JsValue::from_str("value"))
        .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))?;
    Ok(Some(js_sys::Uint8Array::new(&value).to_vec()))
}

async fn post_json(url: &str, api_key: &str, body: &Value) -> Result<Response> {
    let response = Request::post(url)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(body)
        .map_err(|e| ChatError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ChatError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(ChatError::Backend(format!("HTTP {}: {}", status, text)));
    }
    Ok(response)
}

// ─── Request / response helpers ──────────────────────────────

/// A `user` content entry: the text part (when non-empty) and an inline image part.
pub fn user_content(text: &str, image: Option<&InlineImage>) -> Value {
    let mut parts = Vec::new();
    if !text.is_empty() {
        parts.push(json!({ "text": text }));
    }
    if let Some(image) = image {
        parts.push(json!({
            "inlineData": {
                "mimeType": image.mime_type,
                "data": image.data,
            }
        }));
    }
    json!({ "role": "user", "parts": parts })
}

pub fn chat_request_body(persona: &str, history: &[Value], turn: &Value) -> Value {
    let mut contents = history.to_vec();
    contents.push(turn.clone());
    json!({
        "systemInstruction": { "parts": [{ "text": persona }] },
        "contents": contents,
    })
}

pub fn suggestion_request_body(source_text: &str, schema: &Value) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": suggestion_prompt(source_text) }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
        },
    })
}

/// Concatenated text parts of the first candidate
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    Some(
        parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<String>(),
    )
}

pub fn extract_error(response: &Value) -> Option<String> {
    let error = response.get("error")?;
    Some(
        error["message"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string()),
    )
}
