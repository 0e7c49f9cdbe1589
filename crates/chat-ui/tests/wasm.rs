//! WASM-target tests for chat-ui.
//!
//! Runs under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chat_types::event::ChatEvent;
use chat_ui::format::list_timestamp;
use chat_ui::panels::chat::image_mime;
use chat_ui::state::UiState;
use chrono::{Duration, Utc};

#[wasm_bindgen_test]
fn test_list_timestamp_under_wasm_clock() {
    let now = Utc::now();
    assert_eq!(list_timestamp(&(now - Duration::hours(30)), &now), "Yesterday");
}

#[wasm_bindgen_test]
fn test_transcript_accumulates() {
    let mut state = UiState::default();
    state.process_events(vec![
        ChatEvent::RecordingStarted,
        ChatEvent::TranscriptDelta { text: "What's ".to_string() },
        ChatEvent::TranscriptDelta { text: "for dinner?".to_string() },
    ]);
    assert_eq!(state.live_transcript, "What's for dinner?");
    assert!(state.is_busy());
}

#[wasm_bindgen_test]
fn test_image_mime_from_extension() {
    assert_eq!(image_mime("dish.webp", "").as_deref(), Some("image/webp"));
}
