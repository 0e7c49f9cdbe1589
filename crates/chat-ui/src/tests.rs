#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::format::*;
    use crate::intent::UiIntent;
    use crate::panels::chat::{chat_panel, image_mime, status_marker};
    use crate::panels::settings::normalized;
    use crate::panels::sidebar::sidebar_panel;
    use crate::state::*;
    use crate::theme::*;
    use chat_types::config::{BackendConfig, DEFAULT_CHAT_MODEL, DEFAULT_LIVE_MODEL};
    use chat_types::conversation::{Contact, Conversation};
    use chat_types::event::{ChatEvent, ReplyOutcome};
    use chat_types::message::*;
    use chrono::{TimeZone, Utc};

    fn conversation(id: &str, name: &str, text: &str) -> Conversation {
        let contact = Contact {
            id: format!("contact-{}", id),
            name: name.to_string(),
            avatar_url: String::new(),
        };
        Conversation::new(id, contact, "persona").with_message(
            Message::placeholder(text).with_status(MessageStatus::Read),
        )
    }

    fn synced_state() -> UiState {
        let mut state = UiState::default();
        state.sync_conversations(vec![
            conversation("convo-1", "Alex", "Hey there"),
            conversation("convo-2", "Mia", "Colours!"),
        ]);
        state
    }

    /// Run one headless frame and collect the intents the panel emitted.
    fn render(
        state: &mut UiState,
        input: egui::RawInput,
        panel: fn(&mut egui::Ui, &mut UiState, &mut Vec<UiIntent>),
    ) -> Vec<UiIntent> {
        let ctx = egui::Context::default();
        let mut intents = Vec::new();
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| panel(ui, state, &mut intents));
        });
        intents
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::default();
        assert!(state.conversations.is_empty());
        assert!(state.active_conversation.is_none());
        assert!(state.active().is_none());
        assert!(state.input_text.is_empty());
        assert!(!state.recording);
        assert!(!state.show_settings);
        assert_eq!(state.status_text, "Ready");
        assert!(state.needs_sync());
        assert!(!state.is_busy());
        assert!(!state.can_send());
    }

    #[test]
    fn test_ui_state_sync_clears_stale() {
        let mut state = synced_state();
        assert!(!state.needs_sync());
        assert_eq!(state.conversations.len(), 2);

        state.process_events(vec![ChatEvent::MessageApplied {
            conversation_id: "convo-1".to_string(),
            message_id: "m".to_string(),
        }]);
        assert!(state.needs_sync());
    }

    #[test]
    fn test_ui_state_select() {
        let mut state = synced_state();
        state.input_text = "draft".to_string();
        state.attachment = Some(InlineImage::new("image/png", "aGk="));

        state.select("convo-2");
        assert_eq!(state.active().map(|c| c.contact.name.as_str()), Some("Mia"));
        assert!(state.input_text.is_empty());
        assert!(state.attachment.is_none());

        // Re-selecting keeps what is being typed
        state.input_text = "still typing".to_string();
        state.select("convo-2");
        assert_eq!(state.input_text, "still typing");
    }

    #[test]
    fn test_ui_state_active_unknown_id() {
        let mut state = synced_state();
        state.select("convo-9");
        assert!(state.active().is_none());
    }

    #[test]
    fn test_ui_state_reply_lifecycle() {
        let mut state = synced_state();
        state.process_events(vec![ChatEvent::ReplyStarted {
            conversation_id: "convo-1".to_string(),
        }]);
        assert!(state.is_responding("convo-1"));
        assert!(!state.is_responding("convo-2"));
        assert!(state.is_busy());

        state.process_events(vec![ChatEvent::ReplyFinished {
            conversation_id: "convo-1".to_string(),
            outcome: ReplyOutcome::Failed,
        }]);
        assert!(!state.is_responding("convo-1"));
        assert!(!state.is_busy());
        assert_eq!(state.status_text, "Reply failed");

        state.process_events(vec![
            ChatEvent::ReplyStarted { conversation_id: "convo-1".to_string() },
            ChatEvent::ReplyFinished {
                conversation_id: "convo-1".to_string(),
                outcome: ReplyOutcome::Completed,
            },
        ]);
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_suggestions() {
        let mut state = synced_state();
        assert!(state.suggestions("convo-1").is_empty());

        state.process_events(vec![ChatEvent::SuggestionsUpdated {
            conversation_id: "convo-1".to_string(),
            suggestions: vec!["Cool!".to_string(), "Tell me more".to_string()],
        }]);
        assert_eq!(state.suggestions("convo-1"), ["Cool!", "Tell me more"]);
        assert!(state.suggestions("convo-2").is_empty());

        state.process_events(vec![ChatEvent::SuggestionsUpdated {
            conversation_id: "convo-1".to_string(),
            suggestions: Vec::new(),
        }]);
        assert!(state.suggestions("convo-1").is_empty());
    }

    #[test]
    fn test_ui_state_recording_events() {
        let mut state = UiState::default();
        state.process_events(vec![
            ChatEvent::RecordingStarted,
            ChatEvent::TranscriptDelta { text: "Hello ".to_string() },
            ChatEvent::TranscriptDelta { text: "there".to_string() },
        ]);
        assert!(state.recording);
        assert!(state.is_busy());
        assert_eq!(state.live_transcript, "Hello there");
        assert_eq!(state.status_text, "Recording...");

        state.process_events(vec![ChatEvent::RecordingStopped]);
        assert!(!state.recording);
        assert!(state.live_transcript.is_empty());
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_recording_failure() {
        let mut state = UiState::default();
        state.process_events(vec![
            ChatEvent::RecordingStarted,
            ChatEvent::RecordingFailed { message: "Permission denied".to_string() },
            ChatEvent::RecordingStopped,
        ]);
        assert!(!state.recording);
        assert_eq!(state.voice_error.as_deref(), Some("Permission denied"));
        assert_eq!(state.status_text, "Voice error: Permission denied");

        // A fresh recording clears the error
        state.process_events(vec![ChatEvent::RecordingStarted]);
        assert!(state.voice_error.is_none());
    }

    #[test]
    fn test_ui_state_can_send() {
        let mut state = UiState::default();
        state.input_text = "   ".to_string();
        assert!(!state.can_send());
        state.attachment = Some(InlineImage::new("image/png", "aGk="));
        assert!(state.can_send());
        state.attachment = None;
        state.input_text = "hi".to_string();
        assert!(state.can_send());
    }

    // ─── Format Tests ────────────────────────────────────────

    #[test]
    fn test_list_timestamp_same_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap();
        assert_eq!(list_timestamp(&ts, &now), "09:07");
    }

    #[test]
    fn test_list_timestamp_yesterday() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 4, 9, 7, 0).unwrap();
        assert_eq!(list_timestamp(&ts, &now), "Yesterday");
    }

    #[test]
    fn test_list_timestamp_older_shows_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 2, 9, 7, 0).unwrap();
        assert_eq!(list_timestamp(&ts, &now), "3/2/2024");
    }

    #[test]
    fn test_list_timestamp_future_shows_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 6, 30, 0).unwrap();
        assert_eq!(list_timestamp(&ts, &now), "06:30");
    }

    #[test]
    fn test_bubble_time() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap();
        assert_eq!(bubble_time(&ts), "23:59");
    }

    // ─── Panel Helper Tests ──────────────────────────────────

    #[test]
    fn test_status_marker_user_ticks() {
        let sent = Message::user("hi").with_status(MessageStatus::Sent);
        assert_eq!(status_marker(&sent), Some(("✓", TEXT_SECONDARY)));
        let sending = Message::user("hi");
        assert_eq!(status_marker(&sending), Some(("✓", TEXT_SECONDARY)));
        let delivered = Message::user("hi").with_status(MessageStatus::Delivered);
        assert_eq!(status_marker(&delivered), Some(("✓✓", TEXT_SECONDARY)));
        let read = Message::user("hi").with_status(MessageStatus::Read);
        assert_eq!(status_marker(&read), Some(("✓✓", READ_TICK)));
    }

    #[test]
    fn test_status_marker_contact_and_error() {
        let reply = Message::placeholder("hello").with_status(MessageStatus::Sent);
        assert_eq!(status_marker(&reply), None);
        let failed = Message::placeholder("sorry").with_status(MessageStatus::Error);
        assert_eq!(status_marker(&failed), Some(("⚠", ERROR)));
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("cat.bin", "image/gif").as_deref(), Some("image/gif"));
        assert_eq!(image_mime("photo.JPG", "").as_deref(), Some("image/jpeg"));
        assert_eq!(image_mime("shot.png", "").as_deref(), Some("image/png"));
        assert_eq!(image_mime("notes.txt", "text/plain"), None);
        assert_eq!(image_mime("notes.png", "text/plain"), None);
        assert_eq!(image_mime("README", ""), None);
    }

    #[test]
    fn test_settings_normalized() {
        let draft = BackendConfig {
            api_key: "  key-123 ".to_string(),
            api_base: Some("http://localhost:8080".to_string()),
            chat_model: "  ".to_string(),
            live_model: String::new(),
        };
        let config = normalized(&draft);
        assert_eq!(config.api_key, "key-123");
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.live_model, DEFAULT_LIVE_MODEL);
    }

    #[test]
    fn test_avatar_color_stable() {
        assert_eq!(avatar_color("Alex"), avatar_color("Alex"));
        let _ = avatar_color("");
    }

    // ─── Rendering Tests ─────────────────────────────────────

    #[test]
    fn test_chat_panel_welcome_without_selection() {
        let mut state = synced_state();
        let intents = render(&mut state, egui::RawInput::default(), chat_panel);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_panels_render_idle_frame_without_intents() {
        let mut state = synced_state();
        state.select("convo-1");
        state.process_events(vec![
            ChatEvent::ReplyStarted { conversation_id: "convo-1".to_string() },
            ChatEvent::SuggestionsUpdated {
                conversation_id: "convo-1".to_string(),
                suggestions: vec!["Sure".to_string()],
            },
        ]);
        assert!(render(&mut state, egui::RawInput::default(), chat_panel).is_empty());
        assert!(render(&mut state, egui::RawInput::default(), sidebar_panel).is_empty());

        state.process_events(vec![ChatEvent::RecordingStarted]);
        assert!(render(&mut state, egui::RawInput::default(), chat_panel).is_empty());
    }

    #[test]
    fn test_chat_panel_dropped_image_attaches() {
        let mut state = synced_state();
        state.select("convo-1");

        let mut input = egui::RawInput::default();
        input.dropped_files.push(egui::DroppedFile {
            name: "notes.txt".to_string(),
            mime: "text/plain".to_string(),
            bytes: Some(Arc::from(&b"ignored"[..])),
            ..Default::default()
        });
        input.dropped_files.push(egui::DroppedFile {
            name: "pic.png".to_string(),
            bytes: Some(Arc::from(&b"hi"[..])),
            ..Default::default()
        });

        let intents = render(&mut state, input, chat_panel);
        assert_eq!(
            intents,
            vec![UiIntent::AttachImage(InlineImage::new("image/png", "aGk="))]
        );
    }
}
