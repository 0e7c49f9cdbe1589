#[cfg(test)]
mod tests {
    use crate::message::*;
    use crate::conversation::*;
    use crate::event::*;
    use crate::config::*;
    use crate::error::*;
    use chrono::{TimeZone, Utc};

    fn contact() -> Contact {
        Contact {
            id: "contact-1".to_string(),
            name: "Alex".to_string(),
            avatar_url: "https://example.test/alex.png".to_string(),
        }
    }

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "Hello");
        assert_eq!(msg.status, MessageStatus::Sending);
        assert!(msg.id.starts_with("user-"));
        assert!(msg.image_url.is_none());
        assert!(msg.audio_url.is_none());
        assert!(msg.is_from_user());
    }

    #[test]
    fn test_message_placeholder() {
        let msg = Message::placeholder("...");
        assert_eq!(msg.sender, Sender::Contact);
        assert_eq!(msg.status, MessageStatus::Sending);
        assert!(msg.id.starts_with("ai-"));
        assert!(!msg.is_from_user());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_message_builders_keep_id() {
        let msg = Message::placeholder("...");
        let id = msg.id.clone();
        let updated = msg
            .with_text("Hello")
            .with_status(MessageStatus::Sent)
            .with_audio("blob:abc");
        assert_eq!(updated.id, id);
        assert_eq!(updated.text, "Hello");
        assert_eq!(updated.status, MessageStatus::Sent);
        assert_eq!(updated.audio_url.as_deref(), Some("blob:abc"));
    }

    #[test]
    fn test_message_with_image_builds_data_uri() {
        let image = InlineImage::new("image/png", "iVBORw0KGgo=");
        let msg = Message::user("look").with_image(&image);
        assert_eq!(
            msg.image_url.as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn test_message_serialization_omits_empty_attachments() {
        let msg = Message::user("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("image_url"));
        assert!(!json.contains("audio_url"));
        assert!(json.contains(r#""sender":"user""#));
        assert!(json.contains(r#""status":"sending""#));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(MessageStatus::Sending.label(), "sending");
        assert_eq!(MessageStatus::Sent.label(), "sent");
        assert_eq!(MessageStatus::Delivered.label(), "delivered");
        assert_eq!(MessageStatus::Read.label(), "read");
        assert_eq!(MessageStatus::Error.label(), "error");
    }

    #[test]
    fn test_status_deserialization() {
        let status: MessageStatus = serde_json::from_str(r#""read""#).unwrap();
        assert_eq!(status, MessageStatus::Read);
    }

    // ─── OutgoingMessage Tests ───────────────────────────────

    #[test]
    fn test_outgoing_empty_text_is_empty() {
        assert!(OutgoingMessage::text("").is_empty());
        assert!(OutgoingMessage::text("   \n\t").is_empty());
        assert!(!OutgoingMessage::text("hi").is_empty());
    }

    #[test]
    fn test_outgoing_image_without_text_is_not_empty() {
        let out = OutgoingMessage::text("  ").with_image(InlineImage::new("image/jpeg", "AAAA"));
        assert!(!out.is_empty());
    }

    #[test]
    fn test_outgoing_audio_alone_does_not_count() {
        let out = OutgoingMessage::text("").with_audio("blob:x");
        assert!(out.is_empty());
    }

    // ─── Conversation Tests ──────────────────────────────────

    #[test]
    fn test_conversation_preview_empty() {
        let convo = Conversation::new("c1", contact(), "You are Alex");
        assert!(convo.last_message().is_none());
        assert_eq!(convo.preview(), "No messages yet");
    }

    #[test]
    fn test_conversation_preview_last_message() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let convo = Conversation::new("c1", contact(), "You are Alex")
            .with_message(Message::user("first").with_timestamp(t))
            .with_message(Message::placeholder("second").with_timestamp(t));
        assert_eq!(convo.preview(), "second");
        assert_eq!(convo.messages.len(), 2);
    }

    #[test]
    fn test_conversation_find_message() {
        let msg = Message::user("find me");
        let id = msg.id.clone();
        let convo = Conversation::new("c1", contact(), "p").with_message(msg);
        assert_eq!(convo.message(&id).unwrap().text, "find me");
        assert!(convo.message("missing").is_none());
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_chat_event_serialization() {
        let event = ChatEvent::ReplyFinished {
            conversation_id: "c1".to_string(),
            outcome: ReplyOutcome::Failed,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ReplyFinished"));
        assert!(json.contains("Failed"));
    }

    #[test]
    fn test_chat_event_suggestions() {
        let event = ChatEvent::SuggestionsUpdated {
            conversation_id: "c1".to_string(),
            suggestions: vec!["Sure!".to_string()],
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.backend.chat_model, "gemini-2.5-flash");
        assert_eq!(config.backend.live_model, DEFAULT_LIVE_MODEL);
        assert!(config.backend.api_base.is_none());
        assert_eq!(config.voice.sample_rate, 16_000);
        assert_eq!(config.voice.frame_size, 4096);
        assert_eq!(config.voice.channels, 1);
        assert_eq!(config.reply.cursor, "▌");
        assert_eq!(config.reply.placeholder_text, "...");
        assert_eq!(config.reply.max_suggestions, 3);
    }

    #[test]
    fn test_base_url_default_and_override() {
        let mut backend = BackendConfig::default();
        assert_eq!(backend.base_url(), DEFAULT_API_BASE);

        backend.api_base = Some("http://localhost:8080/".to_string());
        assert_eq!(backend.base_url(), "http://localhost:8080");
        assert_eq!(backend.ws_base_url(), "ws://localhost:8080");
    }

    #[test]
    fn test_ws_base_url_default() {
        let backend = BackendConfig::default();
        assert_eq!(backend.ws_base_url(), "wss://generativelanguage.googleapis.com");
    }

    #[test]
    fn test_pcm_mime_type() {
        assert_eq!(VoiceConfig::default().pcm_mime_type(), "audio/pcm;rate=16000");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ChatConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ChatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = ChatError::Backend("quota".to_string());
        assert_eq!(err.to_string(), "Backend error: quota");

        let err = ChatError::Microphone("permission denied".to_string());
        assert_eq!(err.to_string(), "Microphone error: permission denied");

        let err = ChatError::Timeout(5000);
        assert_eq!(err.to_string(), "Timeout after 5000ms");

        let err = ChatError::Session("convo-1: quota".to_string());
        assert_eq!(err.to_string(), "Session error: convo-1: quota");
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err: ChatError = serde_err.into();
        assert!(matches!(err, ChatError::Serialization(_)));
    }
}
