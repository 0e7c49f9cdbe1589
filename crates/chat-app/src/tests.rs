#[cfg(test)]
mod tests {
    use crate::seed::seed_conversations;
    use chat_core::event_bus::EventBus;
    use chat_core::store::MessageStore;
    use chat_types::message::{MessageStatus, Sender};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_seed_has_three_personas() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let conversations = seed_conversations(now);
        let ids: Vec<&str> = conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["convo-1", "convo-2", "convo-3"]);
        assert!(conversations.iter().all(|c| !c.persona.trim().is_empty()));
        assert!(conversations.iter().all(|c| c.contact.avatar_url.starts_with("https://")));
        assert!(conversations[2].persona.contains("chef"));
    }

    #[test]
    fn test_seed_timestamps_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let conversations = seed_conversations(now);

        let alex = &conversations[0];
        assert_eq!(alex.messages.len(), 2);
        assert_eq!(alex.messages[0].id, "msg-1-1");
        assert_eq!(alex.messages[0].sender, Sender::Contact);
        assert_eq!(alex.messages[0].timestamp, now - Duration::minutes(5));
        assert_eq!(alex.messages[1].sender, Sender::User);
        assert_eq!(alex.messages[1].text, "Sure, what's up?");

        assert_eq!(conversations[1].messages[0].timestamp, now - Duration::hours(2));
        assert_eq!(conversations[2].messages[0].timestamp, now - Duration::hours(24));
        assert!(conversations
            .iter()
            .flat_map(|c| &c.messages)
            .all(|m| m.status == MessageStatus::Read && m.image_url.is_none()));
    }

    #[test]
    fn test_seed_store_orders_newest_first() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut conversations = seed_conversations(now);
        conversations.reverse();

        let store = MessageStore::new(conversations, EventBus::new());
        let order: Vec<String> = store.conversations().into_iter().map(|c| c.id).collect();
        assert_eq!(order, ["convo-1", "convo-2", "convo-3"]);
        assert!(store.persona("convo-2").is_some_and(|p| p.contains("designer")));
    }
}
