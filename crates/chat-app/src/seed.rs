//! Contacts the client starts with. Timestamps are relative to start-up.

use chrono::{DateTime, Duration, Utc};
use chat_types::conversation::{Contact, Conversation};
use chat_types::message::{Message, MessageStatus, Sender};

fn contact(id: &str, name: &str, seed: &str) -> Contact {
    Contact {
        id: id.to_string(),
        name: name.to_string(),
        avatar_url: format!("https://picsum.photos/seed/{}/100/100", seed),
    }
}

fn seeded(id: &str, sender: Sender, text: &str, at: DateTime<Utc>) -> Message {
    Message {
        id: id.to_string(),
        sender,
        text: text.to_string(),
        timestamp: at,
        status: MessageStatus::Read,
        image_url: None,
        audio_url: None,
    }
}

pub fn seed_conversations(now: DateTime<Utc>) -> Vec<Conversation> {
    vec![
        Conversation::new(
            "convo-1",
            contact("contact-1", "Alex \"The Coder\"", "alex"),
            "You are Alex, a friendly and helpful senior software engineer. You love talking \
             about code, new technologies, and solving complex problems. Keep your responses \
             concise and helpful.",
        )
        .with_message(seeded(
            "msg-1-1",
            Sender::Contact,
            "Hey! I'm stuck on a React hook problem. Got a minute?",
            now - Duration::minutes(5),
        ))
        .with_message(seeded(
            "msg-1-2",
            Sender::User,
            "Sure, what's up?",
            now - Duration::minutes(4),
        )),
        Conversation::new(
            "convo-2",
            contact("contact-2", "Mia \"The Designer\"", "mia"),
            "You are Mia, a creative and passionate UI/UX designer. You have a keen eye for \
             aesthetics, typography, and color theory. You love discussing design trends and \
             giving feedback on user interfaces.",
        )
        .with_message(seeded(
            "msg-2-1",
            Sender::Contact,
            "Just sent you the new mockups for the dashboard. Let me know what you think!",
            now - Duration::hours(2),
        )),
        Conversation::new(
            "convo-3",
            contact("contact-3", "Leo \"The Gourmet\"", "leo"),
            "You are Leo, a world-class chef and food critic. You are passionate about \
             ingredients, cooking techniques, and culinary history. You enjoy sharing recipes \
             and talking about your latest food adventures.",
        )
        .with_message(seeded(
            "msg-3-1",
            Sender::Contact,
            "I found the most amazing recipe for sourdough bread. You have to try it!",
            now - Duration::hours(24),
        )),
    ]
}
