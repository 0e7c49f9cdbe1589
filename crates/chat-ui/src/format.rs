//! Timestamp labels for the sidebar and message bubbles.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Sidebar label: the time for anything under a day old, "Yesterday" for
/// one to two days, otherwise the date.
pub fn list_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let days = now.clone().signed_duration_since(timestamp.clone()).num_days();
    match days {
        d if d <= 0 => timestamp.format("%H:%M").to_string(),
        1 => "Yesterday".to_string(),
        _ => timestamp.format("%-m/%-d/%Y").to_string(),
    }
}

pub fn bubble_time<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%H:%M").to_string()
}

pub fn local_list_timestamp(timestamp: &DateTime<Utc>) -> String {
    list_timestamp(&timestamp.with_timezone(&Local), &Local::now())
}

pub fn local_bubble_time(timestamp: &DateTime<Utc>) -> String {
    bubble_time(&timestamp.with_timezone(&Local))
}
