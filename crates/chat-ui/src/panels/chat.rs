//! Chat window: header, message list, reply suggestions and input bar.
//! Shows a welcome screen while no conversation is selected.

use egui::{self, Align, Color32, Layout, RichText, ScrollArea, Vec2};
use chat_core::codec::inline_image;
use chat_types::conversation::Conversation;
use chat_types::message::{Message, MessageStatus, Sender};
use crate::format::local_bubble_time;
use crate::intent::UiIntent;
use crate::panels::sidebar::avatar;
use crate::state::UiState;
use crate::theme::*;

/// Render the chat window for the active conversation.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState, intents: &mut Vec<UiIntent>) {
    let Some(convo) = state.active().cloned() else {
        welcome_screen(ui);
        return;
    };

    collect_dropped_image(ui, intents);
    let responding = state.is_responding(&convo.id);

    egui::TopBottomPanel::top("chat_header")
        .frame(egui::Frame::default().fill(BG_SECONDARY).inner_margin(PANEL_PADDING))
        .show_inside(ui, |ui| chat_header(ui, &convo, responding));

    egui::TopBottomPanel::bottom("chat_input")
        .frame(egui::Frame::default().fill(BG_SECONDARY).inner_margin(PANEL_PADDING))
        .show_inside(ui, |ui| {
            suggestion_row(ui, state, &convo.id, intents);
            input_bar(ui, state, &convo.id, responding, intents);
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(BG_CHAT).inner_margin(PANEL_PADDING))
        .show_inside(ui, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in &convo.messages {
                        message_bubble(ui, message, &convo.contact.name);
                        ui.add_space(4.0);
                    }
                    if responding {
                        typing_indicator(ui, &convo.contact.name);
                    }
                });
        });
}

fn welcome_screen(ui: &mut egui::Ui) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.set_min_size(ui.available_size());
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.heading(RichText::new("Welcome to Gemini Chat").color(TEXT_PRIMARY).strong());
                ui.label(
                    RichText::new("Select a conversation from the sidebar to start chatting with an AI personality.")
                        .color(TEXT_SECONDARY),
                );
                ui.add_space(16.0);
                egui::Frame::default()
                    .fill(BG_PRIMARY)
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(16.0)
                    .show(ui, |ui| {
                        ui.set_max_width(420.0);
                        ui.label(RichText::new("Powered by Google Gemini").color(TEXT_PRIMARY).strong());
                        ui.label(
                            RichText::new(
                                "Each contact is an AI with a unique personality. Replies stream in \
                                 as they are generated.",
                            )
                            .color(TEXT_PRIMARY)
                            .small(),
                        );
                    });
            });
        });
}

fn chat_header(ui: &mut egui::Ui, convo: &Conversation, responding: bool) {
    ui.horizontal(|ui| {
        avatar(ui, &convo.contact.name, 36.0);
        ui.vertical(|ui| {
            ui.label(RichText::new(&convo.contact.name).color(TEXT_PRIMARY).strong());
            let presence = if responding { "typing..." } else { "Online" };
            ui.label(RichText::new(presence).color(ACCENT).small());
        });
    });
}

/// Tick glyphs for a message's delivery status. Failed messages carry a
/// warning marker regardless of sender.
pub fn status_marker(message: &Message) -> Option<(&'static str, Color32)> {
    match (message.sender, message.status) {
        (_, MessageStatus::Error) => Some(("⚠", ERROR)),
        (Sender::Contact, _) => None,
        (Sender::User, MessageStatus::Sending | MessageStatus::Sent) => Some(("✓", TEXT_SECONDARY)),
        (Sender::User, MessageStatus::Delivered) => Some(("✓✓", TEXT_SECONDARY)),
        (Sender::User, MessageStatus::Read) => Some(("✓✓", READ_TICK)),
    }
}

fn message_bubble(ui: &mut egui::Ui, message: &Message, contact_name: &str) {
    let is_user = message.is_from_user();
    let max_width = (ui.available_width() * 0.7).max(160.0);
    let layout = if is_user {
        Layout::right_to_left(Align::Max)
    } else {
        Layout::left_to_right(Align::Max)
    };

    ui.with_layout(layout, |ui| {
        if !is_user {
            avatar(ui, contact_name, 28.0);
        }
        let fill = if is_user { BUBBLE_USER } else { BUBBLE_CONTACT };
        egui::Frame::default()
            .fill(fill)
            .corner_radius(BUBBLE_ROUNDING)
            .inner_margin(Vec2::new(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.with_layout(Layout::top_down(Align::Min), |ui| {
                    if message.image_url.is_some() {
                        ui.label(RichText::new("🖼 Image").color(TEXT_SECONDARY).italics());
                    }
                    if let Some(ref url) = message.audio_url {
                        ui.hyperlink_to(RichText::new("▶ Voice message").color(TEXT_PRIMARY), url);
                    }
                    if !message.text.is_empty() {
                        ui.label(RichText::new(&message.text).color(TEXT_PRIMARY));
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some((glyph, color)) = status_marker(message) {
                            ui.label(RichText::new(glyph).color(color).small());
                        }
                        ui.label(
                            RichText::new(local_bubble_time(&message.timestamp))
                                .color(TEXT_SECONDARY)
                                .small(),
                        );
                    });
                });
            });
    });
}

fn typing_indicator(ui: &mut egui::Ui, contact_name: &str) {
    let dots = (ui.input(|i| i.time) * 3.0) as usize % 3 + 1;
    ui.with_layout(Layout::left_to_right(Align::Max), |ui| {
        avatar(ui, contact_name, 28.0);
        egui::Frame::default()
            .fill(BUBBLE_CONTACT)
            .corner_radius(BUBBLE_ROUNDING)
            .inner_margin(Vec2::new(14.0, 8.0))
            .show(ui, |ui| {
                ui.label(RichText::new("•".repeat(dots)).color(TEXT_SECONDARY).strong());
            });
    });
}

fn suggestion_row(ui: &mut egui::Ui, state: &UiState, conversation_id: &str, intents: &mut Vec<UiIntent>) {
    let suggestions = state.suggestions(conversation_id);
    if suggestions.is_empty() || state.recording {
        return;
    }
    ui.with_layout(Layout::right_to_left(Align::Center).with_main_wrap(true), |ui| {
        for suggestion in suggestions {
            let pill = egui::Button::new(RichText::new(suggestion).color(TEXT_PRIMARY).small())
                .fill(BG_SURFACE)
                .corner_radius(PILL_ROUNDING);
            if ui.add(pill).clicked() {
                intents.push(UiIntent::PickSuggestion {
                    conversation_id: conversation_id.to_string(),
                    text: suggestion.clone(),
                });
            }
        }
    });
    ui.add_space(4.0);
}

fn input_bar(
    ui: &mut egui::Ui,
    state: &mut UiState,
    conversation_id: &str,
    responding: bool,
    intents: &mut Vec<UiIntent>,
) {
    if state.recording {
        ui.horizontal(|ui| {
            ui.label(RichText::new("●").color(RECORDING));
            let transcript = if state.live_transcript.is_empty() {
                "Listening..."
            } else {
                state.live_transcript.as_str()
            };
            ui.label(RichText::new(transcript).color(TEXT_SECONDARY).italics());
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let stop = egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                    .fill(ACCENT)
                    .corner_radius(PILL_ROUNDING);
                if ui.add(stop).on_hover_text("Stop recording").clicked() {
                    intents.push(UiIntent::StopRecording);
                }
            });
        });
        return;
    }

    if let Some(ref image) = state.attachment {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("🖼 {} attached", image.mime_type))
                    .color(TEXT_SECONDARY)
                    .small(),
            );
            if ui.add(egui::Button::new(RichText::new("✕").color(ERROR)).frame(false)).clicked() {
                intents.push(UiIntent::ClearAttachment);
            }
        });
    }

    if let Some(ref error) = state.voice_error {
        ui.label(RichText::new(format!("Microphone: {}", error)).color(ERROR).small());
    }

    ui.horizontal(|ui| {
        let input = egui::TextEdit::singleline(&mut state.input_text)
            .hint_text("Type a message...")
            .desired_width(ui.available_width() - 70.0)
            .font(egui::FontId::proportional(14.0));
        let response = ui.add_enabled(!responding, input);

        let show_mic = !state.can_send();
        let (label, enabled) = if show_mic { ("🎤", true) } else { ("Send", !responding) };
        let button = ui.add_enabled(
            enabled,
            egui::Button::new(RichText::new(label).color(TEXT_PRIMARY))
                .fill(if enabled { ACCENT } else { BG_SURFACE })
                .corner_radius(PILL_ROUNDING)
                .min_size(Vec2::new(60.0, 0.0)),
        );

        let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if show_mic {
            if button.clicked() {
                intents.push(UiIntent::StartRecording);
            }
        } else if (enter || button.clicked()) && !responding {
            intents.push(UiIntent::Send {
                conversation_id: conversation_id.to_string(),
                text: state.input_text.clone(),
                image: state.attachment.take(),
            });
            state.input_text.clear();
            response.request_focus();
        }
    });
}

/// MIME type of a dropped file if it is an image. Browsers may leave the
/// type empty, so fall back to the extension.
pub fn image_mime(name: &str, mime: &str) -> Option<String> {
    if mime.starts_with("image/") {
        return Some(mime.to_string());
    }
    if !mime.is_empty() {
        return None;
    }
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime.to_string())
}

fn collect_dropped_image(ui: &egui::Ui, intents: &mut Vec<UiIntent>) {
    let dropped = ui.ctx().input(|i| i.raw.dropped_files.clone());
    for file in dropped {
        let Some(bytes) = file.bytes else { continue };
        match image_mime(&file.name, &file.mime) {
            Some(mime) => {
                intents.push(UiIntent::AttachImage(inline_image(&mime, &bytes)));
                return;
            }
            None => log::warn!("Ignoring dropped file {}: not an image", file.name),
        }
    }
}
