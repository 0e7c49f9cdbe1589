//! Settings panel: Gemini API key, endpoint and model names.
//! Edits a draft; nothing takes effect until Apply is clicked.

use egui::{self, RichText, Vec2};
use chat_types::config::{BackendConfig, DEFAULT_API_BASE, DEFAULT_CHAT_MODEL, DEFAULT_LIVE_MODEL};
use crate::intent::UiIntent;
use crate::state::UiState;
use crate::theme::*;

pub fn settings_panel(ui: &mut egui::Ui, state: &mut UiState, intents: &mut Vec<UiIntent>) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            let draft = &mut state.settings_draft;

            ui.label(RichText::new("Gemini").color(ACCENT).strong());
            ui.add_space(2.0);

            // API Key (masked)
            ui.label(RichText::new("API Key").color(TEXT_SECONDARY).small());
            ui.add(
                egui::TextEdit::singleline(&mut draft.api_key)
                    .password(true)
                    .hint_text("AIza..."),
            );
            if draft.api_key.trim().is_empty() {
                ui.label(
                    RichText::new("Replies and voice input need a key")
                        .color(ERROR)
                        .small()
                        .italics(),
                );
            }

            ui.add_space(4.0);

            ui.label(RichText::new("API Base URL (optional)").color(TEXT_SECONDARY).small());
            let mut base_url = draft.api_base.clone().unwrap_or_default();
            if ui
                .add(egui::TextEdit::singleline(&mut base_url).hint_text(DEFAULT_API_BASE))
                .changed()
            {
                draft.api_base = if base_url.trim().is_empty() {
                    None
                } else {
                    Some(base_url)
                };
            }

            ui.add_space(4.0);

            ui.label(RichText::new("Chat Model").color(TEXT_SECONDARY).small());
            ui.add(egui::TextEdit::singleline(&mut draft.chat_model).hint_text(DEFAULT_CHAT_MODEL));

            ui.add_space(4.0);

            ui.label(RichText::new("Live Transcription Model").color(TEXT_SECONDARY).small());
            ui.add(egui::TextEdit::singleline(&mut draft.live_model).hint_text(DEFAULT_LIVE_MODEL));

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let apply = ui.add(
                    egui::Button::new(RichText::new("Apply").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if apply.clicked() {
                    intents.push(UiIntent::ApplySettings(normalized(draft)));
                }
                ui.label(
                    RichText::new("Open conversations start fresh sessions")
                        .color(TEXT_SECONDARY)
                        .small(),
                );
            });
        });
}

/// Blank model names fall back to the defaults.
pub fn normalized(draft: &BackendConfig) -> BackendConfig {
    let mut config = draft.clone();
    config.api_key = config.api_key.trim().to_string();
    if config.chat_model.trim().is_empty() {
        config.chat_model = DEFAULT_CHAT_MODEL.to_string();
    }
    if config.live_model.trim().is_empty() {
        config.live_model = DEFAULT_LIVE_MODEL.to_string();
    }
    config
}
