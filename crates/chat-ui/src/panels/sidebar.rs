//! Sidebar: conversation list with previews, most recent first.

use egui::{self, Align, Align2, FontId, Label, Layout, RichText, ScrollArea, Sense, Vec2};
use chat_types::conversation::Conversation;
use crate::format::local_list_timestamp;
use crate::intent::UiIntent;
use crate::state::UiState;
use crate::theme::*;

const ROW_HEIGHT: f32 = 64.0;

pub fn sidebar_panel(ui: &mut egui::Ui, state: &mut UiState, intents: &mut Vec<UiIntent>) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Gemini Chat").color(TEXT_PRIMARY).strong());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = RichText::new("⚙").color(if state.show_settings { ACCENT } else { TEXT_SECONDARY });
                    if ui.add(egui::Button::new(label).frame(false)).on_hover_text("Settings").clicked() {
                        state.show_settings = !state.show_settings;
                    }
                });
            });
        });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for convo in &state.conversations {
                let active = state.active_conversation.as_deref() == Some(convo.id.as_str());
                if conversation_row(ui, convo, active).clicked() {
                    intents.push(UiIntent::SelectConversation(convo.id.clone()));
                }
            }
        });
}

fn conversation_row(ui: &mut egui::Ui, convo: &Conversation, active: bool) -> egui::Response {
    let fill = if active { BG_SURFACE } else { BG_PRIMARY };
    let timestamp = convo
        .last_message()
        .map(|m| local_list_timestamp(&m.timestamp))
        .unwrap_or_default();

    let inner = egui::Frame::default()
        .fill(fill)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.set_min_height(ROW_HEIGHT - PANEL_PADDING.y * 2.0);
            ui.horizontal(|ui| {
                avatar(ui, &convo.contact.name, 44.0);
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.add(
                            Label::new(RichText::new(&convo.contact.name).color(TEXT_PRIMARY).strong())
                                .truncate(),
                        );
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.label(RichText::new(timestamp).color(TEXT_SECONDARY).small());
                        });
                    });
                    ui.add(
                        Label::new(RichText::new(convo.preview()).color(TEXT_SECONDARY).small())
                            .truncate(),
                    );
                });
            });
        });

    let response = inner.response.interact(Sense::click());
    ui.painter().hline(
        response.rect.x_range(),
        response.rect.bottom(),
        egui::Stroke::new(1.0, BORDER),
    );
    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

/// A round avatar with the contact's initial
pub fn avatar(ui: &mut egui::Ui, name: &str, size: f32) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), size / 2.0, avatar_color(name));
    let initial = name.chars().next().unwrap_or('?').to_uppercase().to_string();
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        initial,
        FontId::proportional(size * 0.45),
        TEXT_PRIMARY,
    );
}
