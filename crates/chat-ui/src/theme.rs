//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(17, 27, 33);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(32, 44, 51);
pub const BG_SURFACE: Color32 = Color32::from_rgb(42, 57, 66);
pub const BG_CHAT: Color32 = Color32::from_rgb(11, 20, 26);
pub const BORDER: Color32 = Color32::from_rgb(34, 46, 53);
pub const BUBBLE_USER: Color32 = Color32::from_rgb(0, 92, 75);
pub const BUBBLE_CONTACT: Color32 = BG_SECONDARY;
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(233, 237, 239);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(134, 150, 160);
pub const ACCENT: Color32 = Color32::from_rgb(0, 168, 132);
pub const READ_TICK: Color32 = Color32::from_rgb(83, 189, 235);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const RECORDING: Color32 = Color32::from_rgb(239, 68, 68);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const BUBBLE_ROUNDING: CornerRadius = CornerRadius::same(8);
pub const PILL_ROUNDING: CornerRadius = CornerRadius::same(14);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_SURFACE;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.weak_bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}

/// Fill colour of a contact's avatar disc, stable per name
pub fn avatar_color(name: &str) -> Color32 {
    const PALETTE: [Color32; 5] = [
        Color32::from_rgb(0, 128, 105),
        Color32::from_rgb(83, 109, 254),
        Color32::from_rgb(230, 126, 34),
        Color32::from_rgb(155, 89, 182),
        Color32::from_rgb(41, 128, 185),
    ];
    let hash = name.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    PALETTE[hash % PALETTE.len()]
}
