use crate::controller::{BotState, NoticeKind, SpanStyle};
use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle, Visuals};

pub const ACCENT: Color32 = Color32::from_rgb(96, 170, 255);
pub const SUCCESS: Color32 = Color32::from_rgb(87, 199, 133);
pub const WARNING: Color32 = Color32::from_rgb(240, 190, 70);
pub const DANGER: Color32 = Color32::from_rgb(235, 95, 95);
pub const MUTED: Color32 = Color32::GRAY;
pub const CURRENCY: Color32 = Color32::from_rgb(255, 214, 102);

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.hyperlink_color = ACCENT;
    visuals.selection.bg_fill = ACCENT.linear_multiply(0.65);
    visuals.selection.stroke.color = ACCENT;
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.interaction.tooltip_delay = 0.15;

    style.text_styles.insert(
        TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style
        .text_styles
        .insert(TextStyle::Body, FontId::new(15.0, FontFamily::Proportional));
    style.text_styles.insert(
        TextStyle::Monospace,
        FontId::new(13.0, FontFamily::Monospace),
    );
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Small,
        FontId::new(12.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

pub fn status_color(state: &BotState) -> Color32 {
    match state {
        BotState::Online => SUCCESS,
        BotState::Captcha => DANGER,
        BotState::Paused => WARNING,
        BotState::Offline => MUTED,
        BotState::Connecting | BotState::Other(_) => ACCENT,
    }
}

pub fn notice_color(kind: NoticeKind) -> Color32 {
    match kind {
        NoticeKind::Info => ACCENT,
        NoticeKind::Success => SUCCESS,
        NoticeKind::Warning => WARNING,
        NoticeKind::Error => DANGER,
    }
}

pub fn span_color(style: SpanStyle) -> Color32 {
    match style {
        SpanStyle::Plain => Color32::LIGHT_GRAY,
        SpanStyle::Success => SUCCESS,
        SpanStyle::Error => DANGER,
        SpanStyle::Highlight => CURRENCY,
    }
}

pub fn level_color(level: &str) -> Color32 {
    match level.to_ascii_lowercase().as_str() {
        "error" | "critical" => DANGER,
        "warning" | "warn" => WARNING,
        "success" => SUCCESS,
        "debug" => MUTED,
        _ => Color32::LIGHT_GRAY,
    }
}
