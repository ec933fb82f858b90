mod analytics;
mod commands;
mod forms;
mod logs;
mod notices;
mod overview;
mod theme;

use crate::controller::{Controller, Section};
use eframe::egui;

pub use notices::{render_confirmation, render_toasts};
pub use theme::{apply_theme, status_color};

pub fn render_section(ui: &mut egui::Ui, controller: &mut Controller) {
    ui.heading(controller.section().to_string());
    ui.separator();

    match controller.section() {
        Section::Overview => overview::render(ui, controller),
        Section::Logs => logs::render(ui, controller),
        Section::Commands => commands::render(ui, controller),
        Section::Security => forms::render_security(ui, controller),
        Section::Gambling => forms::render_gambling(ui, controller),
        Section::AutoEnhance => forms::render_autoenhance(ui, controller),
        Section::Analytics => analytics::render(ui, controller),
    }
}
