use super::theme;
use crate::controller::Controller;
use crate::services::api::{ControlAction, QuickToggle};
use eframe::egui::{self, RichText};

pub fn render(ui: &mut egui::Ui, controller: &mut Controller) {
    ui.heading("Quick Toggles");
    egui::Grid::new("quick_toggles")
        .num_columns(2)
        .spacing([24.0, 8.0])
        .show(ui, |ui| {
            for (index, toggle) in QuickToggle::ALL.into_iter().enumerate() {
                let state = controller.toggle_state(toggle);
                let mut enabled = state.enabled;
                let response = ui.add_enabled(
                    !state.busy,
                    egui::Checkbox::new(&mut enabled, toggle.to_string()),
                );
                if response.changed() {
                    controller.set_toggle(toggle, enabled);
                }
                if index % 2 == 1 {
                    ui.end_row();
                }
            }
        });

    ui.separator();
    egui::CollapsingHeader::new("Settings document")
        .default_open(false)
        .show(ui, |ui| match controller.settings_document() {
            Some(document) => {
                let pretty = serde_json::to_string_pretty(document)
                    .unwrap_or_else(|err| format!("unrenderable settings: {err}"));
                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .show(ui, |ui| ui.monospace(pretty));
            }
            None => {
                ui.colored_label(theme::MUTED, "Settings not loaded");
            }
        });

    ui.separator();
    ui.heading("Bot Control");
    ui.horizontal(|ui| {
        let label = if controller.is_terminating() {
            "Terminating..."
        } else {
            "Terminate Bot"
        };
        let button = egui::Button::new(RichText::new(label).color(theme::DANGER));
        if ui
            .add_enabled(controller.terminate_available() && !controller.is_terminating(), button)
            .clicked()
        {
            controller.request_terminate();
        }

        if controller.features().legacy_control {
            ui.separator();
            for action in ControlAction::ALL {
                if ui.button(capitalize(action.as_str())).clicked() {
                    controller.control(action);
                }
            }
        }
    });
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
