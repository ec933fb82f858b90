use super::theme;
use crate::controller::{Controller, LogEntry};
use eframe::egui::{self, text::LayoutJob, FontId, RichText, TextFormat};

const LOG_TYPES: [&str; 11] = [
    "all",
    "hunt",
    "battle",
    "daily",
    "owo",
    "gems",
    "captcha",
    "system",
    "autosell",
    "bank",
    "inventory",
];

pub fn render(ui: &mut egui::Ui, controller: &mut Controller) {
    render_controls(ui, controller);
    ui.separator();

    if let Some(error) = controller.log_error() {
        ui.colored_label(theme::DANGER, error);
    }

    let (total, filtered) = controller.log_counts();
    ui.small(format!(
        "Showing {} of {filtered} matching ({total} total)",
        controller.command_logs().len()
    ));

    let view = controller.log_view();
    egui::ScrollArea::vertical()
        .id_salt("command_logs")
        .max_height(ui.available_height() * 0.65)
        .auto_shrink([false, false])
        .stick_to_bottom(view.auto_scroll)
        .show(ui, |ui| {
            if controller.command_logs().is_empty() {
                ui.colored_label(theme::MUTED, "No command logs yet");
            }
            for entry in controller.command_logs().iter() {
                ui.label(log_line(entry, view.show_timestamps));
            }
        });

    ui.separator();
    egui::CollapsingHeader::new("Console")
        .default_open(false)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("console_logs")
                .max_height(200.0)
                .auto_shrink([false, true])
                .stick_to_bottom(view.auto_scroll)
                .show(ui, |ui| {
                    for line in controller.console().iter() {
                        ui.horizontal(|ui| {
                            if view.show_timestamps {
                                ui.monospace(RichText::new(&line.timestamp).color(theme::MUTED));
                            }
                            ui.monospace(
                                RichText::new(line.level.to_uppercase())
                                    .color(theme::level_color(&line.level)),
                            );
                            ui.monospace(&line.message);
                        });
                    }
                });
        });
}

fn render_controls(ui: &mut egui::Ui, controller: &mut Controller) {
    let mut log_type = controller.log_query().log_type.clone();
    let mut account = controller.log_query().account.clone();

    ui.horizontal_wrapped(|ui| {
        egui::ComboBox::from_label("Type")
            .selected_text(&log_type)
            .show_ui(ui, |ui| {
                for option in LOG_TYPES {
                    ui.selectable_value(&mut log_type, option.to_string(), option);
                }
            });

        let account_label = controller
            .accounts()
            .iter()
            .find(|(id, _)| *id == account)
            .map(|(_, display)| display.clone())
            .unwrap_or_else(|| "All accounts".to_string());
        egui::ComboBox::from_label("Account")
            .selected_text(account_label)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut account, "all".to_string(), "All accounts");
                for (id, display) in controller.accounts() {
                    ui.selectable_value(&mut account, id.clone(), display);
                }
            });

        let view = controller.log_view_mut();
        ui.checkbox(&mut view.show_timestamps, "Timestamps");
        ui.checkbox(&mut view.auto_scroll, "Auto-scroll");

        if ui.button("Refresh").clicked() {
            controller.reload_command_logs();
        }
        if ui.button("Clear").clicked() {
            controller.clear_logs();
        }
        if ui.button("Export").clicked() {
            controller.export_logs();
        }
    });

    controller.set_log_filter(log_type, account);
}

fn log_line(entry: &LogEntry, show_timestamp: bool) -> LayoutJob {
    let font = FontId::monospace(13.0);
    let plain = TextFormat {
        font_id: font.clone(),
        color: theme::MUTED,
        ..Default::default()
    };

    let mut job = LayoutJob::default();
    if show_timestamp {
        job.append(&format!("[{}] ", entry.time), 0.0, plain.clone());
    }
    job.append(
        &format!("{} ", entry.account_display),
        0.0,
        TextFormat {
            color: theme::ACCENT,
            ..plain.clone()
        },
    );
    job.append(&format!("{}: ", entry.command_type.to_uppercase()), 0.0, plain);

    for segment in &entry.segments {
        job.append(
            &segment.text,
            0.0,
            TextFormat {
                font_id: font.clone(),
                color: theme::span_color(segment.style),
                ..Default::default()
            },
        );
    }
    job
}
