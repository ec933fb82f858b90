use super::theme;
use crate::controller::Controller;
use crate::format::{format_number, format_uptime};
use eframe::egui::{self, RichText};

pub fn render(ui: &mut egui::Ui, controller: &Controller) {
    let stats = controller.stats();

    if let Some(error) = controller.stats_error() {
        ui.colored_label(theme::DANGER, error);
    }

    let balance = stats
        .balance_formatted
        .clone()
        .unwrap_or_else(|| format_number(stats.balance));

    egui::Grid::new("overview_cards")
        .num_columns(3)
        .spacing([32.0, 12.0])
        .show(ui, |ui| {
            stat_card(ui, "Total Cowoncy", &balance);
            stat_card(ui, "Hunts Today", &stats.hunts_today.to_string());
            stat_card(ui, "Battles Today", &stats.battles_today.to_string());
            ui.end_row();
            stat_card(ui, "Uptime", &format_uptime(controller.uptime_secs()));
            stat_card(ui, "Commands", &stats.commands_executed.to_string());
            stat_card(ui, "Captchas Solved", &stats.captchas_solved.to_string());
            ui.end_row();
        });

    ui.separator();
    ui.heading("Accounts");
    egui::Grid::new("accounts_breakdown")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui| {
            ui.strong("Account");
            ui.strong("Cowoncy");
            ui.strong("Captchas");
            ui.end_row();

            for account in &stats.accounts {
                ui.label(&account.user_display);
                ui.label(&account.cowoncy_formatted);
                ui.label(account.captchas.to_string());
                ui.end_row();
            }

            if stats.accounts.is_empty() {
                ui.colored_label(theme::MUTED, "No accounts reported");
                ui.end_row();
            }
        });

    ui.separator();
    ui.heading("Recent Activity");
    if let Some(error) = controller.activity_error() {
        ui.colored_label(theme::DANGER, error);
        return;
    }
    if controller.activity().is_empty() {
        ui.colored_label(theme::MUTED, "No recent activity");
        return;
    }
    for item in controller.activity() {
        ui.horizontal(|ui| {
            let color = match item.kind.as_str() {
                "success" => theme::SUCCESS,
                "error" => theme::DANGER,
                "warning" => theme::WARNING,
                _ => theme::ACCENT,
            };
            ui.colored_label(color, "●");
            ui.label(&item.message);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small(&item.time);
            });
        });
    }
}

fn stat_card(ui: &mut egui::Ui, title: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(title).small().color(theme::MUTED));
        ui.label(RichText::new(value).size(22.0).strong());
    });
}
