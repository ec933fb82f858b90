use super::theme;
use crate::controller::Controller;
use crate::format::{format_clock, format_grouped};
use eframe::egui::{self, RichText};

pub fn render(ui: &mut egui::Ui, controller: &Controller) {
    if let Some(error) = controller.analytics_error() {
        ui.colored_label(theme::DANGER, error);
    }

    let Some(report) = controller.analytics() else {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading analytics...");
        });
        return;
    };

    let global = &report.global;
    ui.horizontal(|ui| {
        summary(ui, "Commands / min", &format_grouped(global.cpm));
        summary(ui, "Active accounts", &format_grouped(global.active_accounts));
        summary(ui, "Session commands", &format_grouped(global.session_total));
        summary(ui, "Net earnings", &format_grouped(global.net_earnings));
    });

    ui.separator();
    egui::Grid::new("analytics_accounts")
        .striped(true)
        .num_columns(8)
        .show(ui, |ui| {
            for header in ["Account", "CPM", "Hunt", "Battle", "Daily", "OwO", "Net", "Last"] {
                ui.strong(header);
            }
            ui.end_row();

            for account in &report.accounts {
                ui.label(account.label());
                ui.label(format_grouped(account.cpm));
                ui.label(format_grouped(account.hunt));
                ui.label(format_grouped(account.battle));
                ui.label(format_grouped(account.daily));
                ui.label(format_grouped(account.owo));
                ui.label(format_grouped(account.net_earnings));
                ui.label(format_clock(account.last_command_ts));
                ui.end_row();
            }

            if report.accounts.is_empty() {
                ui.colored_label(theme::MUTED, "No account activity this session");
                ui.end_row();
            }
        });
}

fn summary(ui: &mut egui::Ui, title: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(title).small().color(theme::MUTED));
        ui.label(RichText::new(value).size(20.0).strong());
    });
    ui.add_space(24.0);
}
