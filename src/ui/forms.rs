use super::theme;
use crate::controller::{Controller, SettingsForm};
use crate::services::api::{GambleGame, DELAY_CEILING_SECS, DELAY_FLOOR_SECS, MIN_START_VALUE};
use eframe::egui;

pub fn render_security(ui: &mut egui::Ui, controller: &mut Controller) {
    let form = controller.security();
    if !form.loaded {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading security settings...");
        });
    }
    let saving = form.saving;

    let draft = controller.security_mut();
    egui::Grid::new("security_form")
        .num_columns(2)
        .spacing([24.0, 10.0])
        .show(ui, |ui| {
            ui.label("Command delay min (s)");
            ui.add(
                egui::DragValue::new(&mut draft.delay_min)
                    .range(DELAY_FLOOR_SECS..=DELAY_CEILING_SECS)
                    .speed(0.1),
            );
            ui.end_row();

            ui.label("Command delay max (s)");
            ui.add(
                egui::DragValue::new(&mut draft.delay_max)
                    .range(DELAY_FLOOR_SECS..=DELAY_CEILING_SECS)
                    .speed(0.1),
            );
            ui.end_row();

            ui.label("Captcha restart min (min)");
            ui.add(egui::DragValue::new(&mut draft.captcha_restart_min).speed(0.1));
            ui.end_row();

            ui.label("Captcha restart max (min)");
            ui.add(egui::DragValue::new(&mut draft.captcha_restart_max).speed(0.1));
            ui.end_row();
        });
    ui.small("Typing indicator, random delays and silent mode are always sent disabled.");

    ui.horizontal(|ui| {
        if ui.add_enabled(!saving, egui::Button::new("Save")).clicked() {
            controller.save_form(SettingsForm::Security);
        }
        if ui.add_enabled(!saving, egui::Button::new("Reset to defaults")).clicked() {
            controller.request_reset_security();
        }
        if saving {
            ui.spinner();
        }
    });
}

pub fn render_gambling(ui: &mut egui::Ui, controller: &mut Controller) {
    let saving = controller.gambling().saving;
    let draft = controller.gambling_mut();

    egui::Grid::new("gambling_budget")
        .num_columns(2)
        .spacing([24.0, 10.0])
        .show(ui, |ui| {
            ui.label("Allotted amount");
            ui.add(egui::DragValue::new(&mut draft.allotted_amount).speed(100.0));
            ui.end_row();

            ui.label("Goal system");
            ui.checkbox(&mut draft.goal_system.enabled, "Enabled");
            ui.end_row();

            ui.label("Goal amount");
            ui.add_enabled(
                draft.goal_system.enabled,
                egui::DragValue::new(&mut draft.goal_system.amount).speed(10.0),
            );
            ui.end_row();
        });

    ui.separator();
    game_section(ui, "Coinflip", &mut draft.coinflip);
    ui.separator();
    game_section(ui, "Slots", &mut draft.slots);

    ui.horizontal(|ui| {
        if ui.add_enabled(!saving, egui::Button::new("Save")).clicked() {
            controller.save_form(SettingsForm::Gambling);
        }
        if saving {
            ui.spinner();
        }
    });
}

fn game_section(ui: &mut egui::Ui, name: &str, game: &mut GambleGame) {
    ui.strong(name);
    egui::Grid::new(format!("gamble_{name}"))
        .num_columns(2)
        .spacing([24.0, 8.0])
        .show(ui, |ui| {
            ui.label("Enabled");
            ui.checkbox(&mut game.enabled, "");
            ui.end_row();

            ui.label("Start value");
            ui.add(egui::DragValue::new(&mut game.start_value).speed(10.0));
            ui.end_row();

            ui.label("Multiplier on lose");
            ui.add(
                egui::DragValue::new(&mut game.multiplier_on_lose)
                    .range(1.0..=10.0)
                    .speed(0.1),
            );
            ui.end_row();

            ui.label("Cooldown (s)");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut game.cooldown[0]).speed(0.5));
                ui.label("to");
                ui.add(egui::DragValue::new(&mut game.cooldown[1]).speed(0.5));
            });
            ui.end_row();
        });
    if game.start_value < MIN_START_VALUE {
        ui.colored_label(
            theme::WARNING,
            format!("Start value must be at least {MIN_START_VALUE}"),
        );
    }
}

pub fn render_autoenhance(ui: &mut egui::Ui, controller: &mut Controller) {
    let saving = controller.autoenhance().saving;
    let draft = controller.autoenhance_mut();

    ui.checkbox(&mut draft.enabled, "Auto-enhance enabled");
    ui.separator();

    ui.strong("Use gems");
    egui::Grid::new("autoenhance_gems")
        .num_columns(2)
        .spacing([24.0, 8.0])
        .show(ui, |ui| {
            let gems = &mut draft.auto_use_gems;
            ui.label("Enabled");
            ui.checkbox(&mut gems.enabled, "");
            ui.end_row();
            ui.label("Cooldown (min)");
            ui.add(egui::DragValue::new(&mut gems.cooldown_minutes).speed(0.5));
            ui.end_row();
            ui.label("Use lowest tier first");
            ui.checkbox(&mut gems.use_lowest_first, "");
            ui.end_row();
        });

    ui.strong("Invest essence");
    egui::Grid::new("autoenhance_essence")
        .num_columns(2)
        .spacing([24.0, 8.0])
        .show(ui, |ui| {
            let essence = &mut draft.auto_invest_essence;
            ui.label("Enabled");
            ui.checkbox(&mut essence.enabled, "");
            ui.end_row();
            ui.label("Cooldown (min)");
            ui.add(egui::DragValue::new(&mut essence.cooldown_minutes).speed(0.5));
            ui.end_row();
            ui.label("Minimum essence");
            ui.add(egui::DragValue::new(&mut essence.min_essence_required).speed(10.0));
            ui.end_row();
            ui.label("Max efficiency level");
            ui.add(egui::DragValue::new(&mut essence.max_efficiency_level));
            ui.end_row();
            ui.label("Max duration level");
            ui.add(egui::DragValue::new(&mut essence.max_duration_level));
            ui.end_row();
            ui.label("Max investment per run");
            ui.add(egui::DragValue::new(&mut essence.max_investment_per_time).speed(10.0));
            ui.end_row();
        });

    ui.horizontal(|ui| {
        if ui.add_enabled(!saving, egui::Button::new("Save")).clicked() {
            controller.save_form(SettingsForm::AutoEnhance);
        }
        if saving {
            ui.spinner();
        }
    });
}
