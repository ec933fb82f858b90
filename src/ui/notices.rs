use super::theme;
use crate::controller::Controller;
use eframe::egui::{self, Align2, RichText};

/// Toasts stacked in the bottom-right corner, newest last.
pub fn render_toasts(ctx: &egui::Context, controller: &mut Controller) {
    if controller.notifications().active().is_empty() {
        return;
    }

    let mut dismissed = Vec::new();
    egui::Area::new(egui::Id::new("mizudeck_toasts"))
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            ui.set_max_width(360.0);
            for notice in controller.notifications().active() {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(notice.kind.icon())
                                .color(theme::notice_color(notice.kind))
                                .strong(),
                        );
                        ui.label(&notice.message);
                        if ui.small_button("✕").clicked() {
                            dismissed.push(notice.id);
                        }
                    });
                });
            }
        });

    for id in dismissed {
        controller.notifications_mut().dismiss(id);
    }
}

/// Modal yes/no window for whichever action is waiting on the user.
pub fn render_confirmation(ctx: &egui::Context, controller: &mut Controller) {
    let Some(pending) = controller.pending_confirmation() else {
        return;
    };

    let mut answer = None;
    egui::Window::new(pending.title())
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(pending.prompt());
            ui.horizontal(|ui| {
                if ui
                    .button(RichText::new(pending.accept_label()).color(theme::DANGER))
                    .clicked()
                {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });

    if let Some(confirmed) = answer {
        controller.confirm(confirmed);
    }
}
