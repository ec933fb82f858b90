use crate::config::AppConfig;
use crate::controller::{AppEvent, Controller, Section};
use crate::format::{format_number, format_uptime};
use crate::ui::{apply_theme, render_confirmation, render_section, render_toasts, status_color};
use crate::worker::{ApiWorker, WorkerError};
use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, TryRecvError};
use eframe::{egui, App, CreationContext, NativeOptions};
use std::time::{Duration, Instant};
use tracing::error;

const IDLE_REPAINT: Duration = Duration::from_secs(1);

pub fn run(config: AppConfig) -> Result<()> {
    let app_name = config.application_name.clone();
    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&app_name)
            .with_inner_size([1180.0, 760.0]),
        ..NativeOptions::default()
    };

    eframe::run_native(
        &app_name,
        native_options,
        Box::new(move |cc| {
            MizuDeckApp::new(cc, config)
                .map(|app| Box::new(app) as Box<dyn App>)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error + Send + Sync>)
        }),
    )
    .map_err(|err| anyhow!(err.to_string()))
}

struct MizuDeckApp {
    application_name: String,
    base_url: String,
    controller: Controller,
    events: Receiver<AppEvent>,
    worker_lost: bool,
}

impl MizuDeckApp {
    fn new(cc: &CreationContext<'_>, config: AppConfig) -> Result<Self, WorkerError> {
        apply_theme(&cc.egui_ctx);

        let repaint = cc.egui_ctx.clone();
        let (worker, events) = ApiWorker::new(&config)?;
        let worker = worker.with_waker(move || repaint.request_repaint());

        let mut controller = Controller::new(&config, Box::new(worker));
        controller.bootstrap();

        Ok(Self {
            application_name: config.application_name.clone(),
            base_url: config.base_url.clone(),
            controller,
            events,
            worker_lost: false,
        })
    }

    fn consume_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.controller.handle_event(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.worker_lost {
                        error!("background worker disconnected");
                    }
                    self.worker_lost = true;
                    break;
                }
            }
        }
    }

    fn track_visibility(&mut self, ctx: &egui::Context) {
        let minimized = ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        self.controller.set_visible(!minimized);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (refresh, save) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::R),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::S),
            )
        });
        if refresh {
            self.controller.refresh_stats();
        }
        if save {
            self.controller.save_current_form();
        }
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(&self.application_name);
            ui.separator();

            let status = self.controller.status();
            ui.colored_label(status_color(&status.state), "●");
            ui.label(status.state.to_string());
            if let (Some(active), Some(total)) = (status.active_accounts, status.total_accounts) {
                ui.small(format!("{active}/{total} accounts"));
            }

            ui.separator();
            ui.label(format!("💰 {}", format_number(self.controller.navbar_balance())));
            ui.label(format!("⏱ {}", format_uptime(self.controller.uptime_secs())));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Refresh").on_hover_text("Ctrl+R").clicked() {
                    self.controller.refresh_stats();
                }
                ui.small(&self.base_url);
            });
        });

        if self.worker_lost {
            ui.colored_label(
                egui::Color32::LIGHT_RED,
                "Background worker stopped. Restart the application after checking logs.",
            );
        }
    }

    fn render_navigation(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        for section in Section::ALL {
            if !section.is_enabled(self.controller.features()) {
                continue;
            }
            let selected = self.controller.section() == section;
            if ui
                .selectable_label(selected, section.to_string())
                .clicked()
                && !selected
            {
                self.controller.switch_section(section);
            }
        }
    }
}

impl App for MizuDeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.consume_events();
        self.track_visibility(ctx);
        self.handle_shortcuts(ctx);

        let now = Instant::now();
        self.controller.notifications_mut().prune(now);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        egui::SidePanel::left("navigation")
            .resizable(false)
            .exact_width(150.0)
            .show(ctx, |ui| {
                self.render_navigation(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("section_body")
                .auto_shrink([false, false])
                .show(ui, |ui| render_section(ui, &mut self.controller));
        });

        render_toasts(ctx, &mut self.controller);
        render_confirmation(ctx, &mut self.controller);

        let repaint_in = self
            .controller
            .notifications()
            .next_expiry(now)
            .map_or(IDLE_REPAINT, |expiry| expiry.min(IDLE_REPAINT));
        ctx.request_repaint_after(repaint_in);
    }
}
