use crate::config::AppConfig;
use crate::controller::{Controller, Rendered, Section};
use crate::format::{format_number, format_uptime};
use crate::worker::ApiWorker;
use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

/// Drives the controller without a window until the process is killed.
pub fn run(config: AppConfig, section: Option<&str>) -> Result<()> {
    let section = match section {
        Some(name) => Section::parse(name).ok_or_else(|| anyhow!("unknown section `{name}`"))?,
        None => Section::Overview,
    };

    let (worker, events) = ApiWorker::new(&config).context("starting API worker")?;
    let mut controller = Controller::new(&config, Box::new(worker));
    controller.bootstrap();
    if section != Section::Overview && controller.switch_section(section).is_none() {
        warn!(%section, "section unavailable, staying on overview");
    }
    info!(base_url = %config.base_url, section = %controller.section(), "headless watcher running");

    let mut seen_notices = 0u64;
    while let Ok(event) = events.recv() {
        let rendered = controller.handle_event(event);
        report(&controller, rendered);

        for notice in controller.notifications().active() {
            if notice.id > seen_notices {
                info!(kind = ?notice.kind, "{} {}", notice.kind.icon(), notice.message);
                seen_notices = notice.id;
            }
        }
        controller.notifications_mut().prune(std::time::Instant::now());
    }

    warn!("worker channel closed, stopping");
    Ok(())
}

fn report(controller: &Controller, rendered: Rendered) {
    match rendered {
        Rendered::Nothing | Rendered::Uptime | Rendered::Notice => {}
        Rendered::Status => {
            let status = controller.status();
            info!(
                state = %status.state,
                connected = status.connected,
                active = ?status.active_accounts,
                total = ?status.total_accounts,
                "status"
            );
        }
        Rendered::Stats | Rendered::Dashboard => {
            let stats = controller.stats();
            info!(
                balance = %format_number(stats.balance),
                hunts = stats.hunts_today,
                battles = stats.battles_today,
                uptime = %format_uptime(controller.uptime_secs()),
                "stats"
            );
        }
        Rendered::Navbar => info!(
            balance = %format_number(controller.navbar_balance()),
            uptime = %format_uptime(controller.uptime_secs()),
            "navbar"
        ),
        Rendered::Activity => {
            if let Some(item) = controller.activity().first() {
                info!(kind = %item.kind, time = %item.time, "{}", item.message);
            }
        }
        Rendered::CommandLogs => {
            if let Some(entry) = controller.command_logs().iter().last() {
                info!(
                    account = %entry.account_display,
                    kind = %entry.command_type,
                    status = %entry.status,
                    "{}",
                    entry.message
                );
            }
        }
        Rendered::ConsoleLogs => {
            if let Some(line) = controller.console().iter().last() {
                info!(level = %line.level, "{}", line.message);
            }
        }
        other => info!(update = ?other, "view updated"),
    }
}
