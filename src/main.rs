mod app;
mod cli;
mod config;
mod controller;
mod format;
mod headless;
mod services;
mod ui;
mod worker;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::format::{format_number, format_uptime};
use crate::services::api::{ControlAction, QuickToggle};
use crate::worker::ApiWorker;
use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use std::panic;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        eprintln!("MizuDeck panic: {info}");
        if let Some(location) = info.location() {
            eprintln!(
                "  at {}:{}",
                location.file(),
                location.line()
            );
        }
    }));

    let cli = cli::Cli::parse();
    let settings = AppConfig::load(&cli).context("loading configuration")?;
    init_tracing(&settings);

    if let Some(command) = cli.command.clone() {
        return handle_command(&settings, command);
    }

    if cli.headless {
        return headless::run(settings, cli.section.as_deref());
    }

    app::run(settings)
}

fn init_tracing(settings: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mizudeck={}", settings.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(settings: &AppConfig, command: Command) -> Result<()> {
    let (worker, _events) = ApiWorker::new(settings).context("starting API worker")?;
    let client = worker.client().clone();

    match command {
        Command::Status => {
            let status = worker
                .block_on(client.status())
                .context("fetching bot status")?;
            let view = controller::StatusView::from_payload(&status);
            println!("Status: {}", view.state);
            if let (Some(active), Some(total)) = (view.active_accounts, view.total_accounts) {
                println!("Accounts: {active}/{total} active");
            }
        }
        Command::Stats => {
            let stats = worker.block_on(client.stats()).context("fetching stats")?;
            let balance = stats
                .balance_formatted
                .clone()
                .unwrap_or_else(|| format_number(stats.balance));
            println!("Balance:  {balance}");
            println!("Hunts:    {}", stats.hunts_today);
            println!("Battles:  {}", stats.battles_today);
            println!("Uptime:   {}", format_uptime(stats.uptime));
            for account in &stats.accounts {
                println!(
                    "  {:<20} {:>12}  captchas: {}",
                    account.user_display, account.cowoncy_formatted, account.captchas
                );
            }
        }
        Command::Toggle { name, state } => {
            let toggle = QuickToggle::from(name);
            let enabled = state.enabled();
            let result = worker
                .block_on(client.quick_toggle(toggle, enabled))
                .with_context(|| format!("toggling {toggle}"))?;
            if let Some(error) = result.error {
                bail!("{toggle}: {error}");
            }
            println!("{}", result.message_or(&format!("{toggle} updated")));
        }
        Command::Terminate { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Terminate all running bot instances now?")
                    .default(false)
                    .interact()
                    .context("reading confirmation")?;
            if !confirmed {
                println!("Terminate cancelled.");
                return Ok(());
            }
            let result = worker
                .block_on(client.terminate())
                .context("sending terminate signal")?;
            if let Some(error) = result.error {
                bail!("terminate rejected: {error}");
            }
            println!("{}", result.message_or("Terminate signal sent"));
        }
        Command::Control { action } => {
            let action = ControlAction::from(action);
            if !settings.features.legacy_control {
                bail!("legacy control is disabled; set features.legacy_control = true");
            }
            let result = worker
                .block_on(client.control(action))
                .with_context(|| format!("sending {action}"))?;
            if let Some(error) = result.error {
                bail!("{action} rejected: {error}");
            }
            println!("{}", result.message_or(&format!("Bot {action} requested")));
        }
    }
    Ok(())
}
