use crate::services::api::{ControlAction, QuickToggle};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line interface for MizuDeck.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mizudeck",
    author,
    version,
    about = "Desktop control panel for the Mizu automation bot"
)]
pub struct Cli {
    /// Optional path to a configuration file (TOML, YAML, JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Named profile to load (e.g. dev, staging, prod).
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Poll the backend without opening a window, logging every update.
    #[arg(long)]
    pub headless: bool,

    /// Section the headless watcher stays on (overview, logs, analytics, ...).
    #[arg(long, requires = "headless")]
    pub section: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the bot status.
    Status,
    /// Print today's totals and per-account balances.
    Stats,
    /// Flip one quick toggle.
    Toggle {
        #[arg(value_enum)]
        name: ToggleArg,
        #[arg(value_enum)]
        state: SwitchArg,
    },
    /// Stop every running bot instance.
    Terminate {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Legacy start/stop/restart endpoint.
    Control {
        #[arg(value_enum)]
        action: ControlArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ToggleArg {
    Hunt,
    Battle,
    Daily,
    Owo,
    SlashCommands,
    ChannelSwitcher,
    StopOnNoGems,
}

impl From<ToggleArg> for QuickToggle {
    fn from(value: ToggleArg) -> Self {
        match value {
            ToggleArg::Hunt => QuickToggle::Hunt,
            ToggleArg::Battle => QuickToggle::Battle,
            ToggleArg::Daily => QuickToggle::Daily,
            ToggleArg::Owo => QuickToggle::Owo,
            ToggleArg::SlashCommands => QuickToggle::SlashCommands,
            ToggleArg::ChannelSwitcher => QuickToggle::ChannelSwitcher,
            ToggleArg::StopOnNoGems => QuickToggle::StopOnNoGems,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SwitchArg {
    On,
    Off,
}

impl SwitchArg {
    pub fn enabled(self) -> bool {
        matches!(self, SwitchArg::On)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ControlArg {
    Start,
    Stop,
    Restart,
}

impl From<ControlArg> for ControlAction {
    fn from(value: ControlArg) -> Self {
        match value {
            ControlArg::Start => ControlAction::Start,
            ControlArg::Stop => ControlAction::Stop,
            ControlArg::Restart => ControlAction::Restart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toggle_command() {
        let cli = Cli::try_parse_from(["mizudeck", "toggle", "slash-commands", "on"]).unwrap();
        match cli.command {
            Some(Command::Toggle { name, state }) => {
                assert_eq!(QuickToggle::from(name), QuickToggle::SlashCommands);
                assert!(state.enabled());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_precede_subcommands() {
        let cli = Cli::try_parse_from(["mizudeck", "--profile", "dev", "terminate", "--yes"]).unwrap();
        assert_eq!(cli.profile.as_deref(), Some("dev"));
        assert!(matches!(cli.command, Some(Command::Terminate { yes: true })));
    }

    #[test]
    fn section_needs_headless() {
        assert!(Cli::try_parse_from(["mizudeck", "--section", "logs"]).is_err());
        let cli = Cli::try_parse_from(["mizudeck", "--headless", "--section", "logs"]).unwrap();
        assert_eq!(cli.section.as_deref(), Some("logs"));
    }

    #[test]
    fn rejects_unknown_control_action() {
        assert!(Cli::try_parse_from(["mizudeck", "control", "pause"]).is_err());
    }
}
