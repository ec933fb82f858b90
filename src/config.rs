use crate::cli::Cli;
use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub application_name: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub notification_secs: u64,
    pub command_log_limit: u32,
    pub resume_policy: ResumePolicy,
    pub export_dir: Option<PathBuf>,
    pub poll: PollIntervals,
    pub features: FeatureFlags,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: "MizuDeck".to_string(),
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 15,
            log_level: "info".to_string(),
            notification_secs: 5,
            command_log_limit: 100,
            resume_policy: ResumePolicy::default(),
            export_dir: None,
            poll: PollIntervals::default(),
            features: FeatureFlags::default(),
        }
    }
}

/// What gets restarted when the window becomes visible again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumePolicy {
    /// Every named timer, including the section-scoped ones.
    #[default]
    Full,
    /// Only the timers that were cleared when the window was hidden.
    Previous,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollIntervals {
    pub stats_secs: u64,
    pub status_secs: u64,
    pub activity_secs: u64,
    pub logs_secs: u64,
    pub command_logs_secs: u64,
    pub navbar_secs: u64,
    pub analytics_secs: u64,
    pub uptime_secs: u64,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            stats_secs: 5,
            status_secs: 10,
            activity_secs: 15,
            logs_secs: 3,
            command_logs_secs: 3,
            navbar_secs: 3,
            analytics_secs: 3,
            uptime_secs: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub gambling: bool,
    pub autoenhance: bool,
    pub analytics: bool,
    pub legacy_control: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            gambling: true,
            autoenhance: true,
            analytics: true,
            legacy_control: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self, AppConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("application_name", defaults.application_name.clone())?
            .set_default("base_url", defaults.base_url.clone())?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("log_level", defaults.log_level.clone())?
            .set_default("notification_secs", defaults.notification_secs)?
            .set_default("command_log_limit", defaults.command_log_limit)?;

        if let Some(profile) = &cli.profile {
            let profile_file_name = format!("mizudeck.{profile}.toml");
            if let Some(path) = Self::profile_path(&profile_file_name) {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if let Some(config_path) = &cli.config {
            builder = builder.add_source(File::from(config_path.clone()).required(true));
        } else if let Some(path) = Self::default_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("MIZUDECK").separator("__"));

        let built = builder.build()?;
        Ok(built.try_deserialize::<AppConfig>()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs.max(1))
    }

    /// Where exported log files go: configured directory, else the platform data dir, else cwd.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("net", "MizuNetwork", "MizuDeck")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("mizudeck.toml"))
    }

    fn profile_path(file_name: &str) -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(file_name))
    }
}

impl PollIntervals {
    pub fn period(secs: u64) -> Duration {
        Duration::from_secs(secs.max(1))
    }
}
