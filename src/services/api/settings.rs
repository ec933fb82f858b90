use super::dashboard::DashboardClient;
use super::http::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use thiserror::Error;

impl DashboardClient {
    /// Full settings document; only used to seed toggle state before quick settings load.
    pub async fn global_settings(&self) -> Result<Value, ApiError> {
        self.http.get_json("/api/settings").await
    }

    pub async fn quick_settings(&self) -> Result<QuickSettings, ApiError> {
        self.http.get_json("/api/dashboard/quick-settings").await
    }

    pub async fn quick_toggle(&self, toggle: QuickToggle, enabled: bool) -> Result<ActionResult, ApiError> {
        let payload = json!({
            "command": toggle.command(),
            "enabled": enabled
        });
        self.http
            .post_json("/api/dashboard/quick-toggle", &payload)
            .await
    }

    pub async fn security_settings(&self) -> Result<SecuritySettings, ApiError> {
        self.http.get_json("/api/dashboard/security-settings").await
    }

    pub async fn save_security_settings(
        &self,
        settings: &SecuritySettings,
    ) -> Result<ActionResult, ApiError> {
        settings.validate()?;
        self.http
            .post_json("/api/dashboard/security-settings", &settings.to_payload())
            .await
    }

    pub async fn gambling_settings(&self) -> Result<GamblingSettings, ApiError> {
        self.http.get_json("/api/dashboard/gambling-settings").await
    }

    pub async fn save_gambling_settings(
        &self,
        settings: &GamblingSettings,
    ) -> Result<ActionResult, ApiError> {
        settings.validate()?;
        self.http
            .post_json("/api/dashboard/gambling-settings", settings)
            .await
    }

    pub async fn autoenhance_settings(&self) -> Result<AutoEnhanceSettings, ApiError> {
        self.http.get_json("/api/dashboard/autoenhance-settings").await
    }

    pub async fn save_autoenhance_settings(
        &self,
        settings: &AutoEnhanceSettings,
    ) -> Result<ActionResult, ApiError> {
        self.http
            .post_json("/api/dashboard/autoenhance-settings", settings)
            .await
    }
}

/// Body returned by mutating endpoints. Either field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionResult {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ActionResult {
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickToggle {
    Hunt,
    Battle,
    Daily,
    Owo,
    SlashCommands,
    ChannelSwitcher,
    StopOnNoGems,
}

impl QuickToggle {
    pub const ALL: [QuickToggle; 7] = [
        QuickToggle::Hunt,
        QuickToggle::Battle,
        QuickToggle::Daily,
        QuickToggle::Owo,
        QuickToggle::SlashCommands,
        QuickToggle::ChannelSwitcher,
        QuickToggle::StopOnNoGems,
    ];

    /// Name the backend expects in the `command` field.
    pub fn command(&self) -> &'static str {
        match self {
            QuickToggle::Hunt => "hunt",
            QuickToggle::Battle => "battle",
            QuickToggle::Daily => "daily",
            QuickToggle::Owo => "owo",
            QuickToggle::SlashCommands => "useSlashCommands",
            QuickToggle::ChannelSwitcher => "channelSwitcher",
            QuickToggle::StopOnNoGems => "stopHuntingWhenNoGems",
        }
    }

    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|toggle| toggle.command() == command)
    }
}

impl fmt::Display for QuickToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuickToggle::Hunt => write!(f, "Hunt"),
            QuickToggle::Battle => write!(f, "Battle"),
            QuickToggle::Daily => write!(f, "Daily"),
            QuickToggle::Owo => write!(f, "OwO"),
            QuickToggle::SlashCommands => write!(f, "Slash Commands"),
            QuickToggle::ChannelSwitcher => write!(f, "Channel Switcher"),
            QuickToggle::StopOnNoGems => write!(f, "Stop On No Gems"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickSettings {
    pub hunt: bool,
    pub battle: bool,
    pub daily: bool,
    pub owo: bool,
    pub use_slash_commands: bool,
    pub channel_switcher: bool,
    pub stop_hunting_when_no_gems: bool,
}

impl QuickSettings {
    pub fn get(&self, toggle: QuickToggle) -> bool {
        match toggle {
            QuickToggle::Hunt => self.hunt,
            QuickToggle::Battle => self.battle,
            QuickToggle::Daily => self.daily,
            QuickToggle::Owo => self.owo,
            QuickToggle::SlashCommands => self.use_slash_commands,
            QuickToggle::ChannelSwitcher => self.channel_switcher,
            QuickToggle::StopOnNoGems => self.stop_hunting_when_no_gems,
        }
    }

    /// Reads the same flags out of the full settings document.
    pub fn from_global(settings: &Value) -> Self {
        let command_enabled = |name: &str| {
            settings
                .pointer(&format!("/commands/{name}/enabled"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        let flag = |pointer: &str| {
            settings
                .pointer(pointer)
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };

        Self {
            hunt: command_enabled("hunt"),
            battle: command_enabled("battle"),
            daily: flag("/autoDaily"),
            owo: command_enabled("owo"),
            use_slash_commands: flag("/useSlashCommands"),
            channel_switcher: flag("/channelSwitcher/enabled"),
            stop_hunting_when_no_gems: flag("/stopHuntingWhenNoGems"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Minimum delay must be less than maximum delay")]
    DelayOrder,
    #[error("Delay values must be between {min} and {max} seconds")]
    DelayRange { min: f64, max: f64 },
    #[error("{game} start value must be at least {minimum}")]
    StartValueTooLow { game: &'static str, minimum: u64 },
}

pub const DELAY_FLOOR_SECS: f64 = 1.0;
pub const DELAY_CEILING_SECS: f64 = 10.0;
pub const MIN_START_VALUE: u64 = 50;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    pub delay_min: f64,
    pub delay_max: f64,
    pub captcha_restart_min: f64,
    pub captcha_restart_max: f64,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            delay_min: 1.7,
            delay_max: 2.7,
            captcha_restart_min: 3.7,
            captcha_restart_max: 5.6,
        }
    }
}

impl SecuritySettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.delay_min >= self.delay_max {
            return Err(ValidationError::DelayOrder);
        }
        if self.delay_min < DELAY_FLOOR_SECS || self.delay_max > DELAY_CEILING_SECS {
            return Err(ValidationError::DelayRange {
                min: DELAY_FLOOR_SECS,
                max: DELAY_CEILING_SECS,
            });
        }
        Ok(())
    }

    /// Anti-detection switches are always sent disabled.
    pub fn to_payload(&self) -> Value {
        json!({
            "delay_min": self.delay_min,
            "delay_max": self.delay_max,
            "captcha_restart_min": self.captcha_restart_min,
            "captcha_restart_max": self.captcha_restart_max,
            "typing_indicator": false,
            "random_delays": false,
            "silent_mode": false
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalSystem {
    pub enabled: bool,
    pub amount: u64,
}

impl Default for GoalSystem {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GambleGame {
    pub enabled: bool,
    pub start_value: u64,
    pub multiplier_on_lose: f64,
    pub cooldown: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Default for GambleGame {
    fn default() -> Self {
        Self {
            enabled: false,
            start_value: 200,
            multiplier_on_lose: 2.0,
            cooldown: [16.0, 18.0],
            options: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GamblingSettings {
    pub allotted_amount: u64,
    pub goal_system: GoalSystem,
    pub coinflip: GambleGame,
    pub slots: GambleGame,
}

impl Default for GamblingSettings {
    fn default() -> Self {
        Self {
            allotted_amount: 30_000,
            goal_system: GoalSystem::default(),
            coinflip: GambleGame {
                options: Some(vec!["t".to_string()]),
                ..GambleGame::default()
            },
            slots: GambleGame::default(),
        }
    }
}

impl GamblingSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (game, settings) in [("Coinflip", &self.coinflip), ("Slots", &self.slots)] {
            if settings.start_value < MIN_START_VALUE {
                return Err(ValidationError::StartValueTooLow {
                    game,
                    minimum: MIN_START_VALUE,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoUseGems {
    pub enabled: bool,
    pub cooldown_minutes: f64,
    pub use_lowest_first: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoInvestEssence {
    pub enabled: bool,
    pub cooldown_minutes: f64,
    pub min_essence_required: u64,
    pub max_efficiency_level: u64,
    pub max_duration_level: u64,
    pub max_investment_per_time: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields the form does not edit (tiers, gemTypes, ...) ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoEnhanceSettings {
    pub enabled: bool,
    pub auto_use_gems: AutoUseGems,
    pub auto_invest_essence: AutoInvestEssence,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::ApiClientConfig;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> DashboardClient {
        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        DashboardClient::new(config).unwrap()
    }

    #[test]
    fn security_rejects_inverted_and_out_of_range_delays() {
        let mut settings = SecuritySettings::default();
        assert!(settings.validate().is_ok());

        settings.delay_min = 3.0;
        settings.delay_max = 3.0;
        assert_eq!(settings.validate(), Err(ValidationError::DelayOrder));

        settings.delay_min = 0.5;
        settings.delay_max = 2.0;
        assert!(matches!(settings.validate(), Err(ValidationError::DelayRange { .. })));

        settings.delay_min = 2.0;
        settings.delay_max = 10.5;
        assert!(matches!(settings.validate(), Err(ValidationError::DelayRange { .. })));

        settings.delay_min = 1.0;
        settings.delay_max = 10.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn gambling_rejects_low_start_values() {
        let mut settings = GamblingSettings::default();
        assert!(settings.validate().is_ok());

        settings.slots.start_value = 49;
        assert_eq!(
            settings.validate(),
            Err(ValidationError::StartValueTooLow { game: "Slots", minimum: 50 })
        );

        settings.slots.start_value = 50;
        settings.coinflip.start_value = 10;
        assert_eq!(
            settings.validate(),
            Err(ValidationError::StartValueTooLow { game: "Coinflip", minimum: 50 })
        );
    }

    #[test]
    fn quick_settings_read_from_global_document() {
        let document = json!({
            "commands": { "hunt": { "enabled": true }, "battle": { "enabled": false }, "owo": { "enabled": true } },
            "autoDaily": true,
            "channelSwitcher": { "enabled": true }
        });
        let quick = QuickSettings::from_global(&document);
        assert!(quick.hunt);
        assert!(!quick.battle);
        assert!(quick.daily);
        assert!(quick.owo);
        assert!(quick.channel_switcher);
        assert!(!quick.use_slash_commands);
    }

    #[test]
    fn autoenhance_round_trips_unknown_fields() {
        let document = json!({
            "enabled": true,
            "autoUseGems": { "enabled": true, "cooldownMinutes": 10, "useLowestFirst": false, "tiers": { "fabled": false } },
            "autoInvestEssence": { "enabled": false, "minEssenceRequired": 100 },
            "futureFlag": 7
        });
        let parsed: AutoEnhanceSettings = serde_json::from_value(document).unwrap();
        assert_eq!(parsed.extra.get("futureFlag"), Some(&json!(7)));

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back.pointer("/autoUseGems/tiers/fabled"), Some(&json!(false)));
        assert_eq!(back.pointer("/autoInvestEssence/minEssenceRequired"), Some(&json!(100)));
    }

    #[tokio::test]
    async fn posts_quick_toggle_with_backend_command_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/dashboard/quick-toggle")
                .json_body(json!({ "command": "useSlashCommands", "enabled": true }));
            then.status(200)
                .json_body(json!({ "status": "success", "message": "useSlashCommands toggled successfully" }));
        });

        let result = client_for(&server)
            .quick_toggle(QuickToggle::SlashCommands, true)
            .await
            .unwrap();
        mock.assert();
        assert_eq!(result.message_or(""), "useSlashCommands toggled successfully");
    }

    #[tokio::test]
    async fn invalid_security_settings_never_reach_the_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/dashboard/security-settings");
            then.status(200).json_body(json!({ "success": true, "message": "saved" }));
        });

        let settings = SecuritySettings {
            delay_min: 5.0,
            delay_max: 4.0,
            ..SecuritySettings::default()
        };
        let err = client_for(&server)
            .save_security_settings(&settings)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(ValidationError::DelayOrder)));
        mock.assert_hits(0);
    }

    #[test]
    fn stored_anti_detection_flags_are_not_echoed_back() {
        let loaded: SecuritySettings = serde_json::from_value(json!({
            "delay_min": 2.0,
            "delay_max": 4.0,
            "silent_mode": true,
            "typing_indicator": true
        }))
        .unwrap();
        let payload = loaded.to_payload();
        assert_eq!(payload["delay_min"], json!(2.0));
        assert_eq!(payload["silent_mode"], json!(false));
        assert_eq!(payload["typing_indicator"], json!(false));
    }

    #[tokio::test]
    async fn saves_security_settings_with_forced_flags() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/dashboard/security-settings")
                .json_body(json!({
                    "delay_min": 1.7,
                    "delay_max": 2.7,
                    "captcha_restart_min": 3.7,
                    "captcha_restart_max": 5.6,
                    "typing_indicator": false,
                    "random_delays": false,
                    "silent_mode": false
                }));
            then.status(200)
                .json_body(json!({ "success": true, "message": "Security settings saved successfully" }));
        });

        let result = client_for(&server)
            .save_security_settings(&SecuritySettings::default())
            .await
            .unwrap();
        mock.assert();
        assert_eq!(
            result.message.as_deref(),
            Some("Security settings saved successfully")
        );
    }
}
