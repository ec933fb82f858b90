use crate::services::api::BotStatusPayload;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BotState {
    #[default]
    Connecting,
    Online,
    Offline,
    Captcha,
    Paused,
    Other(String),
}

impl fmt::Display for BotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotState::Connecting => write!(f, "Connecting..."),
            BotState::Online => write!(f, "Online"),
            BotState::Offline => write!(f, "Offline"),
            BotState::Captcha => write!(f, "Captcha Detected"),
            BotState::Paused => write!(f, "Paused"),
            BotState::Other(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub state: BotState,
    pub captcha_detected: bool,
    pub connected: bool,
    pub active_accounts: Option<u32>,
    pub total_accounts: Option<u32>,
}

impl StatusView {
    pub fn from_payload(payload: &BotStatusPayload) -> Self {
        let raw = payload.status.as_str();
        let state = if raw == "captcha" || payload.captcha_detected {
            BotState::Captcha
        } else if raw == "paused" || payload.is_sleeping {
            BotState::Paused
        } else {
            match raw {
                "online" => BotState::Online,
                "offline" => BotState::Offline,
                other => BotState::Other(other.to_string()),
            }
        };

        Self {
            state,
            captcha_detected: payload.captcha_detected,
            connected: raw == "online" && !payload.captcha_detected && !payload.is_sleeping,
            active_accounts: payload.active_accounts,
            total_accounts: payload.total_accounts,
        }
    }

    /// Keeps the last known account counts.
    pub fn force_offline(&mut self) {
        self.state = BotState::Offline;
        self.captcha_detected = false;
        self.connected = false;
    }
}
