use super::section::Section;
use super::timers::{PollingHandle, TimerName};
use crate::services::api::{
    ActionResult,
    ActivityItem,
    AnalyticsReport,
    ApiError,
    AutoEnhanceSettings,
    BotStatusPayload,
    CommandLogPage,
    CommandLogQuery,
    ConsoleLogEntry,
    ControlAction,
    DashboardStats,
    GamblingSettings,
    QuickSettings,
    QuickToggle,
    SecuritySettings,
};
use serde_json::Value;
use std::time::Duration;

/// Which parts of the stats snapshot a stats fetch is allowed to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsTarget {
    Full,
    NavbarOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Bootstrap(CommandLogQuery),
    Status,
    Stats(StatsTarget),
    Activity,
    CommandLogs(CommandLogQuery),
    ConsoleLogs,
    Analytics,
    GlobalSettings,
    QuickSettings,
    QuickToggle { toggle: QuickToggle, enabled: bool },
    LoadSecurity,
    SaveSecurity(SecuritySettings),
    LoadGambling,
    SaveGambling(GamblingSettings),
    LoadAutoEnhance,
    SaveAutoEnhance(AutoEnhanceSettings),
    Terminate,
    Control(ControlAction),
}

/// What was current when a request left; used to drop stale responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub scope: Option<Section>,
    pub query: Option<CommandLogQuery>,
}

impl RequestContext {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn scoped(section: Section) -> Self {
        Self {
            scope: Some(section),
            query: None,
        }
    }

    pub fn with_query(mut self, query: CommandLogQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn is_current(&self, section: Section, query: &CommandLogQuery) -> bool {
        let section_matches = self.scope.map_or(true, |scope| scope == section);
        let query_matches = self.query.as_ref().map_or(true, |captured| captured == query);
        section_matches && query_matches
    }
}

/// Failure as seen by the controller: a detail for logs and, when the
/// server or validation supplied one, a message fit for a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestError {
    pub detail: String,
    pub user_message: Option<String>,
}

impl RequestError {
    pub fn message_or(&self, fallback: &str) -> String {
        self.user_message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<ApiError> for RequestError {
    fn from(err: ApiError) -> Self {
        let user_message = match &err {
            ApiError::Invalid(validation) => Some(validation.to_string()),
            other => other.server_message(),
        };
        Self {
            detail: err.to_string(),
            user_message,
        }
    }
}

pub type Outcome<T> = Result<T, RequestError>;

#[derive(Debug, Clone)]
pub struct BootstrapData {
    pub status: BotStatusPayload,
    pub settings: Value,
    pub stats: DashboardStats,
    pub command_logs: CommandLogPage,
    pub quick: QuickSettings,
}

#[derive(Debug, Clone)]
pub enum ApiOutcome {
    Bootstrap(Outcome<BootstrapData>),
    Status(Outcome<BotStatusPayload>),
    Stats(StatsTarget, Outcome<DashboardStats>),
    Activity(Outcome<Vec<ActivityItem>>),
    CommandLogs(Outcome<CommandLogPage>),
    ConsoleLogs(Outcome<Vec<ConsoleLogEntry>>),
    Analytics(Outcome<AnalyticsReport>),
    GlobalSettings(Outcome<Value>),
    QuickSettings(Outcome<QuickSettings>),
    QuickToggle {
        toggle: QuickToggle,
        enabled: bool,
        result: Outcome<ActionResult>,
    },
    SecurityLoaded(Outcome<SecuritySettings>),
    SecuritySaved(Outcome<ActionResult>),
    GamblingLoaded(Outcome<GamblingSettings>),
    GamblingSaved(Outcome<ActionResult>),
    AutoEnhanceLoaded(Outcome<AutoEnhanceSettings>),
    AutoEnhanceSaved(Outcome<ActionResult>),
    Terminated(Outcome<ActionResult>),
    Control(ControlAction, Outcome<ActionResult>),
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    TimerFired(TimerName),
    Response {
        context: RequestContext,
        outcome: ApiOutcome,
    },
}

/// Seam between the controller and whatever runs requests and tickers.
pub trait Dispatcher {
    fn dispatch(&self, request: ApiRequest, context: RequestContext);
    fn schedule(&self, name: TimerName, period: Duration) -> PollingHandle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::ValidationError;
    use reqwest::StatusCode;

    #[test]
    fn global_context_is_always_current() {
        let context = RequestContext::global();
        assert!(context.is_current(Section::Security, &CommandLogQuery::default()));
    }

    #[test]
    fn scoped_context_tracks_section_and_filter() {
        let query = CommandLogQuery::default();
        let context = RequestContext::scoped(Section::Logs).with_query(query.clone());
        assert!(context.is_current(Section::Logs, &query));
        assert!(!context.is_current(Section::Overview, &query));

        let narrowed = CommandLogQuery {
            log_type: "hunt".into(),
            ..CommandLogQuery::default()
        };
        assert!(!context.is_current(Section::Logs, &narrowed));
    }

    #[test]
    fn request_error_keeps_validation_text_for_users() {
        let err = RequestError::from(ApiError::Invalid(ValidationError::DelayOrder));
        assert_eq!(
            err.message_or("fallback"),
            "Minimum delay must be less than maximum delay"
        );

        let http = RequestError::from(ApiError::HttpStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "oops".into(),
        });
        assert_eq!(http.message_or("Failed to update setting"), "Failed to update setting");
        assert!(http.detail.contains("500"));
    }
}
