pub mod control;
pub mod dashboard;
pub mod http;
pub mod settings;

pub use control::ControlAction;
pub use dashboard::{
    AccountAnalytics,
    AccountStats,
    ActivityItem,
    AnalyticsReport,
    BotStatusPayload,
    CommandLogPage,
    CommandLogQuery,
    CommandLogRecord,
    ConsoleLogEntry,
    DashboardClient,
    DashboardStats,
};
pub use http::{ApiClientConfig, ApiError};
pub use settings::{
    ActionResult,
    AutoEnhanceSettings,
    GambleGame,
    GamblingSettings,
    QuickSettings,
    QuickToggle,
    SecuritySettings,
    ValidationError,
    DELAY_CEILING_SECS,
    DELAY_FLOOR_SECS,
    MIN_START_VALUE,
};
