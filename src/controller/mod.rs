mod forms;
mod logs;
mod notifications;
mod requests;
mod section;
mod status;
mod timers;
mod toggles;

pub use forms::{FormState, SettingsForm};
pub use logs::{
    account_options,
    render_export,
    write_export,
    BoundedLog,
    ConsoleLine,
    ExportError,
    LogCategory,
    LogEntry,
    Segment,
    SpanStyle,
    COMMAND_LOG_CAPACITY,
    CONSOLE_LOG_CAPACITY,
};
pub use notifications::{Notice, NoticeKind, NotificationCenter};
pub use requests::{
    ApiOutcome,
    ApiRequest,
    AppEvent,
    BootstrapData,
    Dispatcher,
    Outcome,
    RequestContext,
    RequestError,
    StatsTarget,
};
pub use section::{Section, SectionChange};
pub use status::{BotState, StatusView};
pub use timers::{PollingHandle, TimerName, TimerRegistry};
pub use toggles::{ToggleBoard, ToggleState};

use crate::config::{AppConfig, FeatureFlags, PollIntervals, ResumePolicy};
use crate::services::api::{
    ActionResult,
    ActivityItem,
    AnalyticsReport,
    AutoEnhanceSettings,
    CommandLogPage,
    CommandLogQuery,
    ControlAction,
    DashboardStats,
    GamblingSettings,
    QuickSettings,
    QuickToggle,
    SecuritySettings,
};
use chrono::Local;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const TOGGLE_NOTICE: Duration = Duration::from_secs(2);
const CAPTCHA_NOTICE: Duration = Duration::from_secs(10);

/// Which part of the view a handled event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Nothing,
    Dashboard,
    Status,
    Stats,
    Navbar,
    Uptime,
    Activity,
    CommandLogs,
    ConsoleLogs,
    Analytics,
    Settings,
    Toggles,
    Form(SettingsForm),
    Notice,
}

/// Destructive actions that wait for a yes/no answer from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Terminate,
    ResetSecurity,
}

impl Confirmation {
    pub fn title(self) -> &'static str {
        match self {
            Confirmation::Terminate => "Terminate bot",
            Confirmation::ResetSecurity => "Reset security settings",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Confirmation::Terminate => "Terminate all running bot instances now?",
            Confirmation::ResetSecurity => {
                "Are you sure you want to reset all security settings to defaults?"
            }
        }
    }

    pub fn accept_label(self) -> &'static str {
        match self {
            Confirmation::Terminate => "Terminate",
            Confirmation::ResetSecurity => "Reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogViewOptions {
    pub show_timestamps: bool,
    pub auto_scroll: bool,
}

impl Default for LogViewOptions {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            auto_scroll: true,
        }
    }
}

/// Section lifecycle, polling timers and every piece of state the views render.
///
/// Owned by a single thread. Network work goes through the [`Dispatcher`] and
/// comes back as [`AppEvent`]s passed to [`Controller::handle_event`].
pub struct Controller {
    dispatcher: Box<dyn Dispatcher>,
    intervals: PollIntervals,
    features: FeatureFlags,
    resume_policy: ResumePolicy,
    export_dir: PathBuf,

    section: Section,
    timers: TimerRegistry,
    hidden: bool,
    suspended: Vec<TimerName>,

    status: StatusView,
    captcha_notified: bool,
    stats: DashboardStats,
    stats_error: Option<String>,
    navbar_balance: i64,
    uptime_secs: u64,
    activity: Vec<ActivityItem>,
    activity_error: Option<String>,

    log_query: CommandLogQuery,
    log_view: LogViewOptions,
    command_logs: BoundedLog<LogEntry>,
    log_counts: (u64, u64),
    log_error: Option<String>,
    accounts: Vec<(String, String)>,
    console: BoundedLog<ConsoleLine>,

    analytics: Option<AnalyticsReport>,
    analytics_error: Option<String>,

    settings_document: Option<Value>,
    toggles: ToggleBoard,
    security: FormState<SecuritySettings>,
    gambling: FormState<GamblingSettings>,
    autoenhance: FormState<AutoEnhanceSettings>,

    terminate_bound: bool,
    terminating: bool,
    pending_confirmation: Option<Confirmation>,

    notifications: NotificationCenter,
}

impl Controller {
    pub fn new(config: &AppConfig, dispatcher: Box<dyn Dispatcher>) -> Self {
        let log_query = CommandLogQuery {
            limit: config.command_log_limit,
            ..CommandLogQuery::default()
        };

        Self {
            dispatcher,
            intervals: config.poll.clone(),
            features: config.features.clone(),
            resume_policy: config.resume_policy,
            export_dir: config.export_dir(),
            section: Section::default(),
            timers: TimerRegistry::default(),
            hidden: false,
            suspended: Vec::new(),
            status: StatusView::default(),
            captcha_notified: false,
            stats: DashboardStats::default(),
            stats_error: None,
            navbar_balance: 0,
            uptime_secs: 0,
            activity: Vec::new(),
            activity_error: None,
            log_query,
            log_view: LogViewOptions::default(),
            command_logs: BoundedLog::new(COMMAND_LOG_CAPACITY),
            log_counts: (0, 0),
            log_error: None,
            accounts: Vec::new(),
            console: BoundedLog::new(CONSOLE_LOG_CAPACITY),
            analytics: None,
            analytics_error: None,
            settings_document: None,
            toggles: ToggleBoard::default(),
            security: FormState::default(),
            gambling: FormState::default(),
            autoenhance: FormState::default(),
            terminate_bound: false,
            terminating: false,
            pending_confirmation: None,
            notifications: NotificationCenter::new(config.notification_duration()),
        }
    }

    /// Loads the initial snapshot and starts the default timers.
    pub fn bootstrap(&mut self) {
        info!("bootstrapping dashboard");
        self.dispatcher.dispatch(
            ApiRequest::Bootstrap(self.log_query.clone()),
            RequestContext::global(),
        );
        for name in TimerName::DEFAULT_SET {
            self.start_timer(name);
        }
    }

    // ----- accessors -------------------------------------------------------

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.features
    }

    pub fn active_timers(&self) -> Vec<TimerName> {
        self.timers.active()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn status(&self) -> &StatusView {
        &self.status
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn stats_error(&self) -> Option<&str> {
        self.stats_error.as_deref()
    }

    pub fn navbar_balance(&self) -> i64 {
        self.navbar_balance
    }

    pub fn uptime_secs(&self) -> u64 {
        self.uptime_secs
    }

    pub fn activity(&self) -> &[ActivityItem] {
        &self.activity
    }

    pub fn activity_error(&self) -> Option<&str> {
        self.activity_error.as_deref()
    }

    pub fn log_query(&self) -> &CommandLogQuery {
        &self.log_query
    }

    pub fn log_view_mut(&mut self) -> &mut LogViewOptions {
        &mut self.log_view
    }

    pub fn log_view(&self) -> LogViewOptions {
        self.log_view
    }

    pub fn command_logs(&self) -> &BoundedLog<LogEntry> {
        &self.command_logs
    }

    /// `(total, filtered)` as reported by the backend.
    pub fn log_counts(&self) -> (u64, u64) {
        self.log_counts
    }

    pub fn log_error(&self) -> Option<&str> {
        self.log_error.as_deref()
    }

    pub fn accounts(&self) -> &[(String, String)] {
        &self.accounts
    }

    pub fn console(&self) -> &BoundedLog<ConsoleLine> {
        &self.console
    }

    pub fn analytics(&self) -> Option<&AnalyticsReport> {
        self.analytics.as_ref()
    }

    pub fn analytics_error(&self) -> Option<&str> {
        self.analytics_error.as_deref()
    }

    pub fn settings_document(&self) -> Option<&Value> {
        self.settings_document.as_ref()
    }

    pub fn toggle_state(&self, toggle: QuickToggle) -> ToggleState {
        self.toggles.state(toggle)
    }

    pub fn security(&self) -> &FormState<SecuritySettings> {
        &self.security
    }

    pub fn security_mut(&mut self) -> &mut SecuritySettings {
        &mut self.security.draft
    }

    pub fn gambling(&self) -> &FormState<GamblingSettings> {
        &self.gambling
    }

    pub fn gambling_mut(&mut self) -> &mut GamblingSettings {
        &mut self.gambling.draft
    }

    pub fn autoenhance(&self) -> &FormState<AutoEnhanceSettings> {
        &self.autoenhance
    }

    pub fn autoenhance_mut(&mut self) -> &mut AutoEnhanceSettings {
        &mut self.autoenhance.draft
    }

    pub fn terminate_available(&self) -> bool {
        self.terminate_bound
    }

    pub fn pending_confirmation(&self) -> Option<Confirmation> {
        self.pending_confirmation
    }

    pub fn is_terminating(&self) -> bool {
        self.terminating
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    // ----- sections --------------------------------------------------------

    /// Makes `target` the current section and loads it. Disabled sections are refused.
    pub fn switch_section(&mut self, target: Section) -> Option<SectionChange> {
        if !target.is_enabled(&self.features) {
            warn!(section = %target, "section is disabled by configuration");
            return None;
        }

        let previous = self.section;
        if previous == Section::Logs && target != Section::Logs {
            self.stop_timer(TimerName::Logs);
        }
        if previous == Section::Analytics && target != Section::Analytics {
            self.stop_timer(TimerName::Analytics);
        }

        self.section = target;
        debug!(from = %previous, to = %target, "section changed");
        self.load_section(target);

        Some(SectionChange {
            previous,
            current: target,
        })
    }

    fn load_section(&mut self, section: Section) {
        match section {
            Section::Overview => {
                self.request_scoped(ApiRequest::Stats(StatsTarget::Full), Section::Overview);
                self.request_scoped(ApiRequest::Activity, Section::Overview);
            }
            Section::Logs => {
                self.start_timer(TimerName::Logs);
                self.request_scoped(ApiRequest::ConsoleLogs, Section::Logs);
                self.reload_command_logs();
            }
            Section::Commands => {
                self.request_scoped(ApiRequest::GlobalSettings, Section::Commands);
                self.dispatcher
                    .dispatch(ApiRequest::QuickSettings, RequestContext::global());
                if !self.terminate_bound {
                    self.terminate_bound = true;
                    debug!("terminate control bound");
                }
            }
            Section::Security => self.request_scoped(ApiRequest::LoadSecurity, Section::Security),
            Section::Gambling => self.request_scoped(ApiRequest::LoadGambling, Section::Gambling),
            Section::AutoEnhance => {
                self.request_scoped(ApiRequest::LoadAutoEnhance, Section::AutoEnhance)
            }
            Section::Analytics => {
                self.stop_timer(TimerName::Analytics);
                self.start_timer(TimerName::Analytics);
                self.request_scoped(ApiRequest::Analytics, Section::Analytics);
            }
        }
    }

    fn request_scoped(&self, request: ApiRequest, section: Section) {
        self.dispatcher
            .dispatch(request, RequestContext::scoped(section));
    }

    // ----- timers ----------------------------------------------------------

    fn start_timer(&mut self, name: TimerName) {
        let period = name.period(&self.intervals);
        let dispatcher = &self.dispatcher;
        if self
            .timers
            .start_with(name, || dispatcher.schedule(name, period))
        {
            debug!(timer = %name, ?period, "timer started");
        }
    }

    fn stop_timer(&mut self, name: TimerName) {
        if self.timers.stop(name) {
            debug!(timer = %name, "timer stopped");
        }
    }

    /// Every timer the window can run, used by the full resume policy.
    /// Wider than the default set: logs and analytics come back too and idle
    /// on their fire-time section check.
    fn full_timer_set(&self) -> Vec<TimerName> {
        let mut names = TimerName::DEFAULT_SET.to_vec();
        names.push(TimerName::Logs);
        if self.features.analytics {
            names.push(TimerName::Analytics);
        }
        names
    }

    /// Hidden windows keep only the reserved timer running.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == !self.hidden {
            return;
        }

        if !visible {
            self.suspended = self.timers.stop_all_except(TimerName::RESERVED);
            self.hidden = true;
            info!(paused = self.suspended.len(), "window hidden, polling paused");
            return;
        }

        self.hidden = false;
        let resume = match self.resume_policy {
            ResumePolicy::Full => self.full_timer_set(),
            ResumePolicy::Previous => std::mem::take(&mut self.suspended),
        };
        self.suspended.clear();
        for name in resume {
            self.start_timer(name);
        }
        info!(active = self.timers.len(), "window visible, polling resumed");
    }

    fn on_timer(&mut self, name: TimerName) -> Rendered {
        if !self.timers.contains(name) {
            // Tick that was already in flight when its timer stopped.
            return Rendered::Nothing;
        }

        match name {
            TimerName::Stats if self.section == Section::Overview => {
                self.request_scoped(ApiRequest::Stats(StatsTarget::Full), Section::Overview);
            }
            TimerName::Activity if self.section == Section::Overview => {
                self.request_scoped(ApiRequest::Activity, Section::Overview);
            }
            TimerName::CommandLogs if self.section == Section::Logs => {
                self.reload_command_logs();
            }
            TimerName::Logs if self.section == Section::Logs => {
                self.request_scoped(ApiRequest::ConsoleLogs, Section::Logs);
            }
            TimerName::Analytics if self.section == Section::Analytics => {
                self.request_scoped(ApiRequest::Analytics, Section::Analytics);
            }
            TimerName::Status => {
                self.dispatcher
                    .dispatch(ApiRequest::Status, RequestContext::global());
            }
            TimerName::Navbar => {
                self.dispatcher.dispatch(
                    ApiRequest::Stats(StatsTarget::NavbarOnly),
                    RequestContext::global(),
                );
            }
            TimerName::Uptime => {
                self.uptime_secs = self.uptime_secs.saturating_add(1);
                return Rendered::Uptime;
            }
            _ => {}
        }
        Rendered::Nothing
    }

    // ----- events ----------------------------------------------------------

    pub fn handle_event(&mut self, event: AppEvent) -> Rendered {
        match event {
            AppEvent::TimerFired(name) => self.on_timer(name),
            AppEvent::Response { context, outcome } => {
                if !context.is_current(self.section, &self.log_query) {
                    debug!(?context, current = %self.section, "dropping stale response");
                    return Rendered::Nothing;
                }
                self.apply(outcome)
            }
        }
    }

    fn apply(&mut self, outcome: ApiOutcome) -> Rendered {
        match outcome {
            ApiOutcome::Bootstrap(Ok(data)) => {
                self.apply_status(StatusView::from_payload(&data.status));
                self.toggles.apply(&QuickSettings::from_global(&data.settings));
                self.settings_document = Some(data.settings);
                self.apply_stats(data.stats);
                self.apply_command_logs(data.command_logs);
                self.toggles.apply(&data.quick);
                info!("dashboard loaded");
                self.notifications
                    .push(NoticeKind::Success, "Dashboard loaded");
                Rendered::Dashboard
            }
            ApiOutcome::Bootstrap(Err(err)) => {
                error!(error = %err.detail, "failed to initialize dashboard");
                self.status.force_offline();
                self.notifications.push(
                    NoticeKind::Error,
                    err.message_or("Failed to load dashboard"),
                );
                Rendered::Dashboard
            }
            ApiOutcome::Status(Ok(payload)) => {
                self.apply_status(StatusView::from_payload(&payload));
                Rendered::Status
            }
            ApiOutcome::Status(Err(err)) => {
                error!(error = %err.detail, "failed to load bot status");
                self.status.force_offline();
                Rendered::Status
            }
            ApiOutcome::Stats(StatsTarget::Full, Ok(stats)) => {
                self.stats_error = None;
                self.apply_stats(stats);
                Rendered::Stats
            }
            ApiOutcome::Stats(StatsTarget::Full, Err(err)) => {
                error!(error = %err.detail, "failed to load stats");
                self.apply_stats(DashboardStats::default());
                self.stats_error = Some(err.message_or("Failed to load stats"));
                Rendered::Stats
            }
            ApiOutcome::Stats(StatsTarget::NavbarOnly, Ok(stats)) => {
                self.navbar_balance = stats.balance;
                self.uptime_secs = stats.uptime;
                Rendered::Navbar
            }
            ApiOutcome::Stats(StatsTarget::NavbarOnly, Err(err)) => {
                debug!(error = %err.detail, "navbar refresh failed");
                Rendered::Nothing
            }
            ApiOutcome::Activity(Ok(items)) => {
                self.activity = items;
                self.activity_error = None;
                Rendered::Activity
            }
            ApiOutcome::Activity(Err(err)) => {
                error!(error = %err.detail, "failed to load recent activity");
                self.activity_error = Some("Failed to load activity".to_string());
                Rendered::Activity
            }
            ApiOutcome::CommandLogs(Ok(page)) => {
                self.apply_command_logs(page);
                Rendered::CommandLogs
            }
            ApiOutcome::CommandLogs(Err(err)) => {
                error!(error = %err.detail, "failed to load command logs");
                self.log_error = Some("Failed to load command logs".to_string());
                Rendered::CommandLogs
            }
            ApiOutcome::ConsoleLogs(Ok(entries)) => {
                self.console
                    .replace(entries.into_iter().map(ConsoleLine::from));
                Rendered::ConsoleLogs
            }
            ApiOutcome::ConsoleLogs(Err(err)) => {
                error!(error = %err.detail, "failed to fetch console logs");
                self.console.push(ConsoleLine::local(
                    "error",
                    format!("Failed to fetch logs: {}", err.detail),
                ));
                Rendered::ConsoleLogs
            }
            ApiOutcome::Analytics(Ok(report)) => {
                self.analytics = Some(report);
                self.analytics_error = None;
                Rendered::Analytics
            }
            ApiOutcome::Analytics(Err(err)) => {
                error!(error = %err.detail, "failed to load analytics");
                self.analytics_error = Some("Failed to load analytics".to_string());
                Rendered::Analytics
            }
            ApiOutcome::GlobalSettings(Ok(document)) => {
                self.toggles.apply(&QuickSettings::from_global(&document));
                self.settings_document = Some(document);
                Rendered::Settings
            }
            ApiOutcome::GlobalSettings(Err(err)) => {
                error!(error = %err.detail, "failed to load settings");
                self.notifications
                    .push(NoticeKind::Error, err.message_or("Failed to load settings"));
                Rendered::Notice
            }
            ApiOutcome::QuickSettings(Ok(quick)) => {
                self.toggles.apply(&quick);
                Rendered::Toggles
            }
            ApiOutcome::QuickSettings(Err(err)) => {
                error!(error = %err.detail, "failed to load quick settings");
                Rendered::Nothing
            }
            ApiOutcome::QuickToggle {
                toggle,
                enabled,
                result,
            } => self.finish_toggle(toggle, enabled, result),
            ApiOutcome::SecurityLoaded(result) => {
                self.populate_form(SettingsForm::Security, result, |c, v| c.security.populate(v))
            }
            ApiOutcome::GamblingLoaded(result) => {
                self.populate_form(SettingsForm::Gambling, result, |c, v| c.gambling.populate(v))
            }
            ApiOutcome::AutoEnhanceLoaded(result) => self.populate_form(
                SettingsForm::AutoEnhance,
                result,
                |c, v| c.autoenhance.populate(v),
            ),
            ApiOutcome::SecuritySaved(result) => self.finish_save(SettingsForm::Security, result),
            ApiOutcome::GamblingSaved(result) => self.finish_save(SettingsForm::Gambling, result),
            ApiOutcome::AutoEnhanceSaved(result) => {
                self.finish_save(SettingsForm::AutoEnhance, result)
            }
            ApiOutcome::Terminated(result) => {
                self.terminating = false;
                match result {
                    Ok(body) if body.error.is_none() => {
                        info!("terminate signal sent");
                        self.notifications
                            .push(NoticeKind::Success, body.message_or("Terminate signal sent"));
                    }
                    Ok(body) => {
                        warn!(error = ?body.error, "terminate rejected by server");
                        self.notifications.push(
                            NoticeKind::Error,
                            body.error
                                .unwrap_or_else(|| "Failed to terminate bot".to_string()),
                        );
                    }
                    Err(err) => {
                        error!(error = %err.detail, "terminate failed");
                        self.notifications
                            .push(NoticeKind::Error, "Failed to terminate bot");
                    }
                }
                Rendered::Notice
            }
            ApiOutcome::Control(action, result) => {
                match result {
                    Ok(body) if body.error.is_none() => {
                        info!(%action, "control action accepted");
                        self.notifications.push(
                            NoticeKind::Success,
                            body.message_or(&format!("Bot {action} requested")),
                        );
                    }
                    Ok(body) => {
                        warn!(%action, error = ?body.error, "control action rejected by server");
                        self.notifications.push(
                            NoticeKind::Error,
                            body.error
                                .unwrap_or_else(|| format!("Failed to {action} bot")),
                        );
                    }
                    Err(err) => {
                        error!(%action, error = %err.detail, "control action failed");
                        self.notifications.push(
                            NoticeKind::Error,
                            err.message_or(&format!("Failed to {action} bot")),
                        );
                    }
                }
                Rendered::Notice
            }
        }
    }

    fn apply_status(&mut self, view: StatusView) {
        if view.captcha_detected && !self.captcha_notified {
            warn!("captcha detected");
            self.notifications.push_for(
                NoticeKind::Error,
                "🚨 Captcha detected! Bot automatically stopped",
                CAPTCHA_NOTICE,
            );
            self.captcha_notified = true;
        } else if !view.captcha_detected {
            self.captcha_notified = false;
        }
        self.status = view;
    }

    fn apply_stats(&mut self, stats: DashboardStats) {
        self.navbar_balance = stats.balance;
        self.uptime_secs = stats.uptime;
        self.stats = stats;
    }

    fn apply_command_logs(&mut self, page: CommandLogPage) {
        self.command_logs
            .replace(page.logs.into_iter().map(LogEntry::from_record));
        self.accounts = account_options(self.command_logs.iter());
        self.log_counts = (page.total_count, page.filtered_count);
        self.log_error = None;
    }

    fn populate_form<T>(
        &mut self,
        form: SettingsForm,
        result: Outcome<T>,
        populate: impl FnOnce(&mut Self, T),
    ) -> Rendered {
        match result {
            Ok(value) => {
                populate(self, value);
                Rendered::Form(form)
            }
            Err(err) => {
                error!(%form, error = %err.detail, "failed to load settings form");
                self.notifications.push(
                    NoticeKind::Error,
                    format!("Failed to load {form} settings"),
                );
                Rendered::Notice
            }
        }
    }

    // ----- logs ------------------------------------------------------------

    pub fn reload_command_logs(&mut self) {
        let query = self.log_query.clone();
        self.dispatcher.dispatch(
            ApiRequest::CommandLogs(query.clone()),
            RequestContext::scoped(Section::Logs).with_query(query),
        );
    }

    /// Changes the type/account filter; in-flight pages for the old filter are discarded.
    pub fn set_log_filter(&mut self, log_type: impl Into<String>, account: impl Into<String>) {
        let log_type = log_type.into();
        let account = account.into();
        if self.log_query.log_type == log_type && self.log_query.account == account {
            return;
        }
        self.log_query.log_type = log_type;
        self.log_query.account = account;
        self.reload_command_logs();
    }

    pub fn clear_logs(&mut self) {
        self.command_logs.clear();
        self.console.clear();
        self.notifications.push(NoticeKind::Info, "Logs cleared");
    }

    /// Writes both log lists to a dated text file in the export directory.
    pub fn export_logs(&mut self) -> Option<PathBuf> {
        let contents = render_export(self.console.iter(), self.command_logs.iter());
        match write_export(&self.export_dir, Local::now(), &contents) {
            Ok(path) => {
                info!(path = %path.display(), "logs exported");
                self.notifications
                    .push(NoticeKind::Success, format!("Logs exported to {}", path.display()));
                Some(path)
            }
            Err(err) => {
                error!(error = %err, "log export failed");
                self.notifications
                    .push(NoticeKind::Error, "Failed to export logs");
                None
            }
        }
    }

    // ----- quick toggles ---------------------------------------------------

    /// Requests a toggle change. Returns false when the toggle is still busy.
    pub fn set_toggle(&mut self, toggle: QuickToggle, enabled: bool) -> bool {
        if !self.toggles.begin(toggle, enabled) {
            warn!(%toggle, "toggle change ignored while a request is pending");
            return false;
        }
        let verb = if enabled { "Enabling" } else { "Disabling" };
        self.notifications
            .push_for(NoticeKind::Info, format!("{verb} {toggle}..."), TOGGLE_NOTICE);
        self.dispatcher.dispatch(
            ApiRequest::QuickToggle { toggle, enabled },
            RequestContext::global(),
        );
        true
    }

    fn finish_toggle(
        &mut self,
        toggle: QuickToggle,
        enabled: bool,
        result: Outcome<ActionResult>,
    ) -> Rendered {
        match result {
            Ok(body) if body.error.is_none() => {
                self.toggles.finish(toggle, true);
                let state = if enabled { "enabled" } else { "disabled" };
                info!(%toggle, enabled, "toggle updated");
                self.notifications.push(
                    NoticeKind::Success,
                    body.message_or(&format!("{toggle} {state}")),
                );
                if self.section == Section::Logs {
                    self.reload_command_logs();
                }
            }
            Ok(body) => {
                self.toggles.finish(toggle, false);
                warn!(%toggle, "toggle rejected by server");
                self.notifications.push(
                    NoticeKind::Error,
                    body.error
                        .unwrap_or_else(|| "Failed to update setting".to_string()),
                );
            }
            Err(err) => {
                self.toggles.finish(toggle, false);
                error!(%toggle, error = %err.detail, "toggle request failed");
                self.notifications
                    .push(NoticeKind::Error, err.message_or("Failed to update setting"));
            }
        }
        Rendered::Toggles
    }

    // ----- settings forms --------------------------------------------------

    pub fn save_form(&mut self, form: SettingsForm) -> bool {
        let request = match form {
            SettingsForm::Security => self
                .security
                .draft
                .validate()
                .map(|()| ApiRequest::SaveSecurity(self.security.draft.clone())),
            SettingsForm::Gambling => self
                .gambling
                .draft
                .validate()
                .map(|()| ApiRequest::SaveGambling(self.gambling.draft.clone())),
            SettingsForm::AutoEnhance => {
                Ok(ApiRequest::SaveAutoEnhance(self.autoenhance.draft.clone()))
            }
        };

        let request = match request {
            Ok(request) => request,
            Err(err) => {
                warn!(%form, error = %err, "settings rejected before submit");
                self.notifications.push(NoticeKind::Error, err.to_string());
                return false;
            }
        };

        match form {
            SettingsForm::Security => self.security.saving = true,
            SettingsForm::Gambling => self.gambling.saving = true,
            SettingsForm::AutoEnhance => self.autoenhance.saving = true,
        }
        self.dispatcher.dispatch(request, RequestContext::global());
        true
    }

    /// Ctrl+S: saves whichever form the current section shows.
    pub fn save_current_form(&mut self) -> bool {
        match SettingsForm::for_section(self.section) {
            Some(form) => self.save_form(form),
            None => false,
        }
    }

    /// Asks before the stock security delays overwrite the saved ones.
    pub fn request_reset_security(&mut self) -> bool {
        if self.security.saving || self.pending_confirmation.is_some() {
            return false;
        }
        self.pending_confirmation = Some(Confirmation::ResetSecurity);
        true
    }

    /// Restores the stock security delays and saves them.
    fn reset_security(&mut self) -> bool {
        self.security.draft = SecuritySettings::default();
        self.save_form(SettingsForm::Security)
    }

    fn finish_save(&mut self, form: SettingsForm, result: Outcome<ActionResult>) -> Rendered {
        match form {
            SettingsForm::Security => self.security.saving = false,
            SettingsForm::Gambling => self.gambling.saving = false,
            SettingsForm::AutoEnhance => self.autoenhance.saving = false,
        }

        match result {
            Ok(body) if body.error.is_none() => {
                info!(%form, "settings saved");
                self.notifications
                    .push(NoticeKind::Success, body.message_or("Settings saved"));
                if self.section == Section::Logs {
                    self.reload_command_logs();
                }
            }
            Ok(body) => {
                warn!(%form, error = ?body.error, "settings rejected by server");
                self.notifications.push(
                    NoticeKind::Error,
                    body.error
                        .unwrap_or_else(|| format!("Failed to save {form} settings")),
                );
            }
            Err(err) => {
                error!(%form, error = %err.detail, "failed to save settings");
                self.notifications.push(
                    NoticeKind::Error,
                    err.message_or(&format!("Failed to save {form} settings")),
                );
            }
        }
        Rendered::Form(form)
    }

    // ----- commands section ------------------------------------------------

    /// Ctrl+R.
    pub fn refresh_stats(&mut self) {
        self.dispatcher.dispatch(
            ApiRequest::Stats(StatsTarget::Full),
            RequestContext::global(),
        );
    }

    /// Asks for confirmation; nothing is sent until [`Controller::confirm`].
    pub fn request_terminate(&mut self) -> bool {
        if !self.terminate_bound || self.terminating || self.pending_confirmation.is_some() {
            return false;
        }
        self.pending_confirmation = Some(Confirmation::Terminate);
        true
    }

    /// Answers the pending confirmation, running its action on yes.
    pub fn confirm(&mut self, confirmed: bool) {
        let Some(pending) = self.pending_confirmation.take() else {
            return;
        };
        if !confirmed {
            debug!(?pending, "confirmation declined");
            return;
        }
        match pending {
            Confirmation::Terminate => {
                self.terminating = true;
                warn!("sending terminate signal");
                self.dispatcher
                    .dispatch(ApiRequest::Terminate, RequestContext::global());
            }
            Confirmation::ResetSecurity => {
                info!("resetting security settings to defaults");
                self.reset_security();
            }
        }
    }

    pub fn control(&mut self, action: ControlAction) -> bool {
        if !self.features.legacy_control {
            warn!(%action, "legacy control is disabled by configuration");
            return false;
        }
        info!(%action, "sending control action");
        self.dispatcher
            .dispatch(ApiRequest::Control(action), RequestContext::global());
        true
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.timers.clear();
    }
}
