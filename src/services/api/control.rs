use super::dashboard::DashboardClient;
use super::http::ApiError;
use super::settings::ActionResult;
use std::fmt;

impl DashboardClient {
    pub async fn terminate(&self) -> Result<ActionResult, ApiError> {
        self.http.post_empty("/api/dashboard/terminate").await
    }

    /// Older backends expose start/stop/restart instead of terminate.
    pub async fn control(&self, action: ControlAction) -> Result<ActionResult, ApiError> {
        let path = format!("/api/dashboard/control/{}", action.as_str());
        self.http.post_empty(&path).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    Restart,
}

impl ControlAction {
    pub const ALL: [ControlAction; 3] = [ControlAction::Start, ControlAction::Stop, ControlAction::Restart];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAction::Start => "start",
            ControlAction::Stop => "stop",
            ControlAction::Restart => "restart",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::Start => write!(f, "Start"),
            ControlAction::Stop => write!(f, "Stop"),
            ControlAction::Restart => write!(f, "Restart"),
        }
    }
}
