use super::http::{ApiClientConfig, ApiError, HttpClient};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardClient {
    pub(super) http: Arc<HttpClient>,
}

impl DashboardClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: Arc::new(HttpClient::new(config)?),
        })
    }

    pub async fn status(&self) -> Result<BotStatusPayload, ApiError> {
        self.http.get_json("/api/dashboard/status").await
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.http.get_json("/api/dashboard/stats").await
    }

    pub async fn activity(&self) -> Result<Vec<ActivityItem>, ApiError> {
        self.http.get_json("/api/dashboard/activity").await
    }

    pub async fn command_logs(&self, query: &CommandLogQuery) -> Result<CommandLogPage, ApiError> {
        let params = [
            ("type", query.log_type.clone()),
            ("account", query.account.clone()),
            ("limit", query.limit.to_string()),
        ];
        self.http
            .get_with_query("/api/dashboard/command-logs", &params)
            .await
    }

    pub async fn console_logs(&self) -> Result<Vec<ConsoleLogEntry>, ApiError> {
        self.http.get_json("/api/dashboard/logs").await
    }

    pub async fn analytics(&self) -> Result<AnalyticsReport, ApiError> {
        self.http.get_json("/api/dashboard/analytics").await
    }
}

/// Account ids arrive as JSON numbers from some endpoints and strings from others.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Unsigned(value) => value.to_string(),
        RawId::Signed(value) => value.to_string(),
    })
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotStatusPayload {
    pub status: String,
    #[serde(default)]
    pub captcha_detected: bool,
    #[serde(default)]
    pub is_sleeping: bool,
    #[serde(default)]
    pub active_accounts: Option<u32>,
    #[serde(default)]
    pub total_accounts: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub balance: i64,
    pub balance_formatted: Option<String>,
    pub hunts_today: u64,
    pub battles_today: u64,
    pub uptime: u64,
    pub commands_executed: u64,
    pub captchas_solved: u64,
    pub accounts: Vec<AccountStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountStats {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub user_display: String,
    #[serde(default)]
    pub cowoncy_formatted: String,
    #[serde(default)]
    pub captchas: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityItem {
    #[serde(rename = "type", default = "default_activity_kind")]
    pub kind: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub message: String,
    #[serde(default)]
    pub time: String,
}

fn default_activity_kind() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLogQuery {
    pub log_type: String,
    pub account: String,
    pub limit: u32,
}

impl Default for CommandLogQuery {
    fn default() -> Self {
        Self {
            log_type: "all".to_string(),
            account: "all".to_string(),
            limit: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandLogPage {
    pub logs: Vec<CommandLogRecord>,
    pub total_count: u64,
    pub filtered_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandLogRecord {
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<String>,
    #[serde(default)]
    pub account_display: Option<String>,
    #[serde(default)]
    pub command_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub formatted_time: Option<String>,
    /// Optional semantic tags; when absent the client classifies the message itself.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleLogEntry {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default = "default_activity_kind")]
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyticsReport {
    pub global: GlobalAnalytics,
    pub accounts: Vec<AccountAnalytics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlobalAnalytics {
    pub cpm: f64,
    pub active_accounts: f64,
    pub session_total: f64,
    pub net_earnings: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountAnalytics {
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<String>,
    pub account_display: Option<String>,
    pub cpm: f64,
    pub hunt: f64,
    pub battle: f64,
    pub daily: f64,
    pub owo: f64,
    pub net_earnings: f64,
    pub last_command_ts: Option<f64>,
}

impl AccountAnalytics {
    pub fn label(&self) -> &str {
        self.account_display
            .as_deref()
            .filter(|display| !display.is_empty())
            .or(self.account_id.as_deref())
            .unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> DashboardClient {
        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        DashboardClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn fetches_status() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/status");
            then.status(200).json_body(json!({
                "status": "online",
                "active_accounts": 2,
                "total_accounts": 3,
                "captcha_detected": false,
                "is_sleeping": false,
                "timestamp": 1700000000.5
            }));
        });

        let status = client_for(&server).status().await.unwrap();
        assert_eq!(status.status, "online");
        assert_eq!(status.active_accounts, Some(2));
        assert_eq!(status.total_accounts, Some(3));
    }

    #[tokio::test]
    async fn fetches_stats_with_numeric_user_ids() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/stats");
            then.status(200).json_body(json!({
                "balance": 1500,
                "balance_formatted": "1,500",
                "hunts_today": 12,
                "battles_today": 7,
                "uptime": 3661,
                "accounts": [
                    {
                        "user_id": 123456789012345678u64,
                        "user_display": "User-5678",
                        "cowoncy": 1500,
                        "cowoncy_formatted": "1,500",
                        "captchas": 1
                    }
                ]
            }));
        });

        let stats = client_for(&server).stats().await.unwrap();
        assert_eq!(stats.balance, 1500);
        assert_eq!(stats.uptime, 3661);
        assert_eq!(stats.accounts[0].user_id, "123456789012345678");
        assert_eq!(stats.commands_executed, 0);
    }

    #[tokio::test]
    async fn sends_command_log_filters_as_query() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/dashboard/command-logs")
                .query_param("type", "hunt")
                .query_param("account", "42")
                .query_param("limit", "100");
            then.status(200).json_body(json!({
                "logs": [
                    {
                        "timestamp": 1700000000.0,
                        "account_id": "42",
                        "account_display": "User-0042",
                        "command_type": "hunt",
                        "message": "found: a cat",
                        "status": "info",
                        "formatted_time": "12:00:00"
                    }
                ],
                "total_count": 10,
                "filtered_count": 1
            }));
        });

        let query = CommandLogQuery {
            log_type: "hunt".into(),
            account: "42".into(),
            limit: 100,
        };
        let page = client_for(&server).command_logs(&query).await.unwrap();
        assert_eq!(page.total_count, 10);
        assert_eq!(page.filtered_count, 1);
        assert_eq!(page.logs[0].account_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn fetches_analytics_with_missing_display_names() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/analytics");
            then.status(200).json_body(json!({
                "global": { "cpm": 4, "active_accounts": 1, "session_total": 20, "net_earnings": 350, "timestamp": 1.0 },
                "accounts": [
                    { "account_id": "99", "cpm": 4, "hunt": 10, "battle": 8, "daily": 1, "owo": 1, "net_earnings": 350, "last_command_ts": null }
                ]
            }));
        });

        let report = client_for(&server).analytics().await.unwrap();
        assert_eq!(report.global.session_total, 20.0);
        assert_eq!(report.accounts[0].label(), "99");
        assert!(report.accounts[0].last_command_ts.is_none());
    }

    #[tokio::test]
    async fn surfaces_http_errors() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/activity");
            then.status(500).json_body(json!({ "status": "error", "message": "An error occurred" }));
        });

        let err = client_for(&server).activity().await.unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { .. }));
        assert_eq!(err.server_message().as_deref(), Some("An error occurred"));
    }
}
