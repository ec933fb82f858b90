use crate::config::AppConfig;
use crate::controller::{
    ApiOutcome,
    ApiRequest,
    AppEvent,
    BootstrapData,
    Dispatcher,
    PollingHandle,
    RequestContext,
    RequestError,
    TimerName,
};
use crate::services::api::{ApiClientConfig, ApiError, CommandLogQuery, DashboardClient};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Client(#[from] ApiError),
}

/// Runs API requests and polling tickers on its own tokio runtime and reports
/// back over a channel.
pub struct ApiWorker {
    runtime: Runtime,
    client: DashboardClient,
    events: Sender<AppEvent>,
    waker: Option<Waker>,
}

impl ApiWorker {
    pub fn new(config: &AppConfig) -> Result<(Self, Receiver<AppEvent>), WorkerError> {
        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("mizudeck-worker")
            .build()?;
        let client_config =
            ApiClientConfig::try_from_url(&config.base_url)?.with_timeout(config.request_timeout());
        let client = DashboardClient::new(client_config)?;
        let (events, receiver) = unbounded();

        Ok((
            Self {
                runtime,
                client,
                events,
                waker: None,
            },
            receiver,
        ))
    }

    /// Called after every event is queued, e.g. to request a repaint.
    pub fn with_waker<F>(mut self, waker: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn client(&self) -> &DashboardClient {
        &self.client
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl Dispatcher for ApiWorker {
    fn dispatch(&self, request: ApiRequest, context: RequestContext) {
        let client = self.client.clone();
        let events = self.events.clone();
        let waker = self.waker.clone();

        self.runtime.spawn(async move {
            let outcome = execute(&client, request).await;
            if events.send(AppEvent::Response { context, outcome }).is_err() {
                debug!("event receiver dropped, discarding response");
                return;
            }
            if let Some(wake) = waker {
                wake();
            }
        });
    }

    fn schedule(&self, name: TimerName, period: Duration) -> PollingHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let events = self.events.clone();
        let waker = self.waker.clone();

        self.runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if events.send(AppEvent::TimerFired(name)).is_err() {
                            break;
                        }
                        if let Some(wake) = &waker {
                            wake();
                        }
                    }
                    _ = &mut stop_rx => break,
                }
            }
            debug!(timer = %name, "ticker finished");
        });

        PollingHandle::new(stop_tx)
    }
}

fn failed(err: ApiError) -> RequestError {
    RequestError::from(err)
}

async fn execute(client: &DashboardClient, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::Bootstrap(query) => ApiOutcome::Bootstrap(bootstrap(client, &query).await),
        ApiRequest::Status => ApiOutcome::Status(client.status().await.map_err(failed)),
        ApiRequest::Stats(target) => ApiOutcome::Stats(target, client.stats().await.map_err(failed)),
        ApiRequest::Activity => ApiOutcome::Activity(client.activity().await.map_err(failed)),
        ApiRequest::CommandLogs(query) => {
            ApiOutcome::CommandLogs(client.command_logs(&query).await.map_err(failed))
        }
        ApiRequest::ConsoleLogs => {
            ApiOutcome::ConsoleLogs(client.console_logs().await.map_err(failed))
        }
        ApiRequest::Analytics => ApiOutcome::Analytics(client.analytics().await.map_err(failed)),
        ApiRequest::GlobalSettings => {
            ApiOutcome::GlobalSettings(client.global_settings().await.map_err(failed))
        }
        ApiRequest::QuickSettings => {
            ApiOutcome::QuickSettings(client.quick_settings().await.map_err(failed))
        }
        ApiRequest::QuickToggle { toggle, enabled } => ApiOutcome::QuickToggle {
            toggle,
            enabled,
            result: client.quick_toggle(toggle, enabled).await.map_err(failed),
        },
        ApiRequest::LoadSecurity => {
            ApiOutcome::SecurityLoaded(client.security_settings().await.map_err(failed))
        }
        ApiRequest::SaveSecurity(settings) => ApiOutcome::SecuritySaved(
            client.save_security_settings(&settings).await.map_err(failed),
        ),
        ApiRequest::LoadGambling => {
            ApiOutcome::GamblingLoaded(client.gambling_settings().await.map_err(failed))
        }
        ApiRequest::SaveGambling(settings) => ApiOutcome::GamblingSaved(
            client.save_gambling_settings(&settings).await.map_err(failed),
        ),
        ApiRequest::LoadAutoEnhance => {
            ApiOutcome::AutoEnhanceLoaded(client.autoenhance_settings().await.map_err(failed))
        }
        ApiRequest::SaveAutoEnhance(settings) => ApiOutcome::AutoEnhanceSaved(
            client.save_autoenhance_settings(&settings).await.map_err(failed),
        ),
        ApiRequest::Terminate => ApiOutcome::Terminated(client.terminate().await.map_err(failed)),
        ApiRequest::Control(action) => {
            ApiOutcome::Control(action, client.control(action).await.map_err(failed))
        }
    }
}

/// Status, settings, stats, command logs and quick toggles, strictly in that
/// order; the first failure ends the sequence.
async fn bootstrap(
    client: &DashboardClient,
    query: &CommandLogQuery,
) -> Result<BootstrapData, RequestError> {
    let status = client.status().await.map_err(failed)?;
    let settings = client.global_settings().await.map_err(failed)?;
    let stats = client.stats().await.map_err(failed)?;
    let command_logs = client.command_logs(query).await.map_err(failed)?;
    let quick = client.quick_settings().await.map_err(failed)?;

    Ok(BootstrapData {
        status,
        settings,
        stats,
        command_logs,
        quick,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::StatsTarget;
    use httpmock::prelude::*;
    use serde_json::json;

    fn worker_for(server: &MockServer) -> (ApiWorker, Receiver<AppEvent>) {
        let config = AppConfig {
            base_url: server.base_url(),
            ..AppConfig::default()
        };
        ApiWorker::new(&config).unwrap()
    }

    #[test]
    fn bootstrap_stops_at_first_failure() {
        let server = MockServer::start();
        let status = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/status");
            then.status(200).json_body(json!({ "status": "online" }));
        });
        let settings = server.mock(|when, then| {
            when.method(GET).path("/api/settings");
            then.status(500).json_body(json!({ "error": "settings unavailable" }));
        });
        let stats = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/stats");
            then.status(200).json_body(json!({}));
        });

        let (worker, events) = worker_for(&server);
        worker.dispatch(
            ApiRequest::Bootstrap(CommandLogQuery::default()),
            RequestContext::global(),
        );

        let event = events.recv_timeout(Duration::from_secs(5)).unwrap();
        match event {
            AppEvent::Response {
                outcome: ApiOutcome::Bootstrap(Err(err)),
                ..
            } => assert_eq!(err.message_or(""), "settings unavailable"),
            other => panic!("unexpected event: {other:?}"),
        }
        status.assert();
        settings.assert();
        stats.assert_hits(0);
    }

    #[test]
    fn responses_carry_their_context() {
        let server = MockServer::start();
        let _stats = server.mock(|when, then| {
            when.method(GET).path("/api/dashboard/stats");
            then.status(200).json_body(json!({ "balance": 42, "uptime": 5 }));
        });

        let (worker, events) = worker_for(&server);
        let context = RequestContext::scoped(crate::controller::Section::Overview);
        worker.dispatch(ApiRequest::Stats(StatsTarget::Full), context.clone());

        match events.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Response {
                context: received,
                outcome: ApiOutcome::Stats(StatsTarget::Full, Ok(stats)),
            } => {
                assert_eq!(received, context);
                assert_eq!(stats.balance, 42);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn scheduled_timer_fires_until_stopped() {
        let server = MockServer::start();
        let (worker, events) = worker_for(&server);

        let handle = worker.schedule(TimerName::Uptime, Duration::from_millis(20));
        for _ in 0..2 {
            let event = events.recv_timeout(Duration::from_secs(2)).unwrap();
            assert!(matches!(event, AppEvent::TimerFired(TimerName::Uptime)));
        }

        handle.stop();
        std::thread::sleep(Duration::from_millis(60));
        while events.try_recv().is_ok() {}
        assert!(events.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
