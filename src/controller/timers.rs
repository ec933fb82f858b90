use crate::config::PollIntervals;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerName {
    Stats,
    Status,
    Activity,
    Logs,
    CommandLogs,
    Navbar,
    Analytics,
    Uptime,
}

impl TimerName {
    /// Started at boot and after every resume.
    pub const DEFAULT_SET: [TimerName; 6] = [
        TimerName::Stats,
        TimerName::Status,
        TimerName::Activity,
        TimerName::CommandLogs,
        TimerName::Navbar,
        TimerName::Uptime,
    ];

    /// Survives the window being hidden.
    pub const RESERVED: TimerName = TimerName::Uptime;

    pub fn period(&self, intervals: &PollIntervals) -> Duration {
        let secs = match self {
            TimerName::Stats => intervals.stats_secs,
            TimerName::Status => intervals.status_secs,
            TimerName::Activity => intervals.activity_secs,
            TimerName::Logs => intervals.logs_secs,
            TimerName::CommandLogs => intervals.command_logs_secs,
            TimerName::Navbar => intervals.navbar_secs,
            TimerName::Analytics => intervals.analytics_secs,
            TimerName::Uptime => intervals.uptime_secs,
        };
        PollIntervals::period(secs)
    }
}

impl fmt::Display for TimerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerName::Stats => "stats",
            TimerName::Status => "status",
            TimerName::Activity => "activity",
            TimerName::Logs => "logs",
            TimerName::CommandLogs => "commandLogs",
            TimerName::Navbar => "navbar",
            TimerName::Analytics => "analytics",
            TimerName::Uptime => "uptime",
        };
        f.write_str(name)
    }
}

/// Cancels the ticker it was created for when stopped or dropped.
pub struct PollingHandle {
    stop: oneshot::Sender<()>,
}

impl PollingHandle {
    pub fn new(stop: oneshot::Sender<()>) -> Self {
        Self { stop }
    }

    pub fn stop(self) {
        let _ = self.stop.send(());
    }
}

/// At most one live handle per name.
#[derive(Default)]
pub struct TimerRegistry {
    handles: HashMap<TimerName, PollingHandle>,
}

impl TimerRegistry {
    pub fn contains(&self, name: TimerName) -> bool {
        self.handles.contains_key(&name)
    }

    pub fn active(&self) -> Vec<TimerName> {
        let mut names: Vec<TimerName> = self.handles.keys().copied().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Registers a handle produced by `spawn` unless the name is already live.
    /// Returns whether a new timer was started.
    pub fn start_with<F>(&mut self, name: TimerName, spawn: F) -> bool
    where
        F: FnOnce() -> PollingHandle,
    {
        if self.handles.contains_key(&name) {
            return false;
        }
        self.handles.insert(name, spawn());
        true
    }

    pub fn stop(&mut self, name: TimerName) -> bool {
        match self.handles.remove(&name) {
            Some(handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    /// Stops everything except `keep`, returning the names that were stopped.
    pub fn stop_all_except(&mut self, keep: TimerName) -> Vec<TimerName> {
        let mut stopped: Vec<TimerName> = self
            .handles
            .keys()
            .copied()
            .filter(|name| *name != keep)
            .collect();
        stopped.sort();
        for name in &stopped {
            self.stop(*name);
        }
        stopped
    }

    pub fn clear(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> (PollingHandle, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (PollingHandle::new(tx), rx)
    }

    #[test]
    fn starting_an_existing_name_is_a_no_op() {
        let mut registry = TimerRegistry::default();
        let (first, mut first_rx) = handle();
        assert!(registry.start_with(TimerName::Logs, || first));

        let mut spawned_again = false;
        assert!(!registry.start_with(TimerName::Logs, || {
            spawned_again = true;
            handle().0
        }));
        assert!(!spawned_again);
        assert_eq!(registry.len(), 1);
        assert!(first_rx.try_recv().is_err());
    }

    #[test]
    fn stop_signals_the_ticker() {
        let mut registry = TimerRegistry::default();
        let (h, mut rx) = handle();
        registry.start_with(TimerName::Analytics, || h);
        assert!(registry.stop(TimerName::Analytics));
        assert_eq!(rx.try_recv(), Ok(()));
        assert!(!registry.stop(TimerName::Analytics));
    }

    #[test]
    fn stop_all_except_keeps_reserved_timer() {
        let mut registry = TimerRegistry::default();
        let mut receivers = Vec::new();
        for name in TimerName::DEFAULT_SET {
            let (h, rx) = handle();
            registry.start_with(name, || h);
            receivers.push((name, rx));
        }

        let stopped = registry.stop_all_except(TimerName::RESERVED);
        assert_eq!(stopped.len(), TimerName::DEFAULT_SET.len() - 1);
        assert_eq!(registry.active(), vec![TimerName::Uptime]);
        for (name, mut rx) in receivers {
            if name == TimerName::Uptime {
                assert!(rx.try_recv().is_err());
            } else {
                assert_eq!(rx.try_recv(), Ok(()));
            }
        }
    }

    #[test]
    fn periods_follow_configuration() {
        let intervals = PollIntervals::default();
        assert_eq!(TimerName::Stats.period(&intervals), Duration::from_secs(5));
        assert_eq!(TimerName::Status.period(&intervals), Duration::from_secs(10));
        assert_eq!(TimerName::Activity.period(&intervals), Duration::from_secs(15));
        assert_eq!(TimerName::Logs.period(&intervals), Duration::from_secs(3));
        assert_eq!(TimerName::Uptime.period(&intervals), Duration::from_secs(1));
    }
}
