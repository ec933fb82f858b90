use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Info => "ℹ",
            NoticeKind::Success => "✔",
            NoticeKind::Warning => "⚠",
            NoticeKind::Error => "✖",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub created: Instant,
    pub duration: Duration,
}

impl Notice {
    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= self.duration
    }
}

/// Transient banners, oldest first.
#[derive(Debug)]
pub struct NotificationCenter {
    default_duration: Duration,
    next_id: u64,
    notices: Vec<Notice>,
}

impl NotificationCenter {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            default_duration,
            next_id: 1,
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        self.push_for(kind, message, self.default_duration)
    }

    pub fn push_for(&mut self, kind: NoticeKind, message: impl Into<String>, duration: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            message: message.into(),
            created: Instant::now(),
            duration,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        before != self.notices.len()
    }

    /// Drops every notice whose time is up.
    pub fn prune(&mut self, now: Instant) {
        self.notices.retain(|notice| !notice.expired(now));
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Time until the next notice expires, for scheduling a repaint.
    pub fn next_expiry(&self, now: Instant) -> Option<Duration> {
        self.notices
            .iter()
            .map(|notice| (notice.created + notice.duration).saturating_duration_since(now))
            .min()
    }
}
