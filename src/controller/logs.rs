use crate::format::format_clock;
use crate::services::api::{CommandLogRecord, ConsoleLogEntry};
use chrono::{DateTime, Local};
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

pub const COMMAND_LOG_CAPACITY: usize = 200;
pub const CONSOLE_LOG_CAPACITY: usize = 100;

static DISCOVERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)found:|caught").expect("static regex"));
static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)cowoncy|💰").expect("static regex"));
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("static regex"));

/// FIFO list that evicts its oldest entry once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(256)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn replace<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.entries.clear();
        for entry in entries {
            self.push(entry);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Success,
    Error,
    Discovery,
    Currency,
    Plain,
}

impl LogCategory {
    fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "success" => LogCategory::Success,
            "error" => LogCategory::Error,
            "discovery" | "found" => LogCategory::Discovery,
            "currency" | "cowoncy" => LogCategory::Currency,
            _ => LogCategory::Plain,
        }
    }

    fn span_style(&self) -> SpanStyle {
        match self {
            LogCategory::Success | LogCategory::Discovery => SpanStyle::Success,
            LogCategory::Error => SpanStyle::Error,
            LogCategory::Currency | LogCategory::Plain => SpanStyle::Highlight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    Success,
    Error,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SpanStyle,
}

impl Segment {
    fn new(text: &str, style: SpanStyle) -> Self {
        Self {
            text: text.to_string(),
            style,
        }
    }
}

/// A command log record with its display tags resolved.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub account_id: Option<String>,
    pub account_display: String,
    pub command_type: String,
    pub message: String,
    pub status: String,
    pub time: String,
    pub category: LogCategory,
    pub segments: Vec<Segment>,
}

impl LogEntry {
    pub fn from_record(record: CommandLogRecord) -> Self {
        let (category, segments) = classify(&record);
        let time = record
            .formatted_time
            .clone()
            .filter(|time| !time.is_empty())
            .unwrap_or_else(|| format_clock(record.timestamp));
        let account_display = record
            .account_display
            .clone()
            .or_else(|| record.account_id.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            account_id: record.account_id,
            account_display,
            command_type: record.command_type,
            message: record.message,
            status: record.status,
            time,
            category,
            segments,
        }
    }
}

fn classify(record: &CommandLogRecord) -> (LogCategory, Vec<Segment>) {
    let message = record.message.as_str();

    if let Some(tag) = record.category.as_deref() {
        let category = LogCategory::from_tag(tag);
        let segments = match record.highlights.as_deref() {
            Some(highlights) if !highlights.is_empty() => {
                highlight_literals(message, highlights, category.span_style())
            }
            _ => whole(message, category),
        };
        return (category, segments);
    }

    match record.status.as_str() {
        "success" => return (LogCategory::Success, whole(message, LogCategory::Success)),
        "error" => return (LogCategory::Error, whole(message, LogCategory::Error)),
        _ => {}
    }

    if DISCOVERY.is_match(message) {
        return (
            LogCategory::Discovery,
            split_matches(message, &DISCOVERY, SpanStyle::Success),
        );
    }
    if CURRENCY.is_match(message) {
        return (
            LogCategory::Currency,
            split_matches(message, &DIGITS, SpanStyle::Highlight),
        );
    }
    (LogCategory::Plain, whole(message, LogCategory::Plain))
}

fn whole(message: &str, category: LogCategory) -> Vec<Segment> {
    let style = match category {
        LogCategory::Success => SpanStyle::Success,
        LogCategory::Error => SpanStyle::Error,
        _ => SpanStyle::Plain,
    };
    vec![Segment::new(message, style)]
}

fn split_matches(message: &str, pattern: &Regex, style: SpanStyle) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in pattern.find_iter(message) {
        if found.start() > cursor {
            segments.push(Segment::new(&message[cursor..found.start()], SpanStyle::Plain));
        }
        segments.push(Segment::new(found.as_str(), style));
        cursor = found.end();
    }
    if cursor < message.len() || segments.is_empty() {
        segments.push(Segment::new(&message[cursor..], SpanStyle::Plain));
    }
    segments
}

fn highlight_literals(message: &str, highlights: &[String], style: SpanStyle) -> Vec<Segment> {
    let alternatives: Vec<String> = highlights
        .iter()
        .filter(|text| !text.is_empty())
        .map(|text| regex::escape(text))
        .collect();
    if alternatives.is_empty() {
        return vec![Segment::new(message, SpanStyle::Plain)];
    }
    match Regex::new(&alternatives.join("|")) {
        Ok(pattern) => split_matches(message, &pattern, style),
        Err(err) => {
            debug!(error = %err, "could not build highlight pattern");
            vec![Segment::new(message, SpanStyle::Plain)]
        }
    }
}

/// Accounts seen in a log page, each listed once in first-seen order.
pub fn account_options<'a, I>(entries: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.account_id.clone()?;
            seen.insert(id.clone())
                .then(|| (id, entry.account_display.clone()))
        })
        .collect()
}

/// One line of the raw console feed, or a locally generated fallback line.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleLine {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

impl ConsoleLine {
    pub fn local(level: &str, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            level: level.to_string(),
            message: message.into(),
        }
    }

    pub fn export_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp,
            self.level.to_uppercase(),
            self.message
        )
    }
}

impl From<ConsoleLogEntry> for ConsoleLine {
    fn from(entry: ConsoleLogEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            level: entry.level,
            message: entry.message,
        }
    }
}

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("mizudeck-logs-{}.txt", now.format("%Y-%m-%d"))
}

/// Console lines first, then the command log, one entry per line.
pub fn render_export<'a, C, L>(console: C, commands: L) -> String
where
    C: IntoIterator<Item = &'a ConsoleLine>,
    L: IntoIterator<Item = &'a LogEntry>,
{
    let mut out = String::new();
    for line in console {
        out.push_str(&line.export_line());
        out.push('\n');
    }
    for entry in commands {
        out.push_str(&format!(
            "[{}] [{}] {}: {}\n",
            entry.time,
            entry.command_type.to_uppercase(),
            entry.account_display,
            entry.message
        ));
    }
    out
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

pub fn write_export(dir: &Path, now: DateTime<Local>, contents: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(export_file_name(now));
    fs::write(&path, contents).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(message: &str, status: &str) -> CommandLogRecord {
        CommandLogRecord {
            timestamp: Some(1_700_000_000.0),
            account_id: Some("42".into()),
            account_display: Some("User-0042".into()),
            command_type: "hunt".into(),
            message: message.into(),
            status: status.into(),
            formatted_time: Some("12:00:00".into()),
            category: None,
            highlights: None,
        }
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut log = BoundedLog::new(COMMAND_LOG_CAPACITY);
        for index in 0..450 {
            log.push(index);
        }
        assert_eq!(log.len(), 200);
        assert_eq!(log.iter().next(), Some(&250));
        assert_eq!(log.iter().last(), Some(&449));
    }

    #[test]
    fn replace_keeps_newest_entries() {
        let mut log = BoundedLog::new(3);
        log.replace(1..=5);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn status_wins_over_message_content() {
        let entry = LogEntry::from_record(record("found: a cat", "error"));
        assert_eq!(entry.category, LogCategory::Error);
        assert_eq!(entry.segments.len(), 1);
        assert_eq!(entry.segments[0].style, SpanStyle::Error);
    }

    #[test]
    fn discovery_spans_are_marked() {
        let entry = LogEntry::from_record(record("You found: a cat and caught a dog", "info"));
        assert_eq!(entry.category, LogCategory::Discovery);
        let marked: Vec<&str> = entry
            .segments
            .iter()
            .filter(|segment| segment.style == SpanStyle::Success)
            .map(|segment| segment.text.as_str())
            .collect();
        assert_eq!(marked, vec!["found:", "caught"]);
        let rebuilt: String = entry.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, "You found: a cat and caught a dog");
    }

    #[test]
    fn currency_highlights_amounts() {
        let entry = LogEntry::from_record(record("💰 gained 1,500 cowoncy", "info"));
        assert_eq!(entry.category, LogCategory::Currency);
        let highlighted: Vec<&str> = entry
            .segments
            .iter()
            .filter(|segment| segment.style == SpanStyle::Highlight)
            .map(|segment| segment.text.as_str())
            .collect();
        assert_eq!(highlighted, vec!["1,500"]);
    }

    #[test]
    fn backend_tags_are_used_verbatim() {
        let mut tagged = record("lost 300 in slots", "info");
        tagged.category = Some("currency".into());
        tagged.highlights = Some(vec!["300".into()]);
        let entry = LogEntry::from_record(tagged);
        assert_eq!(entry.category, LogCategory::Currency);
        assert_eq!(
            entry.segments,
            vec![
                Segment::new("lost ", SpanStyle::Plain),
                Segment::new("300", SpanStyle::Highlight),
                Segment::new(" in slots", SpanStyle::Plain),
            ]
        );
    }

    #[test]
    fn backend_highlights_take_the_category_colour() {
        let mut tagged = record("caught a rare fox", "success");
        tagged.category = Some("success".into());
        tagged.highlights = Some(vec!["rare fox".into()]);
        let entry = LogEntry::from_record(tagged);
        assert_eq!(entry.category, LogCategory::Success);
        assert_eq!(
            entry.segments,
            vec![
                Segment::new("caught a ", SpanStyle::Plain),
                Segment::new("rare fox", SpanStyle::Success),
            ]
        );
    }

    #[test]
    fn account_filter_lists_each_account_once() {
        let mut other = record("owo", "info");
        other.account_id = Some("7".into());
        other.account_display = Some("User-0007".into());
        let entries: Vec<LogEntry> = [record("a", "info"), other, record("b", "info")]
            .into_iter()
            .map(LogEntry::from_record)
            .collect();

        assert_eq!(
            account_options(&entries),
            vec![
                ("42".to_string(), "User-0042".to_string()),
                ("7".to_string(), "User-0007".to_string()),
            ]
        );
    }

    #[test]
    fn export_uses_dated_name_and_level_prefix() {
        let day = Local.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(export_file_name(day), "mizudeck-logs-2024-03-09.txt");

        let line = ConsoleLine {
            timestamp: "10:00:00".into(),
            level: "warning".into(),
            message: "slow response".into(),
        };
        let entry = LogEntry::from_record(record("caught a dog", "info"));
        let text = render_export([&line], [&entry]);
        assert_eq!(
            text,
            "[10:00:00] [WARNING] slow response\n[12:00:00] [HUNT] User-0042: caught a dog\n"
        );
    }

    #[test]
    fn export_creates_missing_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("exports").join("today");
        let day = Local.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();

        let path = write_export(&dir, day, "[x] [INFO] hello\n").unwrap();
        assert_eq!(path, dir.join("mizudeck-logs-2024-12-31.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "[x] [INFO] hello\n");
    }
}
