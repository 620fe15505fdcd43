use crate::app_dirs::AppDirs;
use crate::session::TestSummary;
use chrono::{DateTime, Local};
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use std::io;

/// Oldest entries are dropped once the buffer grows past this cap.
const MAX_ENTRIES: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn from_env() -> Self {
        match std::env::var("KEYSTROKE_LOG_LEVEL")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "debug" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

/// Bounded in-process event log. The TUI owns the terminal, so entries stay
/// in memory until exported to the state dir.
#[derive(Debug)]
pub struct EventLog {
    level: LogLevel,
    session_id: String,
    entries: Vec<LogEntry>,
}

#[derive(Serialize)]
struct LogExport<'a> {
    session_id: &'a str,
    entries: &'a [LogEntry],
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_level(LogLevel::from_env())
    }

    pub fn with_level(level: LogLevel) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(char::from)
            .collect();
        let session_id = format!("session_{}_{}", Local::now().format("%Y%m%d%H%M%S"), suffix);

        Self {
            level,
            session_id,
            entries: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>, component: Option<&str>) {
        if level < self.level {
            return;
        }

        self.entries.push(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.into(),
            component: component.map(str::to_string),
        });

        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    pub fn debug(&mut self, message: impl Into<String>, component: Option<&str>) {
        self.log(LogLevel::Debug, message, component);
    }

    pub fn info(&mut self, message: impl Into<String>, component: Option<&str>) {
        self.log(LogLevel::Info, message, component);
    }

    pub fn warn(&mut self, message: impl Into<String>, component: Option<&str>) {
        self.log(LogLevel::Warn, message, component);
    }

    pub fn error(&mut self, message: impl Into<String>, component: Option<&str>) {
        self.log(LogLevel::Error, message, component);
    }

    pub fn test_started(&mut self, word_count: usize, duration_secs: u64) {
        self.info(
            format!("test started: {word_count} words, {duration_secs}s"),
            Some("session"),
        );
    }

    pub fn test_result(&mut self, summary: &TestSummary) {
        self.info(
            format!(
                "test completed: {} wpm, {}% accuracy, {}/{} chars in {:.1}s",
                summary.wpm,
                summary.accuracy,
                summary.correct_chars,
                summary.total_chars,
                summary.elapsed_secs
            ),
            Some("session"),
        );
    }

    pub fn export_json(&self) -> String {
        let export = LogExport {
            session_id: &self.session_id,
            entries: &self.entries,
        };
        serde_json::to_string_pretty(&export).unwrap_or_default()
    }

    /// Best-effort dump to the state dir; missing home is not an error.
    pub fn save_default(&self) -> io::Result<()> {
        if let Some(path) = AppDirs::event_log_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, self.export_json())?;
        }
        Ok(())
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_at_or_above_level() {
        let mut log = EventLog::with_level(LogLevel::Warn);

        log.debug("dropped", None);
        log.info("dropped", None);
        log.warn("kept", None);
        log.error("kept", Some("test"));

        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].level, LogLevel::Warn);
        assert_eq!(log.entries()[1].component.as_deref(), Some("test"));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_buffer_is_bounded() {
        let mut log = EventLog::with_level(LogLevel::Debug);

        for i in 0..(MAX_ENTRIES + 50) {
            log.info(format!("entry {i}"), None);
        }

        assert_eq!(log.entries().len(), MAX_ENTRIES);
        // Oldest entries were dropped first.
        assert_eq!(log.entries()[0].message, "entry 50");
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = EventLog::with_level(LogLevel::Info);
        let b = EventLog::with_level(LogLevel::Info);

        assert!(a.session_id().starts_with("session_"));
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn test_export_json_parses() {
        let mut log = EventLog::with_level(LogLevel::Info);
        log.test_started(50, 60);

        let value: serde_json::Value = serde_json::from_str(&log.export_json()).unwrap();

        assert_eq!(value["session_id"], log.session_id());
        assert_eq!(value["entries"][0]["level"], "info");
        assert!(value["entries"][0]["message"]
            .as_str()
            .unwrap()
            .contains("test started"));
    }

    #[test]
    fn test_test_result_message() {
        let mut log = EventLog::with_level(LogLevel::Info);
        let summary = crate::session::TestSummary {
            wpm: 42.0,
            accuracy: 95.0,
            correct_chars: 210,
            incorrect_chars: 11,
            total_chars: 221,
            elapsed_secs: 60.0,
        };

        log.test_result(&summary);

        assert!(log.entries()[0].message.contains("42 wpm"));
        assert!(log.entries()[0].message.contains("95% accuracy"));
    }
}
