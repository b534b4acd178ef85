use std::sync::Arc;
use std::collections::VecDeque;
use parking_lot::Mutex;
use serde::Serialize;
use chrono::Utc;

use super::reporter::{ReportLevel, Reporter};

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: i64,
    pub level: ReportLevel,
    pub message: String,
    pub entry: Option<String>,
}

/// Bounded in-memory ring of reported messages, oldest dropped first.
#[derive(Clone)]
pub struct LogBuffer {
    buffer: Arc<Mutex<VecDeque<LogEntry>>>,
    max_entries: usize,
}

impl LogBuffer {
    pub fn new(max_entries: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(max_entries))),
            max_entries,
        }
    }

    pub fn add_log(&self, level: ReportLevel, message: String, entry: Option<String>) {
        if self.max_entries == 0 {
            return;
        }

        let log = LogEntry {
            timestamp: Utc::now().timestamp(),
            level,
            message,
            entry,
        };

        let mut buffer = self.buffer.lock();
        if buffer.len() >= self.max_entries {
            buffer.pop_front();
        }
        buffer.push_back(log);
    }

    pub fn get_logs(&self, limit: Option<usize>) -> Vec<LogEntry> {
        let buffer = self.buffer.lock();
        let logs: Vec<LogEntry> = buffer.iter().cloned().collect();
        match limit {
            Some(n) => logs.into_iter().rev().take(n).rev().collect(),
            None => logs,
        }
    }

    /// Messages currently held at `level`.
    pub fn count(&self, level: ReportLevel) -> usize {
        self.buffer.lock().iter().filter(|l| l.level == level).count()
    }

    /// True if any held message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.buffer.lock().iter().any(|l| l.message.contains(needle))
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Reporter for LogBuffer {
    fn report(&self, level: ReportLevel, message: &str, entry: Option<&str>) {
        self.add_log(level, message.to_string(), entry.map(str::to_string));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_entries_are_dropped() {
        let buffer = LogBuffer::new(2);
        buffer.info("one", None);
        buffer.info("two", None);
        buffer.error("three", Some("/src"));

        let logs = buffer.get_logs(None);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "two");
        assert_eq!(logs[1].entry.as_deref(), Some("/src"));
        assert_eq!(buffer.count(ReportLevel::Error), 1);
    }

    #[test]
    fn test_limit_returns_most_recent() {
        let buffer = LogBuffer::new(10);
        for i in 0..5 {
            buffer.info(&format!("line {}", i), None);
        }
        let logs = buffer.get_logs(Some(2));
        assert_eq!(logs[0].message, "line 3");
        assert_eq!(logs[1].message, "line 4");

        buffer.clear();
        assert!(buffer.get_logs(None).is_empty());
        assert!(!buffer.contains("line"));
    }
}
