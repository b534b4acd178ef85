use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLevel::Info => f.write_str("info"),
            ReportLevel::Warn => f.write_str("warn"),
            ReportLevel::Error => f.write_str("error"),
        }
    }
}

/// Sink for the human-readable messages a backup run produces.
///
/// The engine only emits lines; where they end up (console, log file,
/// in-memory buffer) belongs to whoever constructs the engine.
pub trait Reporter: Send + Sync {
    /// `entry` is the manifest line the message belongs to, if any.
    fn report(&self, level: ReportLevel, message: &str, entry: Option<&str>);

    fn info(&self, message: &str, entry: Option<&str>) {
        self.report(ReportLevel::Info, message, entry);
    }

    fn warn(&self, message: &str, entry: Option<&str>) {
        self.report(ReportLevel::Warn, message, entry);
    }

    fn error(&self, message: &str, entry: Option<&str>) {
        self.report(ReportLevel::Error, message, entry);
    }
}

/// Forwards messages to the installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, level: ReportLevel, message: &str, entry: Option<&str>) {
        let entry = entry.unwrap_or("-");
        match level {
            ReportLevel::Info => tracing::info!(entry, "{}", message),
            ReportLevel::Warn => tracing::warn!(entry, "{}", message),
            ReportLevel::Error => tracing::error!(entry, "{}", message),
        }
    }
}

/// Fans each message out to several reporters.
pub struct TeeReporter {
    sinks: Vec<std::sync::Arc<dyn Reporter>>,
}

impl TeeReporter {
    pub fn new(sinks: Vec<std::sync::Arc<dyn Reporter>>) -> Self {
        Self { sinks }
    }
}

impl Reporter for TeeReporter {
    fn report(&self, level: ReportLevel, message: &str, entry: Option<&str>) {
        for sink in &self.sinks {
            sink.report(level, message, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::log_buffer::LogBuffer;
    use std::sync::Arc;

    #[test]
    fn test_tee_reaches_every_sink() {
        let first = LogBuffer::new(10);
        let second = LogBuffer::new(10);
        let tee = TeeReporter::new(vec![
            Arc::new(first.clone()),
            Arc::new(second.clone()),
            Arc::new(TracingReporter),
        ]);

        tee.warn("careful", Some("/src/a"));

        assert_eq!(first.get_logs(None).len(), 1);
        let logs = second.get_logs(None);
        assert_eq!(logs[0].level, ReportLevel::Warn);
        assert_eq!(logs[0].entry.as_deref(), Some("/src/a"));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(ReportLevel::Error.to_string(), "error");
    }
}
