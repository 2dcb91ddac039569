//! Log sinks that observation reports are written to.

use std::sync::Arc;

use parking_lot::RwLock;

use vigil_core::Severity;

/// Destination for leveled report lines.
pub trait LogSink: Send + Sync {
    /// Log an informational line.
    fn info(&self, message: &str);

    /// Log a warning line.
    fn warning(&self, message: &str);

    /// Log an error line.
    fn error(&self, message: &str);

    /// Log a line at the given severity.
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => self.info(message),
            Severity::Warning => self.warning(message),
            Severity::Error => self.error(message),
        }
    }
}

/// A shared reference to a log sink.
pub type SharedSink = Arc<dyn LogSink>;

/// Sink that forwards report lines to `tracing`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    name: String,
}

impl TracingSink {
    /// Create a tracing sink tagged with the default observer name.
    pub fn new() -> Self {
        Self::named("observer")
    }

    /// Create a tracing sink tagged with a custom name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the name attached to every line.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(observer = %self.name, "{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!(observer = %self.name, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(observer = %self.name, "{}", message);
    }
}

/// A single captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity the line was logged at.
    pub severity: Severity,
    /// The rendered line.
    pub message: String,
}

/// A sink that collects lines in memory for later inspection.
pub struct CollectingSink {
    records: RwLock<Vec<LogRecord>>,
    max_records: usize,
}

impl CollectingSink {
    /// Create a collecting sink that keeps at most `max_records` lines.
    pub fn new(max_records: usize) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            max_records,
        }
    }

    /// Get collected records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.read().clone()
    }

    /// Get the most recent record.
    pub fn last(&self) -> Option<LogRecord> {
        self.records.read().last().cloned()
    }

    /// Get messages logged at the given severity.
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.records
            .read()
            .iter()
            .filter(|r| r.severity == severity)
            .map(|r| r.message.clone())
            .collect()
    }

    /// Check if any record contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records
            .read()
            .iter()
            .any(|r| r.message.contains(needle))
    }

    /// Clear collected records.
    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Get record count.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn push(&self, severity: Severity, message: &str) {
        let mut records = self.records.write();
        if records.len() < self.max_records {
            records.push(LogRecord {
                severity,
                message: message.to_string(),
            });
        }
    }
}

impl Default for CollectingSink {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl LogSink for CollectingSink {
    fn info(&self, message: &str) {
        self.push(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Severity::Error, message);
    }
}

impl std::fmt::Debug for CollectingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectingSink")
            .field("len", &self.len())
            .field("max_records", &self.max_records)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new(16);
        sink.info("hello");
        sink.warning("careful");
        sink.error("broken");

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.messages_at(Severity::Warning), vec!["careful"]);
        assert_eq!(sink.last().unwrap().severity, Severity::Error);
        assert!(sink.contains("broke"));
    }

    #[test]
    fn test_collecting_sink_max_records() {
        let sink = CollectingSink::new(2);
        for i in 0..5 {
            sink.info(&format!("line {}", i));
        }
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_log_dispatches_by_severity() {
        let sink = CollectingSink::default();
        sink.log(Severity::Info, "a");
        sink.log(Severity::Warning, "b");
        sink.log(Severity::Error, "c");

        let severities: Vec<_> = sink.records().iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Info, Severity::Warning, Severity::Error]
        );

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_tracing_sink_name() {
        assert_eq!(TracingSink::new().name(), "observer");
        let sink = TracingSink::named("fixture");
        assert_eq!(sink.name(), "fixture");
        // No subscriber installed; must not panic.
        sink.log(Severity::Error, "ignored");
    }
}
