use crate::domains::logger::DomainLogger;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Keeps log lines in memory, e.g. for a UI log panel or test assertions.
#[derive(Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    fn push(&self, level: LogLevel, msg: &str) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).push((level, msg.to_string()));
    }
}

impl DomainLogger for MemoryLogger {
    fn info(&self, msg: &str) { self.push(LogLevel::Info, msg); }
    fn warn(&self, msg: &str) { self.push(LogLevel::Warn, msg); }
    fn error(&self, msg: &str) { self.push(LogLevel::Error, msg); }
}

struct NoOp;

impl DomainLogger for NoOp {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// No-op logger useful as default in unit tests
pub fn init_noop_logger() -> Arc<dyn DomainLogger> {
    Arc::new(NoOp {})
}
