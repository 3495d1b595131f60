use super::memory_logger::LogLevel;
use crate::domains::logger::DomainLogger;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

struct LogMessage {
    level: LogLevel,
    msg: String,
}

/// Non-blocking logger for hot paths such as the execution tick loop.
/// Lines are forwarded to the wrapped logger from a background task; when the
/// buffer is full the line is dropped and counted.
pub struct BufferedLogger {
    sender: mpsc::Sender<LogMessage>,
    dropped: AtomicU64,
}

impl BufferedLogger {
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn forward(&self, level: LogLevel, msg: &str) {
        if self.sender.try_send(LogMessage { level, msg: msg.to_string() }).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) { self.forward(LogLevel::Info, msg); }
    fn warn(&self, msg: &str) { self.forward(LogLevel::Warn, msg); }
    fn error(&self, msg: &str) { self.forward(LogLevel::Error, msg); }
}

/// Must be called inside a tokio runtime. `capacity` is the channel buffer size.
pub fn init_buffered_logger(bridge: Arc<dyn DomainLogger>, capacity: usize) -> Arc<BufferedLogger> {
    let (tx, mut rx) = mpsc::channel::<LogMessage>(capacity.max(1));

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            match line.level {
                LogLevel::Info => bridge.info(&line.msg),
                LogLevel::Warn => bridge.warn(&line.msg),
                LogLevel::Error => bridge.error(&line.msg),
            }
        }
    });

    Arc::new(BufferedLogger { sender: tx, dropped: AtomicU64::new(0) })
}
