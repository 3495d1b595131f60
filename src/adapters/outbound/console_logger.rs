use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

struct ConsoleBridge;

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) { println!("{} INFO  {}", Utc::now().format("%H:%M:%S%.3f"), msg); }
    fn warn(&self, msg: &str) { println!("{} WARN  {}", Utc::now().format("%H:%M:%S%.3f"), msg); }
    fn error(&self, msg: &str) { eprintln!("{} ERROR {}", Utc::now().format("%H:%M:%S%.3f"), msg); }
}

/// Initialize a simple console-backed DomainLogger (useful as a fallback)
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge {})
}
