use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards domain log lines to `tracing`, so they share the subscriber the
/// binary installs.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) { tracing::info!(target: "mission_planner", "{}", msg); }
    fn warn(&self, msg: &str) { tracing::warn!(target: "mission_planner", "{}", msg); }
    fn error(&self, msg: &str) { tracing::error!(target: "mission_planner", "{}", msg); }
}

pub fn init_tracing_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge {})
}
