use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

/// Writes domain log lines through the `log` facade into a fast_log file.
/// Console output stays with the tracing subscriber.
struct FileBridge;

impl DomainLogger for FileBridge {
    fn info(&self, msg: &str) {
        log::info!(target: "mission_planner", "{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: "mission_planner", "{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: "mission_planner", "{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Install fast_log as the process-wide `log` backend writing to `path`.
/// `level` takes the usual `log` names and falls back to info.
/// Fails when another `log` backend is already installed.
pub fn init_file_logger(path: &str, level: &str) -> Result<Arc<dyn DomainLogger>, String> {
    let level = level.parse::<log::LevelFilter>().unwrap_or(log::LevelFilter::Info);
    fast_log::init(fast_log::config::Config::new().file(path).level(level))
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileBridge))
}
