use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards every line to a primary logger and, optionally, a secondary one.
pub struct MultiLogger {
    primary: Arc<dyn DomainLogger>,
    secondary: Option<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(primary: Arc<dyn DomainLogger>, secondary: Option<Arc<dyn DomainLogger>>) -> Self {
        Self { primary, secondary }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.primary.info(msg);
        if let Some(sec) = &self.secondary {
            sec.info(msg);
        }
    }

    fn warn(&self, msg: &str) {
        self.primary.warn(msg);
        if let Some(sec) = &self.secondary {
            sec.warn(msg);
        }
    }

    fn error(&self, msg: &str) {
        self.primary.error(msg);
        if let Some(sec) = &self.secondary {
            sec.error(msg);
        }
    }
}

/// Mission log file (fast_log) plus tracing output; tracing alone when the
/// file logger cannot be initialized.
pub fn init_combined_logger(path: &str, level: &str) -> Arc<dyn DomainLogger> {
    let tracing_logger = crate::adapters::outbound::init_tracing_logger();
    match crate::adapters::outbound::file_logger::init_file_logger(path, level) {
        Ok(file_logger) => {
            let combined = MultiLogger::new(file_logger, Some(tracing_logger));
            Arc::new(combined) as Arc<dyn DomainLogger>
        }
        Err(e) => {
            tracing_logger.warn(&e);
            tracing_logger
        }
    }
}
