use std::sync::Arc;

/// Logging port handed to the optimizer, the executor and the application
/// service. Implementations must never fail or block for long; the execution
/// loop logs from inside its tick.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
