use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::state::ExecutionState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExecutionEvent {
    StateChanged {
        run_id: String,
        from: ExecutionState,
        to: ExecutionState,
        timestamp: DateTime<Utc>,
    },
    WaypointReached {
        run_id: String,
        index: usize,
        seq: usize,
        total: usize,
        distance: f64,
        timestamp: DateTime<Utc>,
    },
    NavigationFault {
        run_id: String,
        index: usize,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for ExecutionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ExecutionEvent::StateChanged { .. } => "StateChanged",
            ExecutionEvent::WaypointReached { .. } => "WaypointReached",
            ExecutionEvent::NavigationFault { .. } => "NavigationFault",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            ExecutionEvent::StateChanged { run_id, .. }
            | ExecutionEvent::WaypointReached { run_id, .. }
            | ExecutionEvent::NavigationFault { run_id, .. } => run_id,
        }
    }

    fn event_version(&self) -> u64 { 1 }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ExecutionEvent::StateChanged { timestamp, .. }
            | ExecutionEvent::WaypointReached { timestamp, .. }
            | ExecutionEvent::NavigationFault { timestamp, .. } => *timestamp,
        }
    }
}
