use super::events::ExecutionEvent;
use super::state::ExecutionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read model of one mission run, built from execution events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionProgress {
    pub run_id: String,
    pub state: ExecutionState,
    pub reached: Vec<usize>,
    pub total: Option<usize>,
    pub last_fault: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl MissionProgress {
    pub fn new(run_id: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            run_id,
            state: ExecutionState::Idle,
            reached: Vec::new(),
            total: None,
            last_fault: None,
            updated_at: timestamp,
        }
    }

    pub fn apply_event(&mut self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::StateChanged { to, timestamp, .. } => {
                self.state = *to;
                self.updated_at = *timestamp;
            }
            ExecutionEvent::WaypointReached { index, total, timestamp, .. } => {
                self.reached.push(*index);
                self.total = Some(*total);
                self.updated_at = *timestamp;
            }
            ExecutionEvent::NavigationFault { reason, timestamp, .. } => {
                self.last_fault = Some(reason.clone());
                self.updated_at = *timestamp;
            }
        }
    }

    /// Fraction of waypoints reached, when the total is known.
    pub fn completion(&self) -> Option<f64> {
        self.total
            .filter(|total| *total > 0)
            .map(|total| self.reached.len() as f64 / total as f64)
    }
}
