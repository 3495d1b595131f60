use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::aggregate::{ConstraintSet, Objective, Waypoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MissionEvent {
    MissionCreated {
        mission_id: String,
        name: String,
        timestamp: DateTime<Utc>,
    },
    WaypointAdded {
        mission_id: String,
        waypoint: Waypoint,
        timestamp: DateTime<Utc>,
    },
    WaypointInserted {
        mission_id: String,
        index: usize,
        waypoint: Waypoint,
        timestamp: DateTime<Utc>,
    },
    WaypointRemoved {
        mission_id: String,
        index: usize,
        timestamp: DateTime<Utc>,
    },
    WaypointMoved {
        mission_id: String,
        from: usize,
        to: usize,
        timestamp: DateTime<Utc>,
    },
    WaypointUpdated {
        mission_id: String,
        index: usize,
        waypoint: Waypoint,
        timestamp: DateTime<Utc>,
    },
    WaypointsReordered {
        mission_id: String,
        waypoints: Vec<Waypoint>,
        timestamp: DateTime<Utc>,
    },
    MissionCleared {
        mission_id: String,
        timestamp: DateTime<Utc>,
    },
    ObjectiveChanged {
        mission_id: String,
        objective: Objective,
        timestamp: DateTime<Utc>,
    },
    ConstraintsChanged {
        mission_id: String,
        constraints: ConstraintSet,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for MissionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MissionEvent::MissionCreated { .. } => "MissionCreated",
            MissionEvent::WaypointAdded { .. } => "WaypointAdded",
            MissionEvent::WaypointInserted { .. } => "WaypointInserted",
            MissionEvent::WaypointRemoved { .. } => "WaypointRemoved",
            MissionEvent::WaypointMoved { .. } => "WaypointMoved",
            MissionEvent::WaypointUpdated { .. } => "WaypointUpdated",
            MissionEvent::WaypointsReordered { .. } => "WaypointsReordered",
            MissionEvent::MissionCleared { .. } => "MissionCleared",
            MissionEvent::ObjectiveChanged { .. } => "ObjectiveChanged",
            MissionEvent::ConstraintsChanged { .. } => "ConstraintsChanged",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            MissionEvent::MissionCreated { mission_id, .. }
            | MissionEvent::WaypointAdded { mission_id, .. }
            | MissionEvent::WaypointInserted { mission_id, .. }
            | MissionEvent::WaypointRemoved { mission_id, .. }
            | MissionEvent::WaypointMoved { mission_id, .. }
            | MissionEvent::WaypointUpdated { mission_id, .. }
            | MissionEvent::WaypointsReordered { mission_id, .. }
            | MissionEvent::MissionCleared { mission_id, .. }
            | MissionEvent::ObjectiveChanged { mission_id, .. }
            | MissionEvent::ConstraintsChanged { mission_id, .. } => mission_id,
        }
    }

    fn event_version(&self) -> u64 { 1 }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MissionEvent::MissionCreated { timestamp, .. }
            | MissionEvent::WaypointAdded { timestamp, .. }
            | MissionEvent::WaypointInserted { timestamp, .. }
            | MissionEvent::WaypointRemoved { timestamp, .. }
            | MissionEvent::WaypointMoved { timestamp, .. }
            | MissionEvent::WaypointUpdated { timestamp, .. }
            | MissionEvent::WaypointsReordered { timestamp, .. }
            | MissionEvent::MissionCleared { timestamp, .. }
            | MissionEvent::ObjectiveChanged { timestamp, .. }
            | MissionEvent::ConstraintsChanged { timestamp, .. } => *timestamp,
        }
    }
}
