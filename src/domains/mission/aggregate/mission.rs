use crate::common::{AggregateRoot, DomainError, DomainResult};
use super::constraints::ConstraintSet;
use super::types::{Objective, Waypoint};
use crate::domains::mission::events::MissionEvent;
use chrono::Utc;
use uuid::Uuid;

/// Ordered flight plan. Waypoint order is the flight order and `seq` always
/// matches the position in the list.
#[derive(Debug, Clone)]
pub struct Mission {
    pub id: String,
    pub name: String,
    waypoints: Vec<Waypoint>,
    objective: Objective,
    constraints: ConstraintSet,
    version: u64,
    uncommitted_events: Vec<MissionEvent>,
}

impl Mission {
    pub fn new(name: impl Into<String>) -> Self {
        let mut mission = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            waypoints: Vec::new(),
            objective: Objective::default(),
            constraints: ConstraintSet::default(),
            version: 0,
            uncommitted_events: Vec::new(),
        };

        let event = MissionEvent::MissionCreated {
            mission_id: mission.id.clone(),
            name: mission.name.clone(),
            timestamp: Utc::now(),
        };
        mission.add_event(event);
        mission
    }

    /// Rebuild a mission from stored parts. Sequence numbers must already be dense.
    pub fn from_parts(
        id: String,
        name: String,
        waypoints: Vec<Waypoint>,
        objective: Objective,
        constraints: ConstraintSet,
    ) -> DomainResult<Self> {
        constraints.validate()?;
        for (index, waypoint) in waypoints.iter().enumerate() {
            waypoint.validate()?;
            if waypoint.seq != index {
                return Err(DomainError::InvalidInput {
                    reason: format!("waypoint at position {} has sequence {}", index, waypoint.seq),
                });
            }
        }

        Ok(Self {
            id,
            name,
            waypoints,
            objective,
            constraints,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> DomainResult<&Waypoint> {
        let len = self.waypoints.len();
        self.waypoints.get(index).ok_or(DomainError::IndexOutOfRange { index, len })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Append a waypoint and return its index.
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> DomainResult<usize> {
        waypoint.validate()?;
        self.raise(MissionEvent::WaypointAdded {
            mission_id: self.id.clone(),
            waypoint,
            timestamp: Utc::now(),
        })?;
        Ok(self.waypoints.len() - 1)
    }

    /// Insert before `index`; `index == len` appends.
    pub fn insert_waypoint(&mut self, index: usize, waypoint: Waypoint) -> DomainResult<()> {
        if index > self.waypoints.len() {
            return Err(DomainError::IndexOutOfRange { index, len: self.waypoints.len() });
        }
        waypoint.validate()?;
        self.raise(MissionEvent::WaypointInserted {
            mission_id: self.id.clone(),
            index,
            waypoint,
            timestamp: Utc::now(),
        })
    }

    pub fn remove_waypoint(&mut self, index: usize) -> DomainResult<Waypoint> {
        let removed = self.waypoint(index)?.clone();
        self.raise(MissionEvent::WaypointRemoved {
            mission_id: self.id.clone(),
            index,
            timestamp: Utc::now(),
        })?;
        Ok(removed)
    }

    pub fn move_waypoint(&mut self, from: usize, to: usize) -> DomainResult<()> {
        self.waypoint(from)?;
        self.waypoint(to)?;
        if from == to {
            return Ok(());
        }
        self.raise(MissionEvent::WaypointMoved {
            mission_id: self.id.clone(),
            from,
            to,
            timestamp: Utc::now(),
        })
    }

    pub fn update_waypoint(&mut self, index: usize, waypoint: Waypoint) -> DomainResult<()> {
        self.waypoint(index)?;
        waypoint.validate()?;
        self.raise(MissionEvent::WaypointUpdated {
            mission_id: self.id.clone(),
            index,
            waypoint,
            timestamp: Utc::now(),
        })
    }

    /// Adopt a new flight order, typically the output of the route optimizer.
    pub fn replace_waypoints(&mut self, waypoints: Vec<Waypoint>) -> DomainResult<()> {
        for waypoint in &waypoints {
            waypoint.validate()?;
        }
        self.raise(MissionEvent::WaypointsReordered {
            mission_id: self.id.clone(),
            waypoints,
            timestamp: Utc::now(),
        })
    }

    pub fn clear(&mut self) -> DomainResult<()> {
        self.raise(MissionEvent::MissionCleared {
            mission_id: self.id.clone(),
            timestamp: Utc::now(),
        })
    }

    pub fn set_objective(&mut self, objective: Objective) -> DomainResult<()> {
        self.raise(MissionEvent::ObjectiveChanged {
            mission_id: self.id.clone(),
            objective,
            timestamp: Utc::now(),
        })
    }

    pub fn set_constraints(&mut self, constraints: ConstraintSet) -> DomainResult<()> {
        constraints.validate()?;
        self.raise(MissionEvent::ConstraintsChanged {
            mission_id: self.id.clone(),
            constraints,
            timestamp: Utc::now(),
        })
    }

    /// Reassign contiguous sequence numbers in current order.
    pub fn resequence(&mut self) {
        for (index, waypoint) in self.waypoints.iter_mut().enumerate() {
            waypoint.seq = index;
        }
    }

    fn check_index(&self, index: usize) -> DomainResult<()> {
        if index < self.waypoints.len() {
            Ok(())
        } else {
            Err(DomainError::IndexOutOfRange { index, len: self.waypoints.len() })
        }
    }
}

/// Field-for-field equality of the persisted content; version and pending
/// events are bookkeeping and do not take part.
impl PartialEq for Mission {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.waypoints == other.waypoints
            && self.objective == other.objective
            && self.constraints == other.constraints
    }
}

impl AggregateRoot for Mission {
    type Event = MissionEvent;

    fn aggregate_id(&self) -> &str { &self.id }
    fn version(&self) -> u64 { self.version }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            MissionEvent::MissionCreated { .. } => {
                // Creation is handled in the constructor
            }
            MissionEvent::WaypointAdded { waypoint, .. } => {
                self.waypoints.push(waypoint.clone());
                self.resequence();
            }
            MissionEvent::WaypointInserted { index, waypoint, .. } => {
                if *index > self.waypoints.len() {
                    return Err(DomainError::IndexOutOfRange {
                        index: *index,
                        len: self.waypoints.len(),
                    });
                }
                self.waypoints.insert(*index, waypoint.clone());
                self.resequence();
            }
            MissionEvent::WaypointRemoved { index, .. } => {
                self.check_index(*index)?;
                self.waypoints.remove(*index);
                self.resequence();
            }
            MissionEvent::WaypointMoved { from, to, .. } => {
                self.check_index(*from)?;
                self.check_index(*to)?;
                let waypoint = self.waypoints.remove(*from);
                self.waypoints.insert(*to, waypoint);
                self.resequence();
            }
            MissionEvent::WaypointUpdated { index, waypoint, .. } => {
                self.check_index(*index)?;
                self.waypoints[*index] = waypoint.clone();
                self.resequence();
            }
            MissionEvent::WaypointsReordered { waypoints, .. } => {
                self.waypoints = waypoints.clone();
                self.resequence();
            }
            MissionEvent::MissionCleared { .. } => {
                self.waypoints.clear();
            }
            MissionEvent::ObjectiveChanged { objective, .. } => {
                self.objective = *objective;
            }
            MissionEvent::ConstraintsChanged { constraints, .. } => {
                self.constraints = constraints.clone();
            }
        }

        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] { &self.uncommitted_events }
    fn mark_events_as_committed(&mut self) { self.uncommitted_events.clear(); }
    fn add_event(&mut self, event: Self::Event) { self.uncommitted_events.push(event); }
}
