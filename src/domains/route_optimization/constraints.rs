use super::geo_cost::horizontal_distance;
use crate::domains::mission::{ConstraintSet, Waypoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ConstraintViolation {
    AltitudeExceeded {
        seq: usize,
        altitude: f64,
        limit: f64,
    },
    WaypointsTooClose {
        from_seq: usize,
        to_seq: usize,
        distance: f64,
        limit: f64,
    },
    OutsideRadius {
        seq: usize,
        distance: f64,
        limit: f64,
    },
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintViolation::AltitudeExceeded { seq, altitude, limit } => {
                write!(f, "waypoint {} altitude {:.1} m exceeds {:.1} m", seq, altitude, limit)
            }
            ConstraintViolation::WaypointsTooClose { from_seq, to_seq, distance, limit } => write!(
                f,
                "waypoints {} -> {} are {:.1} m apart, minimum is {:.1} m",
                from_seq, to_seq, distance, limit
            ),
            ConstraintViolation::OutsideRadius { seq, distance, limit } => {
                write!(
                    f,
                    "waypoint {} is {:.1} m from reference, limit {:.1} m",
                    seq, distance, limit
                )
            }
        }
    }
}

/// Check a route, in flight order, against every constraint in the set.
pub fn check_constraints(
    route: &[Waypoint],
    constraints: &ConstraintSet,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    for wp in route {
        if wp.altitude > constraints.max_altitude {
            violations.push(ConstraintViolation::AltitudeExceeded {
                seq: wp.seq,
                altitude: wp.altitude,
                limit: constraints.max_altitude,
            });
        }
    }

    for leg in route.windows(2) {
        let distance = horizontal_distance(&leg[0].position(), &leg[1].position());
        if distance < constraints.min_inter_waypoint_distance {
            violations.push(ConstraintViolation::WaypointsTooClose {
                from_seq: leg[0].seq,
                to_seq: leg[1].seq,
                distance,
                limit: constraints.min_inter_waypoint_distance,
            });
        }
    }

    if let Some(limit) = constraints.max_radius {
        let reference = constraints.reference.or_else(|| route.first().map(Waypoint::position));
        if let Some(reference) = reference {
            for wp in route {
                let distance = horizontal_distance(&reference, &wp.position());
                if distance > limit {
                    violations.push(ConstraintViolation::OutsideRadius {
                        seq: wp.seq,
                        distance,
                        limit,
                    });
                }
            }
        }
    }

    violations
}
