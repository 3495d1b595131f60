use super::geo_cost::{
    coverage_score, route_distance, route_energy, route_time, CoverageParams, VehicleProfile,
};
use crate::domains::mission::{Objective, Waypoint};

/// Cost of flying a route in the given order. The optimizer minimizes it.
pub trait RouteCost: Send + Sync {
    fn name(&self) -> &'static str;

    fn cost(&self, route: &[Waypoint]) -> f64;

    /// True when the cost only depends on the set of points, so no reordering
    /// can ever improve it.
    fn is_order_invariant(&self) -> bool {
        false
    }
}

pub struct DistanceCost;

impl RouteCost for DistanceCost {
    fn name(&self) -> &'static str { "distance" }

    fn cost(&self, route: &[Waypoint]) -> f64 {
        route_distance(route)
    }
}

pub struct TimeCost {
    pub profile: VehicleProfile,
}

impl RouteCost for TimeCost {
    fn name(&self) -> &'static str { "time" }

    fn cost(&self, route: &[Waypoint]) -> f64 {
        route_time(route, &self.profile)
    }
}

pub struct EnergyCost {
    pub profile: VehicleProfile,
}

impl RouteCost for EnergyCost {
    fn name(&self) -> &'static str { "energy" }

    fn cost(&self, route: &[Waypoint]) -> f64 {
        route_energy(route, &self.profile)
    }
}

/// Negated coverage score.
pub struct CoverageCost {
    pub params: CoverageParams,
}

impl RouteCost for CoverageCost {
    fn name(&self) -> &'static str { "coverage" }

    fn cost(&self, route: &[Waypoint]) -> f64 {
        -(coverage_score(route, &self.params) as f64)
    }

    fn is_order_invariant(&self) -> bool {
        true
    }
}

pub fn cost_for(
    objective: Objective,
    profile: VehicleProfile,
    coverage: CoverageParams,
) -> Box<dyn RouteCost> {
    match objective {
        Objective::MinDistance => Box::new(DistanceCost),
        Objective::MinTime => Box::new(TimeCost { profile }),
        Objective::MinEnergy => Box::new(EnergyCost { profile }),
        Objective::MaxCoverage => Box::new(CoverageCost { params: coverage }),
    }
}
