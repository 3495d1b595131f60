use super::constraints::{check_constraints, ConstraintViolation};
use super::cost::{cost_for, RouteCost};
use super::geo_cost::{CoverageParams, VehicleProfile};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{ConstraintSet, Objective, Waypoint};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Relative cost decrease a 2-opt move must beat to count as an improvement.
const IMPROVEMENT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub max_passes: usize,
    pub max_duration: Duration,
    pub vehicle: VehicleProfile,
    pub coverage: CoverageParams,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_passes: 1000,
            max_duration: Duration::from_secs(5),
            vehicle: VehicleProfile::default(),
            coverage: CoverageParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationStatus {
    /// Local optimum reached
    Optimized,
    /// Pass or time budget exhausted; the best tour found is returned
    Capped,
    /// Cancelled through the cancel flag; the best tour found is returned
    Cancelled,
    /// Nothing to optimize; the input order is returned
    InvalidInput(String),
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Input waypoints in the new order, with their original `seq` values.
    pub waypoints: Vec<Waypoint>,
    /// Input index flown k-th. Tracked by position, so duplicate `seq` values are fine.
    pub order: Vec<usize>,
    pub status: OptimizationStatus,
    pub objective: Objective,
    pub constraints_violated: bool,
    pub violations: Vec<ConstraintViolation>,
    pub initial_cost: f64,
    pub final_cost: f64,
    pub passes: usize,
    pub improvements: usize,
    pub elapsed: Duration,
}

impl OptimizationResult {
    pub fn success(&self) -> bool {
        !matches!(self.status, OptimizationStatus::InvalidInput(_))
    }
}

/// 2-opt local search over a waypoint path with a pluggable cost per objective.
///
/// The first waypoint stays fixed; the rest of the path is reordered by
/// reversing sub-sequences while that strictly lowers the cost.
pub struct RouteOptimizer {
    config: OptimizerConfig,
    logger: Option<DynLogger>,
    cancel: Option<Arc<AtomicBool>>,
}

impl RouteOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config, logger: None, cancel: None }
    }

    pub fn with_logger(mut self, logger: DynLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Setting the flag stops the search at the next row of candidate moves.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn optimize(
        &self,
        waypoints: &[Waypoint],
        objective: Objective,
        constraints: &ConstraintSet,
    ) -> OptimizationResult {
        let cost = cost_for(objective, self.config.vehicle, self.config.coverage);
        self.optimize_with(waypoints, objective, cost.as_ref(), constraints)
    }

    pub fn optimize_with(
        &self,
        waypoints: &[Waypoint],
        objective: Objective,
        cost: &dyn RouteCost,
        constraints: &ConstraintSet,
    ) -> OptimizationResult {
        let started = Instant::now();
        let mut route = waypoints.to_vec();
        let mut order: Vec<usize> = (0..route.len()).collect();

        if route.len() < 2 {
            let reason = format!("at least 2 waypoints are required, got {}", route.len());
            self.warn(&format!("Route optimization rejected: {}", reason));
            return self.finish(
                (route, order),
                OptimizationStatus::InvalidInput(reason),
                objective,
                constraints,
                (0.0, 0.0),
                (0, 0),
                started,
            );
        }

        // No ordering changes an order-invariant cost, so it is never evaluated.
        if cost.is_order_invariant() {
            self.info(&format!(
                "{} does not depend on order, keeping {} waypoints as given",
                cost.name(),
                route.len()
            ));
            return self.finish(
                (route, order),
                OptimizationStatus::Optimized,
                objective,
                constraints,
                (0.0, 0.0),
                (0, 0),
                started,
            );
        }

        let initial = cost.cost(&route);
        let mut best = initial;
        let mut passes = 0;
        let mut improvements = 0;
        let mut status = OptimizationStatus::Optimized;
        let n = route.len();

        if n > 2 {
            'search: loop {
                passes += 1;
                let mut improved = false;

                for i in 1..n - 1 {
                    if started.elapsed() >= self.config.max_duration {
                        status = OptimizationStatus::Capped;
                        break 'search;
                    }
                    if self.cancelled() {
                        status = OptimizationStatus::Cancelled;
                        break 'search;
                    }

                    for j in (i + 2)..=n {
                        route[i..j].reverse();
                        let candidate = cost.cost(&route);
                        if candidate < best - IMPROVEMENT_TOLERANCE * best.abs().max(1.0) {
                            best = candidate;
                            order[i..j].reverse();
                            improvements += 1;
                            improved = true;
                        } else {
                            route[i..j].reverse();
                        }
                    }
                }

                if !improved {
                    break;
                }
                if passes >= self.config.max_passes {
                    status = OptimizationStatus::Capped;
                    break;
                }
            }
        }

        if status == OptimizationStatus::Capped {
            self.warn(&format!(
                "Route optimization ({}) capped after {} passes, returning best tour so far",
                cost.name(),
                passes
            ));
        }
        self.info(&format!(
            "Optimized {} waypoints for {}: cost {:.3} -> {:.3} ({} improvements, {} passes)",
            n,
            cost.name(),
            initial,
            best,
            improvements,
            passes
        ));

        self.finish(
            (route, order),
            status,
            objective,
            constraints,
            (initial, best),
            (passes, improvements),
            started,
        )
    }

    fn finish(
        &self,
        (route, order): (Vec<Waypoint>, Vec<usize>),
        status: OptimizationStatus,
        objective: Objective,
        constraints: &ConstraintSet,
        (initial_cost, final_cost): (f64, f64),
        (passes, improvements): (usize, usize),
        started: Instant,
    ) -> OptimizationResult {
        let violations = check_constraints(&route, constraints);
        for violation in &violations {
            self.warn(&format!("Constraint violated: {}", violation));
        }

        OptimizationResult {
            waypoints: route,
            order,
            status,
            objective,
            constraints_violated: !violations.is_empty(),
            violations,
            initial_cost,
            final_cost,
            passes,
            improvements,
            elapsed: started.elapsed(),
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().map(|flag| flag.load(Ordering::Relaxed)).unwrap_or(false)
    }

    fn info(&self, msg: &str) {
        if let Some(logger) = &self.logger {
            logger.info(msg);
        }
    }

    fn warn(&self, msg: &str) {
        if let Some(logger) = &self.logger {
            logger.warn(msg);
        }
    }
}

impl Default for RouteOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}
