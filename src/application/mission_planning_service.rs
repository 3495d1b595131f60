use crate::adapters::outbound::mission_to_geojson_string;
use crate::common::{AggregateRoot, ApplicationError, ApplicationResult, DomainEvent};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{ConstraintSet, Mission, MissionStore, Objective, Waypoint};
use crate::domains::mission_execution::{
    ExecutionState, ListenerId, MissionExecutor, WaypointReached,
};
use crate::domains::route_optimization::{OptimizationResult, OptimizerConfig, RouteOptimizer};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Result of `plan_route`.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    pub result: OptimizationResult,
    /// False when the search failed or the mission was edited or replaced while it ran.
    pub adopted: bool,
}

/// Orchestration surface for a mission editor: edit, plan, persist, fly.
pub struct MissionPlanningService {
    mission: RwLock<Mission>,
    optimizer_config: OptimizerConfig,
    executor: MissionExecutor,
    store: Arc<dyn MissionStore>,
    logger: DynLogger,
    planning_cancel: Mutex<Option<Arc<AtomicBool>>>,
    /// Bumped under the mission write lock on every edit and load.
    generation: AtomicU64,
}

impl MissionPlanningService {
    pub fn new(
        mission: Mission,
        optimizer_config: OptimizerConfig,
        executor: MissionExecutor,
        store: Arc<dyn MissionStore>,
        logger: DynLogger,
    ) -> Self {
        Self {
            mission: RwLock::new(mission),
            optimizer_config,
            executor,
            store,
            logger,
            planning_cancel: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the mission being edited.
    pub async fn mission(&self) -> Mission {
        self.mission.read().await.clone()
    }

    pub fn executor(&self) -> &MissionExecutor {
        &self.executor
    }

    pub async fn add_waypoint(&self, waypoint: Waypoint) -> ApplicationResult<usize> {
        self.edit(|mission| mission.add_waypoint(waypoint)).await
    }

    pub async fn insert_waypoint(&self, index: usize, waypoint: Waypoint) -> ApplicationResult<()> {
        self.edit(|mission| mission.insert_waypoint(index, waypoint)).await
    }

    pub async fn remove_waypoint(&self, index: usize) -> ApplicationResult<Waypoint> {
        self.edit(|mission| mission.remove_waypoint(index)).await
    }

    pub async fn move_waypoint(&self, from: usize, to: usize) -> ApplicationResult<()> {
        self.edit(|mission| mission.move_waypoint(from, to)).await
    }

    pub async fn update_waypoint(&self, index: usize, waypoint: Waypoint) -> ApplicationResult<()> {
        self.edit(|mission| mission.update_waypoint(index, waypoint)).await
    }

    pub async fn clear_waypoints(&self) -> ApplicationResult<()> {
        self.edit(|mission| mission.clear()).await
    }

    pub async fn set_objective(&self, objective: Objective) -> ApplicationResult<()> {
        self.edit(|mission| mission.set_objective(objective)).await
    }

    pub async fn set_constraints(&self, constraints: ConstraintSet) -> ApplicationResult<()> {
        self.edit(|mission| mission.set_constraints(constraints)).await
    }

    async fn edit<T, F>(&self, op: F) -> ApplicationResult<T>
    where
        F: FnOnce(&mut Mission) -> crate::common::DomainResult<T>,
    {
        let mut mission = self.mission.write().await;
        let out = op(&mut mission)?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        for event in mission.uncommitted_events() {
            tracing::debug!(mission_id = %event.aggregate_id(), "{}", event.event_type());
        }
        mission.mark_events_as_committed();
        Ok(out)
    }

    /// Optimize the current waypoints on the blocking pool and adopt the new
    /// order when the search succeeded and the mission is unchanged.
    pub async fn plan_route(&self) -> ApplicationResult<PlannedRoute> {
        let (waypoints, objective, constraints, generation) = {
            let mission = self.mission.read().await;
            (
                mission.waypoints().to_vec(),
                mission.objective(),
                mission.constraints().clone(),
                self.generation.load(Ordering::SeqCst),
            )
        };

        let cancel = Arc::new(AtomicBool::new(false));
        *self.lock_cancel() = Some(cancel.clone());

        let optimizer = RouteOptimizer::new(self.optimizer_config.clone())
            .with_logger(self.logger.clone())
            .with_cancel_flag(cancel);
        let result = tokio::task::spawn_blocking(move || {
            optimizer.optimize(&waypoints, objective, &constraints)
        })
        .await
        .map_err(|e| ApplicationError::Task(format!("route optimization task failed: {}", e)));
        *self.lock_cancel() = None;
        let result = result?;

        if !result.success() {
            self.logger.warn(&format!("Route planning failed: {:?}", result.status));
            return Ok(PlannedRoute { result, adopted: false });
        }

        let mut mission = self.mission.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            self.logger
                .warn("Mission changed while planning; optimized order discarded");
            return Ok(PlannedRoute { result, adopted: false });
        }
        mission.replace_waypoints(result.waypoints.clone())?;
        mission.mark_events_as_committed();
        self.generation.fetch_add(1, Ordering::SeqCst);

        self.logger.info(&format!(
            "Route planned for mission {}: cost {:.2} -> {:.2}, {} improvements",
            mission.id, result.initial_cost, result.final_cost, result.improvements
        ));
        if result.constraints_violated {
            for violation in &result.violations {
                self.logger.warn(&format!("Constraint violated: {}", violation));
            }
        }
        Ok(PlannedRoute { result, adopted: true })
    }

    /// Stop a running `plan_route`; it returns the best order found so far.
    pub fn cancel_planning(&self) -> bool {
        match self.lock_cancel().as_ref() {
            Some(flag) => {
                flag.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    fn lock_cancel(&self) -> std::sync::MutexGuard<'_, Option<Arc<AtomicBool>>> {
        self.planning_cancel.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn save(&self, name: &str) -> ApplicationResult<()> {
        let mission = self.mission.read().await;
        self.store.save_mission(name, &mission)?;
        self.logger.info(&format!("Mission {} saved as '{}'", mission.id, name));
        Ok(())
    }

    /// Replace the edited mission with a stored one.
    pub async fn load(&self, name: &str) -> ApplicationResult<()> {
        let loaded = self.store.load_mission(name)?;
        self.logger.info(&format!(
            "Mission '{}' loaded with {} waypoints",
            name,
            loaded.len()
        ));
        let mut mission = self.mission.write().await;
        *mission = loaded;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub fn list_missions(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.store.list_missions()?)
    }

    pub fn delete_mission(&self, name: &str) -> ApplicationResult<()> {
        Ok(self.store.delete_mission(name)?)
    }

    pub async fn export_geojson(&self) -> String {
        mission_to_geojson_string(&*self.mission.read().await)
    }

    /// Fly a copy of the current waypoints.
    pub async fn start(&self) -> ApplicationResult<bool> {
        let waypoints = self.mission.read().await.waypoints().to_vec();
        Ok(self.executor.start(waypoints).await?)
    }

    pub fn pause(&self) -> bool {
        self.executor.pause()
    }

    pub fn resume(&self) -> bool {
        self.executor.resume()
    }

    pub async fn abort(&self) {
        self.executor.abort().await
    }

    pub fn execution_state(&self) -> ExecutionState {
        self.executor.current_state()
    }

    pub fn current_waypoint_index(&self) -> usize {
        self.executor.current_waypoint_index()
    }

    pub fn on_waypoint_reached<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&WaypointReached) + Send + Sync + 'static,
    {
        self.executor.on_waypoint_reached(callback)
    }

    pub fn on_state_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(ExecutionState, ExecutionState) + Send + Sync + 'static,
    {
        self.executor.on_state_changed(callback)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.executor.remove_listener(id)
    }
}
