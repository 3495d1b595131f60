use super::events::ExecutionEvent;
use super::ports::{VehicleLink, VehicleLinkError};
use super::state::ExecutionState;
use crate::common::{ExecutionError, ExecutionResult};
use crate::domains::logger::DynLogger;
use crate::domains::mission::Waypoint;
use crate::domains::route_optimization::distance_3d;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    pub tick_interval: Duration,
    /// A waypoint counts as reached when the 3D distance to it drops below this (meters).
    pub reach_threshold_m: f64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            reach_threshold_m: 10.0,
        }
    }
}

/// Payload handed to waypoint-reached listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointReached {
    pub run_id: String,
    pub index: usize,
    pub waypoint: Waypoint,
    pub total: usize,
    pub distance: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type WaypointListener = Arc<dyn Fn(&WaypointReached) + Send + Sync>;
type StateListener = Arc<dyn Fn(ExecutionState, ExecutionState) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    waypoint: Vec<(ListenerId, WaypointListener)>,
    state: Vec<(ListenerId, StateListener)>,
}

#[derive(Default)]
struct RunState {
    state: ExecutionState,
    current_index: usize,
    total: usize,
    run_id: String,
    last_fault: Option<String>,
    /// Bumped on every start and abort so a stale loop can never commit.
    generation: u64,
}

struct Shared {
    config: ExecutorConfig,
    link: Arc<dyn VehicleLink>,
    logger: DynLogger,
    run: Mutex<RunState>,
    listeners: Mutex<Listeners>,
    event_sink: Mutex<Option<mpsc::Sender<ExecutionEvent>>>,
}

struct RunningLoop {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

enum Tick {
    Continue,
    Finished,
}

/// Drives a vehicle through a waypoint sequence on a background tokio task.
///
/// State transitions are serialized through one lock, so a completion
/// detected by the loop and a concurrent `abort()` can never both finalize a
/// run. `abort()` joins the loop before returning.
pub struct MissionExecutor {
    shared: Arc<Shared>,
    task: tokio::sync::Mutex<Option<RunningLoop>>,
}

impl MissionExecutor {
    pub fn new(link: Arc<dyn VehicleLink>, config: ExecutorConfig, logger: DynLogger) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                link,
                logger,
                run: Mutex::new(RunState::default()),
                listeners: Mutex::new(Listeners::default()),
                event_sink: Mutex::new(None),
            }),
            task: tokio::sync::Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.shared.config
    }

    pub fn current_state(&self) -> ExecutionState {
        self.shared.lock_run().state
    }

    pub fn current_waypoint_index(&self) -> usize {
        self.shared.lock_run().current_index
    }

    pub fn total_waypoints(&self) -> usize {
        self.shared.lock_run().total
    }

    /// Id of the current or most recent run; empty before the first start.
    pub fn run_id(&self) -> String {
        self.shared.lock_run().run_id.clone()
    }

    pub fn last_fault(&self) -> Option<String> {
        self.shared.lock_run().last_fault.clone()
    }

    /// Mirror every execution event into `sender`. Events are dropped when the channel is full.
    pub fn set_event_sink(&self, sender: mpsc::Sender<ExecutionEvent>) {
        *self.shared.event_sink.lock().unwrap_or_else(|e| e.into_inner()) = Some(sender);
    }

    pub fn on_waypoint_reached<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&WaypointReached) + Send + Sync + 'static,
    {
        let mut listeners = self.shared.lock_listeners();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.waypoint.push((id, Arc::new(callback)));
        id
    }

    /// Called with `(from, to)` after every transition.
    pub fn on_state_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(ExecutionState, ExecutionState) + Send + Sync + 'static,
    {
        let mut listeners = self.shared.lock_listeners();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.state.push((id, Arc::new(callback)));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.lock_listeners();
        let before = listeners.waypoint.len() + listeners.state.len();
        listeners.waypoint.retain(|(listener, _)| *listener != id);
        listeners.state.retain(|(listener, _)| *listener != id);
        before != listeners.waypoint.len() + listeners.state.len()
    }

    /// Start flying `waypoints` from index 0. Returns `Ok(false)` without
    /// side effects when the executor is not IDLE.
    pub async fn start(&self, waypoints: Vec<Waypoint>) -> ExecutionResult<bool> {
        if waypoints.is_empty() {
            return Err(ExecutionError::InvalidInput {
                reason: "cannot start a mission without waypoints".to_string(),
            });
        }

        let mut task = self.task.lock().await;
        let (run_id, generation) = {
            let mut run = self.shared.lock_run();
            if run.state != ExecutionState::Idle {
                self.shared
                    .logger
                    .warn(&format!("Ignoring start request while {}", run.state));
                return Ok(false);
            }
            run.state = ExecutionState::Running;
            run.current_index = 0;
            run.total = waypoints.len();
            run.run_id = Uuid::new_v4().to_string();
            run.last_fault = None;
            run.generation += 1;
            (run.run_id.clone(), run.generation)
        };

        self.shared.logger.info(&format!(
            "Mission run {} started with {} waypoints",
            run_id,
            waypoints.len()
        ));
        self.shared
            .notify_state(&run_id, ExecutionState::Idle, ExecutionState::Running);

        let (shutdown, shutdown_rx) = watch::channel(false);
        let shared = self.shared.clone();
        let handle = tokio::spawn(async move {
            shared.run_loop(waypoints, generation, shutdown_rx).await;
        });
        *task = Some(RunningLoop { handle, shutdown });
        Ok(true)
    }

    /// RUNNING -> PAUSED. Returns whether the transition happened.
    pub fn pause(&self) -> bool {
        self.shared
            .transition(ExecutionState::Running, ExecutionState::Paused, "pause")
    }

    /// PAUSED -> RUNNING. Returns whether the transition happened.
    pub fn resume(&self) -> bool {
        self.shared
            .transition(ExecutionState::Paused, ExecutionState::Running, "resume")
    }

    /// Stop any run and return to IDLE. Safe from any state and any task;
    /// when this returns, the execution loop has fully stopped.
    pub async fn abort(&self) {
        let mut task = self.task.lock().await;
        let (previous, run_id) = {
            let mut run = self.shared.lock_run();
            let previous = run.state;
            run.state = ExecutionState::Idle;
            run.current_index = 0;
            run.generation += 1;
            (previous, run.run_id.clone())
        };

        if let Some(running) = task.take() {
            let _ = running.shutdown.send(true);
            if let Err(e) = running.handle.await {
                self.shared
                    .logger
                    .error(&format!("Execution loop for run {} ended abnormally: {}", run_id, e));
            }
        }

        if previous != ExecutionState::Idle {
            self.shared.logger.info(&format!("Mission run {} aborted from {}", run_id, previous));
            self.shared.notify_state(&run_id, previous, ExecutionState::Idle);
        }
    }
}

impl Drop for MissionExecutor {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.try_lock() {
            if let Some(running) = task.take() {
                let _ = running.shutdown.send(true);
                running.handle.abort();
            }
        }
    }
}

impl Shared {
    fn lock_run(&self) -> MutexGuard<'_, RunState> {
        self.run.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn transition(&self, from: ExecutionState, to: ExecutionState, action: &str) -> bool {
        let run_id = {
            let mut run = self.lock_run();
            if run.state != from {
                self.logger
                    .warn(&format!("Ignoring {} request while {}", action, run.state));
                return false;
            }
            run.state = to;
            run.run_id.clone()
        };
        self.logger.info(&format!("Mission run {} {} -> {}", run_id, from, to));
        self.notify_state(&run_id, from, to);
        true
    }

    async fn run_loop(
        self: Arc<Self>,
        waypoints: Vec<Waypoint>,
        generation: u64,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    if let Tick::Finished = self.tick(&waypoints, generation).await {
                        break;
                    }
                }
            }
        }
    }

    async fn tick(&self, waypoints: &[Waypoint], generation: u64) -> Tick {
        let index = {
            let run = self.lock_run();
            if run.generation != generation {
                return Tick::Finished;
            }
            match run.state {
                ExecutionState::Running => run.current_index,
                ExecutionState::Paused => return Tick::Continue,
                _ => return Tick::Finished,
            }
        };
        let target = &waypoints[index];

        if let Err(e) = self.link.send_navigation_command(target).await {
            return self.fault(index, generation, e);
        }
        let position = match self.link.current_position().await {
            Ok(position) => position,
            Err(e) => return self.fault(index, generation, e),
        };

        let distance = distance_3d(&position, &target.position());
        if distance >= self.config.reach_threshold_m {
            return Tick::Continue;
        }

        let (run_id, completed) = {
            let mut run = self.lock_run();
            if run.generation != generation {
                return Tick::Finished;
            }
            if run.state != ExecutionState::Running || run.current_index != index {
                return Tick::Continue;
            }
            run.current_index += 1;
            let completed = run.current_index >= waypoints.len();
            if completed {
                run.state = ExecutionState::Completed;
            }
            (run.run_id.clone(), completed)
        };

        let reached = WaypointReached {
            run_id: run_id.clone(),
            index,
            waypoint: target.clone(),
            total: waypoints.len(),
            distance,
            timestamp: Utc::now(),
        };
        self.logger.info(&format!(
            "Waypoint {}/{} reached (seq {}, {:.1} m)",
            index + 1,
            waypoints.len(),
            target.seq,
            distance
        ));
        self.notify_waypoint(&reached);

        if completed {
            self.logger.info(&format!("Mission run {} completed", run_id));
            self.notify_state(&run_id, ExecutionState::Running, ExecutionState::Completed);
            return Tick::Finished;
        }
        Tick::Continue
    }

    fn fault(&self, index: usize, generation: u64, error: VehicleLinkError) -> Tick {
        let reason = error.to_string();
        let run_id = {
            let mut run = self.lock_run();
            if run.generation != generation {
                return Tick::Finished;
            }
            if run.state != ExecutionState::Running {
                // Paused or finalized while the link call was in flight.
                self.logger.warn(&format!("Vehicle link error while {}: {}", run.state, reason));
                return if run.state == ExecutionState::Paused {
                    Tick::Continue
                } else {
                    Tick::Finished
                };
            }
            run.state = ExecutionState::Error;
            run.last_fault = Some(
                ExecutionError::NavigationFault { index, reason: reason.clone() }.to_string(),
            );
            run.run_id.clone()
        };

        self.logger.error(&format!(
            "Navigation fault at waypoint {} of run {}: {}",
            index, run_id, reason
        ));
        self.emit(ExecutionEvent::NavigationFault {
            run_id: run_id.clone(),
            index,
            reason,
            timestamp: Utc::now(),
        });
        self.notify_state(&run_id, ExecutionState::Running, ExecutionState::Error);
        Tick::Finished
    }

    fn notify_waypoint(&self, reached: &WaypointReached) {
        let callbacks: Vec<WaypointListener> = self
            .lock_listeners()
            .waypoint
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(reached);
        }

        self.emit(ExecutionEvent::WaypointReached {
            run_id: reached.run_id.clone(),
            index: reached.index,
            seq: reached.waypoint.seq,
            total: reached.total,
            distance: reached.distance,
            timestamp: reached.timestamp,
        });
    }

    fn notify_state(&self, run_id: &str, from: ExecutionState, to: ExecutionState) {
        let callbacks: Vec<StateListener> = self
            .lock_listeners()
            .state
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(from, to);
        }

        self.emit(ExecutionEvent::StateChanged {
            run_id: run_id.to_string(),
            from,
            to,
            timestamp: Utc::now(),
        });
    }

    fn emit(&self, event: ExecutionEvent) {
        let sink = self.event_sink.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(sender) = sink {
            let _ = sender.try_send(event);
        }
    }
}
