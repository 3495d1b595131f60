use mission_planner::adapters::outbound::{
    init_combined_logger, init_tracing_logger, FilesystemMissionStore, SimulatedVehicleLink,
};
use mission_planner::application::MissionPlanningService;
use mission_planner::domains::logger::DynLogger;
use mission_planner::domains::mission::{CommandKind, Mission, Objective, Waypoint};
use mission_planner::domains::mission_execution::{
    ExecutionEventActor, ExecutionState, MissionExecutor,
};
use mission_planner::Config;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // The `log` facade is left to fast_log, so no LogTracer bridge here.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting mission planner");

    let config = if Path::new("config.toml").exists() {
        Config::from_file("config.toml").await?
    } else {
        warn!("config.toml not found, using defaults");
        Config::default()
    };

    let logger: DynLogger = match &config.logging.file {
        Some(path) => init_combined_logger(path, &config.logging.level),
        None => init_tracing_logger(),
    };

    let mission = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading mission from {}", path);
            Mission::load(&path)?
        }
        None => demo_mission()?,
    };
    info!("Mission '{}' with {} waypoints", mission.name, mission.len());

    let start = mission.waypoint(0)?.position();
    let link = Arc::new(SimulatedVehicleLink::new(start, config.simulation.clone()));
    let executor = MissionExecutor::new(link, config.executor_config(), logger.clone());

    let (event_tx, event_rx) = mpsc::channel(256);
    executor.set_event_sink(event_tx);
    let mut actor = ExecutionEventActor::new(event_rx);
    let progress = actor.store();
    tokio::spawn(async move { actor.run().await });

    let store = Arc::new(FilesystemMissionStore::new(config.storage.data_dir.clone()));
    let service = MissionPlanningService::new(
        mission,
        config.optimizer_config(),
        executor,
        store,
        logger.clone(),
    );

    let planned = service.plan_route().await?;
    info!(
        "Planned route: {:?}, cost {:.1} -> {:.1} after {} passes",
        planned.result.status,
        planned.result.initial_cost,
        planned.result.final_cost,
        planned.result.passes
    );

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    service.on_waypoint_reached(|reached| {
        info!(
            "Reached waypoint {}/{} (seq {}, {:.1} m off)",
            reached.index + 1,
            reached.total,
            reached.waypoint.seq,
            reached.distance
        );
    });
    service.on_state_changed(move |from, to| {
        info!("Execution {} -> {}", from, to);
        if to.is_terminal() {
            let _ = done_tx.send(to);
        }
    });

    if !service.start().await? {
        error!("Executor refused to start");
        return Ok(());
    }

    tokio::select! {
        state = done_rx.recv() => {
            match state {
                Some(ExecutionState::Completed) => info!("Mission completed"),
                Some(state) => error!("Mission ended in {}", state),
                None => warn!("Executor listeners dropped"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, aborting mission");
            service.abort().await;
        }
    }

    // Let the actor drain the last events.
    tokio::time::sleep(Duration::from_millis(50)).await;
    if let Some(run) = progress.read().await.progress.get(&service.executor().run_id()) {
        info!("Reached {} waypoints in run {}", run.reached.len(), run.run_id);
    }

    log::logger().flush();
    info!("Shutting down mission planner");
    Ok(())
}

/// A small survey pattern around Zurich, deliberately out of order.
fn demo_mission() -> Result<Mission, Box<dyn Error>> {
    let mut mission = Mission::new("demo survey");
    mission.set_objective(Objective::MinDistance)?;
    mission.add_waypoint(Waypoint::new(47.3769, 8.5417, 10.0).with_command(CommandKind::Takeoff))?;
    for (lat, lon) in [
        (47.3790, 8.5440),
        (47.3772, 8.5445),
        (47.3788, 8.5420),
        (47.3775, 8.5432),
    ] {
        mission.add_waypoint(Waypoint::new(lat, lon, 40.0).with_hold_time(2.0))?;
    }
    Ok(mission)
}
