use mission_planner::adapters::outbound::*;
use mission_planner::application::MissionPlanningService;
use mission_planner::common::{ApplicationError, ExecutionError};
use mission_planner::domains::mission::*;
use mission_planner::domains::mission_execution::{ExecutionState, ExecutorConfig, MissionExecutor};
use mission_planner::domains::route_optimization::{route_distance, OptimizerConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

struct Harness {
    service: MissionPlanningService,
    logger: Arc<MemoryLogger>,
    dir: TempDir,
}

fn harness(mission: Mission) -> Harness {
    let dir = tempdir().unwrap();
    let logger = Arc::new(MemoryLogger::new());
    let link = Arc::new(SimulatedVehicleLink::new(
        GeoPosition::new(0.0, 0.0, 30.0),
        SimulationConfig {
            time_scale: 1000.0,
            ..SimulationConfig::default()
        },
    ));
    let executor = MissionExecutor::new(
        link,
        ExecutorConfig {
            tick_interval: Duration::from_millis(5),
            reach_threshold_m: 10.0,
        },
        logger.clone(),
    );
    let store = Arc::new(FilesystemMissionStore::new(Some(dir.path().to_path_buf())));
    let service = MissionPlanningService::new(
        mission,
        OptimizerConfig::default(),
        executor,
        store,
        logger.clone(),
    );
    Harness { service, logger, dir }
}

fn zig_zag_mission() -> Mission {
    let mut mission = Mission::new("zig-zag");
    for (lat, lon) in [
        (0.0, 0.0),
        (0.002, 0.002),
        (0.0, 0.0005),
        (0.002, 0.0005),
        (0.0, 0.0015),
        (0.002, 0.0),
    ] {
        mission.add_waypoint(Waypoint::new(lat, lon, 30.0)).unwrap();
    }
    mission
}

async fn wait_for_state(service: &MissionPlanningService, expected: ExecutionState) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while service.execution_state() != expected {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("service never reached {}", expected));
}

#[tokio::test]
async fn test_editing_through_the_service() {
    let h = harness(Mission::new("edit"));

    assert_eq!(h.service.add_waypoint(Waypoint::new(0.0, 0.0, 10.0)).await.unwrap(), 0);
    assert_eq!(h.service.add_waypoint(Waypoint::new(0.0, 0.001, 10.0)).await.unwrap(), 1);
    h.service.insert_waypoint(1, Waypoint::new(0.001, 0.0, 10.0)).await.unwrap();
    h.service.move_waypoint(2, 0).await.unwrap();
    h.service
        .update_waypoint(1, Waypoint::new(0.0, 0.0, 25.0).with_hold_time(1.0))
        .await
        .unwrap();
    h.service.set_objective(Objective::MinTime).await.unwrap();

    let mission = h.service.mission().await;
    let seqs: Vec<usize> = mission.waypoints().iter().map(|wp| wp.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert_eq!(mission.waypoint(0).unwrap().longitude, 0.001);
    assert_eq!(mission.waypoint(1).unwrap().altitude, 25.0);
    assert_eq!(mission.objective(), Objective::MinTime);

    let removed = h.service.remove_waypoint(2).await.unwrap();
    assert_eq!(removed.latitude, 0.001);
    assert!(matches!(
        h.service.remove_waypoint(5).await,
        Err(ApplicationError::Domain(_))
    ));

    h.service.clear_waypoints().await.unwrap();
    assert!(h.service.mission().await.is_empty());
}

#[tokio::test]
async fn test_plan_route_adopts_optimized_order() {
    let mission = zig_zag_mission();
    let before = route_distance(mission.waypoints());
    let h = harness(mission);

    let planned = h.service.plan_route().await.unwrap();
    assert!(planned.adopted);
    assert!(planned.result.success());
    assert!(planned.result.improvements > 0);

    let mission = h.service.mission().await;
    let seqs: Vec<usize> = mission.waypoints().iter().map(|wp| wp.seq).collect();
    assert_eq!(seqs, (0..6).collect::<Vec<_>>());
    assert_eq!(mission.waypoint(0).unwrap().latitude, 0.0);
    assert_eq!(mission.waypoint(0).unwrap().longitude, 0.0);
    assert!(route_distance(mission.waypoints()) < before);
    assert!(h.logger.contains(LogLevel::Info, "Route planned for mission"));
}

#[tokio::test]
async fn test_plan_route_with_too_few_waypoints_keeps_mission() {
    let mut mission = Mission::new("single");
    mission.add_waypoint(Waypoint::new(1.0, 1.0, 10.0)).unwrap();
    let h = harness(mission);

    let planned = h.service.plan_route().await.unwrap();
    assert!(!planned.adopted);
    assert!(!planned.result.success());
    assert_eq!(h.service.mission().await.len(), 1);
    assert!(h.logger.contains(LogLevel::Warn, "Route planning failed"));
    assert!(!h.service.cancel_planning());
}

#[tokio::test]
async fn test_save_load_and_list() {
    let h = harness(zig_zag_mission());
    let original = h.service.mission().await;

    h.service.save("survey").await.unwrap();
    assert_eq!(h.service.list_missions().unwrap(), vec!["survey".to_string()]);

    h.service.clear_waypoints().await.unwrap();
    h.service.load("survey").await.unwrap();
    assert_eq!(h.service.mission().await, original);

    h.service.delete_mission("survey").unwrap();
    assert!(h.service.list_missions().unwrap().is_empty());
    assert!(h.service.load("survey").await.is_err());
}

#[tokio::test]
async fn test_export_geojson() {
    let h = harness(zig_zag_mission());
    let text = h.service.export_geojson().await;

    let parsed: geojson::GeoJson = text.parse().unwrap();
    match parsed {
        geojson::GeoJson::FeatureCollection(fc) => assert_eq!(fc.features.len(), 7),
        _ => panic!("expected a FeatureCollection"),
    }
}

#[tokio::test]
async fn test_fly_planned_mission_to_completion() {
    let h = harness(zig_zag_mission());
    h.service.plan_route().await.unwrap();

    let reached = Arc::new(Mutex::new(Vec::new()));
    let sink = reached.clone();
    h.service.on_waypoint_reached(move |event| sink.lock().unwrap().push(event.waypoint.seq));

    assert!(h.service.start().await.unwrap());
    wait_for_state(&h.service, ExecutionState::Completed).await;

    assert_eq!(*reached.lock().unwrap(), (0..6).collect::<Vec<_>>());
    assert_eq!(h.service.current_waypoint_index(), 6);

    h.service.abort().await;
    assert_eq!(h.service.execution_state(), ExecutionState::Idle);
}

#[tokio::test]
async fn test_pause_resume_abort_through_service() {
    let mut mission = Mission::new("far");
    mission.add_waypoint(Waypoint::new(0.5, 0.5, 30.0)).unwrap();
    let h = harness(mission);

    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    let id = h.service.on_state_changed(move |_, to| sink.lock().unwrap().push(to));

    assert!(h.service.start().await.unwrap());
    assert!(h.service.pause());
    assert!(!h.service.pause());
    assert!(h.service.resume());
    h.service.abort().await;

    assert_eq!(
        *states.lock().unwrap(),
        vec![
            ExecutionState::Running,
            ExecutionState::Paused,
            ExecutionState::Running,
            ExecutionState::Idle,
        ]
    );
    assert!(h.service.remove_listener(id));
}

#[tokio::test]
async fn test_start_empty_mission_fails() {
    let h = harness(Mission::new("empty"));

    assert!(matches!(
        h.service.start().await,
        Err(ApplicationError::Execution(ExecutionError::InvalidInput { .. }))
    ));
    assert_eq!(h.service.execution_state(), ExecutionState::Idle);
}

/// Same id as the stored "b" mission, with enough points to keep the search busy.
fn large_mission(id: &str) -> Mission {
    let waypoints = (0..250)
        .map(|i| {
            let mut wp = Waypoint::new(
                ((i * 97) % 250) as f64 * 1e-5,
                ((i * 61) % 250) as f64 * 1e-5,
                30.0,
            );
            wp.seq = i;
            wp
        })
        .collect();
    Mission::from_parts(
        id.to_string(),
        "large".to_string(),
        waypoints,
        Objective::MinDistance,
        ConstraintSet::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_load_during_planning_discards_stale_order() {
    let h = harness(large_mission("fixed-id"));

    let mut small = Mission::from_parts(
        "fixed-id".to_string(),
        "b".to_string(),
        Vec::new(),
        Objective::MinDistance,
        ConstraintSet::default(),
    )
    .unwrap();
    for (lat, lon) in [(0.0, 0.0), (0.001, 0.0), (0.001, 0.001)] {
        small.add_waypoint(Waypoint::new(lat, lon, 30.0)).unwrap();
    }
    let store = FilesystemMissionStore::new(Some(h.dir.path().to_path_buf()));
    store.save_mission("b", &small).unwrap();

    let (planned, loaded) = tokio::join!(h.service.plan_route(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let loaded = h.service.load("b").await;
        h.service.cancel_planning();
        loaded
    });
    loaded.unwrap();
    let planned = planned.unwrap();

    assert!(!planned.adopted);
    assert_eq!(planned.result.waypoints.len(), 250);
    assert!(h.logger.contains(LogLevel::Warn, "optimized order discarded"));

    let mission = h.service.mission().await;
    assert_eq!(mission, small);
    assert_eq!(mission.len(), 3);
}

#[tokio::test]
async fn test_edit_during_planning_discards_stale_order() {
    let h = harness(large_mission("edited"));

    let (planned, added) = tokio::join!(h.service.plan_route(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let added = h.service.add_waypoint(Waypoint::new(0.01, 0.01, 30.0)).await;
        h.service.cancel_planning();
        added
    });
    assert_eq!(added.unwrap(), 250);
    assert!(!planned.unwrap().adopted);

    let mission = h.service.mission().await;
    assert_eq!(mission.len(), 251);
    assert_eq!(mission.waypoint(250).unwrap().latitude, 0.01);
    assert_eq!(mission, {
        let mut expected = large_mission("edited");
        expected.add_waypoint(Waypoint::new(0.01, 0.01, 30.0)).unwrap();
        expected
    });
}
