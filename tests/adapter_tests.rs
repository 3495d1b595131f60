use mission_planner::adapters::outbound::*;
use mission_planner::common::DomainError;
use mission_planner::domains::mission::*;
use mission_planner::domains::mission_execution::{VehicleLink, VehicleLinkError};
use mission_planner::domains::route_optimization::{distance_3d, horizontal_distance};
use mission_planner::Config;
use std::time::Duration;
use tempfile::tempdir;

fn sample_mission(name: &str) -> Mission {
    let mut mission = Mission::new(name);
    mission
        .add_waypoint(Waypoint::new(47.3769, 8.5417, 10.0).with_command(CommandKind::Takeoff))
        .unwrap();
    mission.add_waypoint(Waypoint::new(47.3780, 8.5430, 40.0).with_hold_time(3.0)).unwrap();
    mission
        .add_waypoint(Waypoint::new(47.3790, 8.5440, 0.0).with_command(CommandKind::Land))
        .unwrap();
    mission
}

#[test]
fn test_filesystem_store_save_list_load_delete() {
    let dir = tempdir().unwrap();
    let store = FilesystemMissionStore::new(Some(dir.path().to_path_buf()));

    assert!(store.list_missions().unwrap().is_empty());

    let beta = sample_mission("beta");
    let alpha = sample_mission("alpha");
    store.save_mission("beta", &beta).unwrap();
    store.save_mission("alpha", &alpha).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a mission").unwrap();

    assert_eq!(store.list_missions().unwrap(), vec!["alpha".to_string(), "beta".to_string()]);
    assert!(dir.path().join("alpha.mission.json").exists());

    let loaded = store.load_mission("beta").unwrap();
    assert_eq!(loaded, beta);

    store.delete_mission("beta").unwrap();
    assert_eq!(store.list_missions().unwrap(), vec!["alpha".to_string()]);
    assert!(matches!(store.load_mission("beta"), Err(DomainError::InfrastructureError(_))));
    assert!(matches!(store.delete_mission("beta"), Err(DomainError::InfrastructureError(_))));
}

#[test]
fn test_filesystem_store_creates_base_dir_and_rejects_bad_names() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("a").join("b");
    let store = FilesystemMissionStore::new(Some(base.clone()));
    assert_eq!(store.base_dir(), base.as_path());

    store.save_mission("survey", &sample_mission("survey")).unwrap();
    assert!(base.join("survey.mission.json").exists());

    for bad in ["", "../escape", "nested/name", ".hidden"] {
        assert!(matches!(
            store.save_mission(bad, &sample_mission("x")),
            Err(DomainError::InvalidInput { .. })
        ));
    }
}

#[test]
fn test_geojson_export_line_and_points() {
    let mission = sample_mission("export");
    let collection = mission_to_geojson(&mission);

    assert_eq!(collection.features.len(), 4);

    let line = collection.features[0].geometry.as_ref().unwrap();
    match &line.value {
        geojson::Value::LineString(coords) => {
            assert_eq!(coords.len(), 3);
            assert_eq!(coords[0], vec![8.5417, 47.3769, 10.0]);
        }
        other => panic!("expected LineString, got {:?}", other),
    }
    assert_eq!(
        collection.features[0].property("name"),
        Some(&serde_json::json!("export"))
    );

    for (i, feature) in collection.features[1..].iter().enumerate() {
        assert!(matches!(
            feature.geometry.as_ref().unwrap().value,
            geojson::Value::Point(_)
        ));
        assert_eq!(feature.property("seq"), Some(&serde_json::json!(i)));
    }
    assert_eq!(
        collection.features[1].property("command"),
        Some(&serde_json::json!("TAKEOFF"))
    );
    assert_eq!(collection.features[2].property("hold_time"), Some(&serde_json::json!(3.0)));
    assert_eq!(collection.features[3].property("altitude"), Some(&serde_json::json!(0.0)));
}

#[test]
fn test_geojson_export_parses_back() {
    let text = mission_to_geojson_string(&sample_mission("parse"));
    let parsed: geojson::GeoJson = text.parse().unwrap();
    match parsed {
        geojson::GeoJson::FeatureCollection(fc) => assert_eq!(fc.features.len(), 4),
        _ => panic!("expected a FeatureCollection"),
    }

    let mut single = Mission::new("single");
    single.add_waypoint(Waypoint::new(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(mission_to_geojson(&single).features.len(), 1);
    assert!(mission_to_geojson(&Mission::new("empty")).features.is_empty());
}

fn fast_simulation() -> SimulationConfig {
    SimulationConfig {
        horizontal_speed: 15.0,
        vertical_speed: 5.0,
        time_scale: 100.0,
        position_noise_m: 0.0,
    }
}

#[tokio::test]
async fn test_simulated_link_flies_to_commanded_waypoint() {
    let start = GeoPosition::new(47.0, 8.0, 0.0);
    let link = SimulatedVehicleLink::new(start, fast_simulation());

    let target = Waypoint::new(47.0, 8.0007, 20.0);
    link.send_navigation_command(&target).await.unwrap();
    assert_eq!(link.commands_sent(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let position = link.current_position().await.unwrap();
    assert!(distance_3d(&position, &target.position()) < 1e-6);
}

#[tokio::test]
async fn test_simulated_link_moves_gradually() {
    let start = GeoPosition::new(47.0, 8.0, 30.0);
    let config = SimulationConfig { time_scale: 1.0, ..fast_simulation() };
    let link = SimulatedVehicleLink::new(start, config);

    // About 7.6 km away: far more than a few milliseconds of flight
    let target = Waypoint::new(47.0, 8.1, 30.0);
    link.send_navigation_command(&target).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let position = link.current_position().await.unwrap();
    let travelled = horizontal_distance(&start, &position);
    assert!(travelled > 0.0);
    assert!(travelled < 1000.0, "travelled {}", travelled);
    assert!(horizontal_distance(&position, &target.position()) > 6000.0);
}

#[tokio::test]
async fn test_simulated_link_fault_injection() {
    let link = SimulatedVehicleLink::new(GeoPosition::new(0.0, 0.0, 0.0), fast_simulation());
    let wp = Waypoint::new(0.0, 0.001, 10.0);

    link.fail_after(1);
    link.send_navigation_command(&wp).await.unwrap();
    assert!(matches!(
        link.send_navigation_command(&wp).await,
        Err(VehicleLinkError::CommandRejected(_))
    ));
    assert_eq!(link.commands_sent(), 1);

    link.set_disconnected(true);
    assert_eq!(link.current_position().await, Err(VehicleLinkError::Disconnected));
    link.set_disconnected(false);
    assert!(link.current_position().await.is_ok());
}

#[tokio::test]
async fn test_simulated_link_noise_stays_bounded() {
    let start = GeoPosition::new(10.0, 10.0, 50.0);
    let config = SimulationConfig { position_noise_m: 5.0, ..fast_simulation() };
    let link = SimulatedVehicleLink::new(start, config);

    for _ in 0..50 {
        let reported = link.current_position().await.unwrap();
        assert!(distance_3d(&reported, &start) < 8.0);
    }
    assert_eq!(link.true_position(), start);
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.optimizer.max_passes, 1000);
    assert_eq!(config.optimizer_config().max_duration, Duration::from_secs(5));
    assert_eq!(config.executor_config().tick_interval, Duration::from_millis(100));
    assert_eq!(config.executor_config().reach_threshold_m, 10.0);
    assert_eq!(config.logging.level, "info");
    assert!(config.storage.data_dir.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_from_partial_toml() {
    let config = Config::from_toml(
        r#"
        [optimizer]
        max_passes = 10

        [vehicle]
        horizontal_speed = 12.0

        [executor]
        tick_interval_ms = 50

        [storage]
        data_dir = "/tmp/missions"
        "#,
    )
    .unwrap();

    assert_eq!(config.optimizer.max_passes, 10);
    assert_eq!(config.optimizer.max_duration_ms, 5000);
    assert_eq!(config.vehicle.horizontal_speed, 12.0);
    assert_eq!(config.vehicle.vertical_speed, 5.0);
    assert_eq!(config.executor_config().tick_interval, Duration::from_millis(50));
    assert_eq!(config.optimizer_config().vehicle.horizontal_speed, 12.0);
    assert_eq!(config.storage.data_dir.as_deref(), Some(std::path::Path::new("/tmp/missions")));
}

#[test]
fn test_config_rejects_invalid_values() {
    assert!(Config::from_toml("[executor]\ntick_interval_ms = 0\n").is_err());
    assert!(Config::from_toml("[vehicle]\nhorizontal_speed = -1.0\n").is_err());
    assert!(Config::from_toml("not toml at all [").is_err());

    assert!(Config::from_toml("[simulation]\nvertical_speed = 0.0\n").is_err());
    assert!(Config::from_toml("[simulation]\nposition_noise_m = nan\n").is_err());
    assert!(Config::from_toml("[simulation]\nposition_noise_m = inf\n").is_err());
    assert!(Config::from_toml("[simulation]\nposition_noise_m = -1.0\n").is_err());
    assert!(Config::from_toml("[coverage]\nradius = -5.0\n").is_err());
    assert!(Config::from_toml("[vehicle]\nvertical_speed = inf\n").is_err());

    let zero_noise = Config::from_toml("[simulation]\nposition_noise_m = 0.0\n").unwrap();
    assert_eq!(zero_noise.simulation.position_noise_m, 0.0);
}

#[tokio::test]
async fn test_simulated_link_ignores_non_finite_noise() {
    let start = GeoPosition::new(10.0, 10.0, 50.0);
    let config = SimulationConfig { position_noise_m: f64::NAN, ..fast_simulation() };
    let link = SimulatedVehicleLink::new(start, config);

    assert_eq!(link.current_position().await.unwrap(), start);
}

#[tokio::test]
async fn test_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

    let config = Config::from_file(&path).await.unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(Config::from_file(dir.path().join("missing.toml")).await.is_err());
}
