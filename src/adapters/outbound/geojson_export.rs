use crate::domains::mission::{Mission, Waypoint};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Mission as a FeatureCollection: one LineString for the flight path
/// followed by one Point per waypoint. Coordinates are `[lon, lat, alt]`.
pub fn mission_to_geojson(mission: &Mission) -> FeatureCollection {
    let waypoints = mission.waypoints();
    let mut features = Vec::with_capacity(waypoints.len() + 1);

    if waypoints.len() >= 2 {
        let line = waypoints.iter().map(coordinates).collect();
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!("route"));
        properties.insert("mission_id".to_string(), json!(mission.id));
        properties.insert("name".to_string(), json!(mission.name));
        properties.insert("objective".to_string(), json!(mission.objective()));
        features.push(feature(Value::LineString(line), properties));
    }

    for waypoint in waypoints {
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!("waypoint"));
        properties.insert("seq".to_string(), json!(waypoint.seq));
        properties.insert("command".to_string(), json!(waypoint.command));
        properties.insert("altitude".to_string(), json!(waypoint.altitude));
        properties.insert("frame".to_string(), json!(waypoint.frame));
        if let Some(hold) = waypoint.hold_time {
            properties.insert("hold_time".to_string(), json!(hold));
        }
        features.push(feature(Value::Point(coordinates(waypoint)), properties));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn mission_to_geojson_string(mission: &Mission) -> String {
    mission_to_geojson(mission).to_string()
}

fn coordinates(waypoint: &Waypoint) -> Vec<f64> {
    vec![waypoint.longitude, waypoint.latitude, waypoint.altitude]
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
