//! Static reference documents exposed through `resources/*`.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDefinition {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

pub struct Resource {
    pub definition: ResourceDefinition,
    content: fn() -> Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    pub text: String,
}

pub fn catalog() -> Vec<Resource> {
    vec![
        Resource {
            definition: ResourceDefinition {
                uri: "postgsail://postgsail_overview",
                name: "PostgSail Overview",
                description: "Core concepts and data model structure of SignalK's PostgSail",
                mime_type: "application/json",
            },
            content: overview,
        },
        Resource {
            definition: ResourceDefinition {
                uri: "https://api.openplotter.cloud/",
                name: "PostgSail OpenAPI Specification",
                description: "This provides a list of all endpoints (tables, foreign tables, views, functions), along with supported HTTP verbs and example payloads",
                mime_type: "application/json",
            },
            content: openapi,
        },
        Resource {
            definition: ResourceDefinition {
                uri: "postgsail://data_model_reference",
                name: "SignalK Data Model Reference",
                description: "Comprehensive reference of SignalK paths and their meanings",
                mime_type: "application/json",
            },
            content: data_model_reference,
        },
        Resource {
            definition: ResourceDefinition {
                uri: "postgsail://path_categories_guide",
                name: "SignalK Path Categories Guide",
                description: "Guide to understanding and categorizing SignalK paths",
                mime_type: "application/json",
            },
            content: path_categories_guide,
        },
    ]
}

pub fn list() -> Vec<ResourceDefinition> {
    catalog().into_iter().map(|r| r.definition).collect()
}

/// `None` when no resource has this URI.
pub fn read(uri: &str) -> Option<ResourceContents> {
    catalog()
        .into_iter()
        .find(|r| r.definition.uri == uri)
        .map(|r| ResourceContents {
            uri: uri.to_string(),
            mime_type: r.definition.mime_type,
            text: serde_json::to_string_pretty(&(r.content)()).unwrap_or_default(),
        })
}

fn overview() -> Value {
    json!({
        "name": "PostgSail",
        "summary": "Open-source cloud logbook for SignalK vessels. A SignalK plugin streams position and sensor metrics; the backend derives voyages (logs), stays and moorages automatically.",
        "concepts": {
            "vessel": "The boat registered by the user, with identity (name, MMSI, type, dimensions) and last-known position.",
            "metrics": "Time series of SignalK values (navigation, environment, electrical, tanks) sent by the plugin.",
            "log": "A voyage between two moorages, detected from movement. Has start/end time, distance, duration and a GeoJSON track.",
            "stay": "A period the vessel was stationary, with arrival/departure time and a stay type.",
            "moorage": "A place the vessel stayed at one or more times: marina, anchorage or mooring buoy.",
            "stay_type": {
                "1": "Unknown",
                "2": "Anchor",
                "3": "Mooring Buoy",
                "4": "Dock"
            },
            "monitoring": "The most recent metrics snapshot and its live GeoJSON position.",
            "badges": "Achievements unlocked by sailing milestones.",
            "eventlogs": "Notifications and alerts raised by the backend."
        },
        "api": {
            "style": "PostgREST: views are read with GET and filtered with column=operator.value query parameters; functions are called under rpc/.",
            "auth": "Bearer JWT obtained from rpc/login or an API token.",
            "filters": {
                "eq": "equals",
                "gte": "greater than or equal",
                "lte": "less than or equal",
                "not.is.null": "value is present"
            }
        },
        "views": [
            "vessels_view", "logs_view", "log_view", "logs_geojson_view",
            "moorages_view", "moorage_view", "moorages_stays_view",
            "stays_view", "stay_view", "stays_geojson_view",
            "monitoring_view", "monitoring_live",
            "stats_logs_view", "stats_moorages_view", "total_info_view",
            "eventlogs_view", "badges_view"
        ]
    })
}

fn openapi() -> Value {
    json!({
        "title": "PostgSail OpenAPI Specification",
        "url": "https://api.openplotter.cloud/",
        "format": "OpenAPI 2.0 served by PostgREST at the API root",
        "note": "Fetch the URL with an Accept: application/openapi+json header for the full machine-readable specification.",
        "endpoints": {
            "rpc/login": "POST {email, pass} -> {token}",
            "rpc/vessel_fn": "GET -> {vessel}",
            "rpc/settings_fn": "GET -> {settings}",
            "rpc/monitoring_history_fn": "POST {start_date, end_date, sensors}",
            "rpc/stats_fn": "POST {timeframe}",
            "rpc/export_logbook_gpx_trip_fn": "POST {_id} -> GPX (text/xml)",
            "rpc/export_logbook_geojson_trip_fn": "POST {_id} -> GeoJSON",
            "rpc/export_logbook_kml_trip_fn": "POST {_id} -> KML",
            "rpc/export_logbooks_geojson_point_trips_fn": "GET ?start_date&end_date -> GeoJSON points",
            "rpc/export_logbooks_geojson_linestring_trips_fn": "GET ?start_date&end_date -> GeoJSON linestrings",
            "metadata": "GET ?select=configuration,available_keys"
        }
    })
}

fn data_model_reference() -> Value {
    json!({
        "navigation.position": "Latitude/longitude of the vessel (degrees)",
        "navigation.speedOverGround": "Speed over ground (m/s)",
        "navigation.courseOverGroundTrue": "Course over ground, true (radians)",
        "navigation.headingTrue": "Heading, true (radians)",
        "navigation.state": "Vessel state: moored, anchored, sailing, motoring",
        "navigation.anchor.position": "Position of the dropped anchor",
        "navigation.anchor.maxRadius": "Anchor alarm radius (m)",
        "environment.wind.speedTrue": "True wind speed (m/s)",
        "environment.wind.speedOverGround": "Wind speed over ground (m/s)",
        "environment.wind.directionTrue": "True wind direction (radians)",
        "environment.wind.speedApparent": "Apparent wind speed (m/s)",
        "environment.depth.belowTransducer": "Water depth below transducer (m)",
        "environment.water.temperature": "Water temperature (K)",
        "environment.outside.temperature": "Outside air temperature (K)",
        "environment.outside.pressure": "Barometric pressure (Pa)",
        "environment.outside.humidity": "Outside relative humidity (ratio)",
        "environment.inside.temperature": "Cabin temperature (K)",
        "environment.inside.humidity": "Cabin relative humidity (ratio)",
        "electrical.batteries.*.voltage": "Battery voltage (V)",
        "electrical.batteries.*.capacity.stateOfCharge": "Battery state of charge (ratio)",
        "electrical.solar.*.panelPower": "Solar panel power (W)",
        "electrical.solar.*.panelVoltage": "Solar panel voltage (V)",
        "tanks.*.currentLevel": "Tank level (ratio)"
    })
}

fn path_categories_guide() -> Value {
    json!({
        "navigation": {
            "prefix": "navigation.",
            "use": "Position, speed, course, heading and vessel state; drives log and stay detection."
        },
        "environment": {
            "prefix": "environment.",
            "use": "Wind, depth, water and air conditions; shown in live monitoring and alerts."
        },
        "electrical": {
            "prefix": "electrical.",
            "use": "Batteries and solar production; used for low-battery alerting."
        },
        "tanks": {
            "prefix": "tanks.",
            "use": "Fuel, fresh water and waste levels."
        },
        "propulsion": {
            "prefix": "propulsion.",
            "use": "Engine state and run hours; distinguishes motoring from sailing."
        },
        "mapping": "get_vessel_mapping shows which SignalK path feeds each monitoring key (depthKey, voltageKey, windSpeedKey, ...) and which keys the vessel reports."
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_matches_catalog() {
        let uris: Vec<&str> = list().iter().map(|r| r.uri).collect();
        assert_eq!(
            uris,
            vec![
                "postgsail://postgsail_overview",
                "https://api.openplotter.cloud/",
                "postgsail://data_model_reference",
                "postgsail://path_categories_guide",
            ]
        );
    }

    #[test]
    fn every_resource_is_readable_json() {
        for def in list() {
            let contents = read(def.uri).unwrap();
            assert_eq!(contents.uri, def.uri);
            assert_eq!(contents.mime_type, "application/json");
            let parsed: Value = serde_json::from_str(&contents.text).unwrap();
            assert!(parsed.is_object());
        }
    }

    #[test]
    fn unknown_resource_is_none() {
        assert!(read("postgsail://nope").is_none());
    }
}
