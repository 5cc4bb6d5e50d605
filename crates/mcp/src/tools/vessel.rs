use postgsail_client::{BackendResponse, PostgSailClient, StatsKind};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{args, first_element, unwrap_field, Tool, ToolError};

pub fn definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            "get_vessel",
            "Get current vessel information",
            json!({
                "type": "object",
                "properties": {}
            }),
            get_vessel,
        )
        .with_output_schema(vessel_schema()),
        Tool::new(
            "get_vessel_mapping",
            "Get vessel signalk path mapping configuration and the available keys",
            json!({
                "type": "object",
                "properties": {}
            }),
            get_vessel_mapping,
        )
        .with_output_schema(mapping_schema()),
        Tool::new(
            "get_settings",
            "Get user settings and preferences",
            json!({
                "type": "object",
                "properties": {}
            }),
            get_settings,
        )
        .with_output_schema(settings_schema()),
        Tool::new(
            "get_vessel_stats",
            "Get vessel statistics and analytics",
            json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["logs", "moorages", "general"],
                        "description": "Type of statistics to retrieve (default general)"
                    },
                    "timeframe": {
                        "type": "string",
                        "description": "Time period for general stats (e.g. 'last_month', 'this_year', default 'all')"
                    }
                }
            }),
            get_vessel_stats,
        ),
        Tool::new(
            "get_event_logs",
            "Get system event logs and alerts",
            json!({
                "type": "object",
                "properties": {}
            }),
            get_event_logs,
        ),
        Tool::new(
            "get_badges",
            "Get vessel achievements and badges",
            json!({
                "type": "object",
                "properties": {}
            }),
            get_badges,
        ),
    ]
}

fn get_vessel(client: &PostgSailClient, _: &Value) -> Result<BackendResponse, ToolError> {
    unwrap_field(client.get_vessel()?, "vessel", "vessel")
}

fn get_vessel_mapping(client: &PostgSailClient, _: &Value) -> Result<BackendResponse, ToolError> {
    let mapping = first_element(client.get_vessel_mapping()?, "vessel mapping")?;
    if mapping.get("configuration").map_or(true, Value::is_null) {
        return Err(ToolError::InvalidResponse(
            "No vessel mapping configuration found".to_string(),
        ));
    }
    Ok(BackendResponse::Json(mapping))
}

fn get_settings(client: &PostgSailClient, _: &Value) -> Result<BackendResponse, ToolError> {
    unwrap_field(client.get_settings()?, "settings", "settings")
}

#[derive(Debug, Deserialize)]
struct VesselStatsArgs {
    #[serde(rename = "type")]
    kind: Option<String>,
    timeframe: Option<String>,
}

fn get_vessel_stats(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: VesselStatsArgs = args::parse(arguments)?;

    let kind = args.kind.as_deref().map(StatsKind::parse).unwrap_or_default();
    let response = match kind {
        StatsKind::Logs => client.get_stats_logs()?,
        StatsKind::Moorages => client.get_stats_moorages()?,
        StatsKind::General => client.get_stats(args.timeframe.as_deref().unwrap_or("all"))?,
    };
    Ok(response)
}

fn get_event_logs(client: &PostgSailClient, _: &Value) -> Result<BackendResponse, ToolError> {
    Ok(client.get_event_logs()?)
}

fn get_badges(client: &PostgSailClient, _: &Value) -> Result<BackendResponse, ToolError> {
    Ok(client.get_badges()?)
}

fn point_feature_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type", "geometry"],
        "properties": {
            "type": { "type": "string", "const": "Feature" },
            "geometry": {
                "type": "object",
                "required": ["type", "coordinates"],
                "properties": {
                    "type": { "type": "string", "const": "Point" },
                    "coordinates": {
                        "type": "array",
                        "items": { "type": "number" },
                        "minItems": 2,
                        "maxItems": 2
                    }
                }
            },
            "properties": { "type": "object" }
        }
    })
}

fn vessel_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "vessel_id", "created_at", "offline"],
        "properties": {
            "name": { "type": "string" },
            "mmsi": { "type": ["string", "null"], "pattern": "^\\d{9}$" },
            "vessel_id": { "type": "string", "pattern": "^[a-f0-9]{16,}$" },
            "ship_type": {
                "type": ["string", "null"],
                "enum": ["Sailing", "Motor", "Cargo", "Fishing", "Tanker", "Other", null]
            },
            "make_model": { "type": ["string", "null"] },
            "length": { "type": ["number", "null"] },
            "beam": { "type": ["number", "null"] },
            "height": { "type": ["number", "null"] },
            "country": { "type": ["string", "null"] },
            "alpha_2": { "type": ["string", "null"], "minLength": 2, "maxLength": 2 },
            "platform": { "type": ["string", "null"] },
            "offline": { "type": "boolean" },
            "has_image": { "type": "boolean" },
            "has_polar": { "type": "boolean" },
            "image_url": { "type": ["string", "null"], "format": "uri-reference" },
            "configuration": { "type": ["boolean", "object", "null"] },
            "plugin_version": { "type": ["string", "null"], "pattern": "^\\d+\\.\\d+\\.\\d+$" },
            "signalk_version": { "type": ["string", "null"] },
            "created_at": { "type": "string", "format": "date-time" },
            "first_contact": { "type": ["string", "null"], "format": "date-time" },
            "last_contact": { "type": ["string", "null"], "format": "date-time" },
            "image_updated_at": { "type": ["string", "null"], "format": "date-time" },
            "geojson": point_feature_schema()
        },
        "additionalProperties": true
    })
}

fn mapping_schema() -> Value {
    let key = json!({ "type": "string" });
    json!({
        "type": "object",
        "required": ["configuration"],
        "properties": {
            "configuration": {
                "type": "object",
                "properties": {
                    "updated_at": { "type": "string", "format": "date-time" },
                    "depthKey": key,
                    "voltageKey": key,
                    "windSpeedKey": key,
                    "windDirectionKey": key,
                    "stateOfChargeKey": key,
                    "insideHumidityKey": key,
                    "outsideHumidityKey": key,
                    "insidePressureKey": key,
                    "outsidePressureKey": key,
                    "waterTemperatureKey": key,
                    "insideTemperatureKey": key,
                    "outsideTemperatureKey": key,
                    "solarPowerKey": key,
                    "solarVoltageKey": key,
                    "tankLevelKey": key
                },
                "additionalProperties": true
            },
            "available_keys": { "type": ["array", "object", "null"] }
        },
        "additionalProperties": true
    })
}

fn settings_schema() -> Value {
    json!({
        "type": "object",
        "required": ["username", "has_vessel", "created_at"],
        "properties": {
            "first": { "type": ["string", "null"] },
            "last": { "type": ["string", "null"] },
            "username": { "type": "string" },
            "has_vessel": { "type": "boolean" },
            "created_at": { "type": "string", "format": "date-time" },
            "preferences": {
                "type": ["object", "null"],
                "properties": {
                    "use_imperial_units": { "type": "boolean" },
                    "windy_last_metric": { "type": "string" },
                    "alerting": { "type": "object", "additionalProperties": true },
                    "alarms": { "type": "object", "additionalProperties": true },
                    "badges": { "type": "object", "additionalProperties": true }
                },
                "additionalProperties": true
            }
        },
        "additionalProperties": true
    })
}
