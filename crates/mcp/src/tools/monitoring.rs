use postgsail_client::{BackendResponse, PostgSailClient};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{args, first_element, Tool, ToolError};

pub fn definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            "get_monitoring_live",
            "Get current live monitoring data (sensors, position, etc.)",
            json!({
                "type": "object",
                "properties": {}
            }),
            get_monitoring_live,
        )
        .with_output_schema(live_schema()),
        Tool::new(
            "get_monitoring_history",
            "Get historical monitoring data for specific timeframe",
            json!({
                "type": "object",
                "properties": {
                    "startDate": { "type": "string", "format": "date-time", "description": "Start date (ISO format)" },
                    "endDate": { "type": "string", "format": "date-time", "description": "End date (ISO format)" },
                    "sensors": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Specific sensors to query (optional)"
                    }
                },
                "required": ["startDate", "endDate"]
            }),
            get_monitoring_history,
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryArgs {
    start_date: String,
    end_date: String,
    #[serde(default)]
    sensors: Option<Vec<String>>,
}

fn get_monitoring_live(client: &PostgSailClient, _: &Value) -> Result<BackendResponse, ToolError> {
    let live = first_element(client.get_monitoring_live()?, "live monitoring")?;
    Ok(BackendResponse::Json(live))
}

fn get_monitoring_history(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: HistoryArgs = args::parse(arguments)?;
    let sensors = args.sensors.unwrap_or_default();
    Ok(client.get_monitoring_history(&args.start_date, &args.end_date, &sensors)?)
}

fn live_schema() -> Value {
    let reading = json!({ "type": ["number", "null"] });
    let pair = |a: &str, b: &str| {
        let mut properties = serde_json::Map::new();
        properties.insert(a.to_string(), reading.clone());
        properties.insert(b.to_string(), reading.clone());
        json!({ "type": "object", "properties": properties })
    };

    json!({
        "type": "object",
        "required": ["time", "offline", "name", "status"],
        "properties": {
            "time": { "type": "string", "format": "date-time" },
            "offline": { "type": "boolean" },
            "name": { "type": "string" },
            "status": { "type": ["string", "null"] },
            "watertemperature": reading,
            "insidetemperature": reading,
            "outsidetemperature": reading,
            "windspeedoverground": reading,
            "winddirectiontrue": reading,
            "insidehumidity": reading,
            "outsidehumidity": reading,
            "insidepressure": reading,
            "outsidepressure": reading,
            "batterycharge": reading,
            "batteryvoltage": reading,
            "depth": reading,
            "solarpower": reading,
            "solarvoltage": reading,
            "tanklevel": reading,
            "outsidepressurehistory": { "type": ["array", "null"] },
            "geojson": { "type": ["object", "null"] },
            "live": { "type": ["object", "null"] },
            "data": {
                "type": ["object", "null"],
                "properties": {
                    "cog": reading,
                    "sog": reading,
                    "heading": reading,
                    "battery": pair("charge", "voltage"),
                    "solar": pair("power", "voltage"),
                    "wind": pair("speed", "direction"),
                    "water": pair("depth", "temperature"),
                    "humidity": pair("inside", "outside"),
                    "pressure": pair("inside", "outside"),
                    "temperature": pair("inside", "outside"),
                    "tank": { "type": "object", "properties": { "level": reading } },
                    "anchor": {
                        "type": "object",
                        "properties": {
                            "radius": reading,
                            "position": { "type": ["array", "null"], "items": { "type": "number" } }
                        }
                    }
                },
                "additionalProperties": true
            }
        },
        "additionalProperties": true
    })
}
