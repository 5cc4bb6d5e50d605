use postgsail_client::{BackendResponse, DateRange, ExportFormat, PostgSailClient, TimelapseFormat};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{args, expect_array, Tool, ToolError};

pub fn definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            "get_logs",
            "Get a summary of voyages or logs or trips, optionally within a date range",
            json!({
                "type": "object",
                "properties": {
                    "startDate": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Only logs started on or after this date (ISO format)"
                    },
                    "endDate": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Only logs ended on or before this date (ISO format)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of logs to return (default 5)"
                    }
                }
            }),
            get_logs,
        ),
        Tool::new(
            "get_log",
            "Get all details for specific voyage log by ID",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": ["string", "integer"], "pattern": "^\\d+$", "description": "Log ID" }
                },
                "required": ["id"]
            }),
            get_log,
        ),
        Tool::new(
            "get_logs_geojson",
            "Get recent voyage logs as GeoJSON for mapping",
            json!({
                "type": "object",
                "properties": {
                    "page": {
                        "type": "integer",
                        "description": "Page number of 100 logs (default: 1)",
                        "default": 1
                    }
                }
            }),
            get_logs_geojson,
        ),
        Tool::new(
            "export_log_track",
            "Export specific log track in various formats",
            json!({
                "type": "object",
                "properties": {
                    "logId": { "type": ["string", "integer"], "pattern": "^\\d+$", "description": "Log ID to export" },
                    "format": {
                        "type": "string",
                        "enum": ["gpx", "geojson", "kml"],
                        "description": "Export format"
                    }
                },
                "required": ["logId", "format"]
            }),
            export_log_track,
        ),
        Tool::new(
            "get_timelapse_data",
            "Get timelapse/track data for visualization",
            json!({
                "type": "object",
                "properties": {
                    "startDate": { "type": "string", "format": "date-time", "description": "Start date (ISO format)" },
                    "endDate": { "type": "string", "format": "date-time", "description": "End date (ISO format)" },
                    "format": {
                        "type": "string",
                        "enum": ["points", "linestring"],
                        "description": "Data format for visualization",
                        "default": "points"
                    }
                },
                "required": ["startDate", "endDate"]
            }),
            get_timelapse_data,
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogsArgs {
    start_date: Option<String>,
    end_date: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    #[serde(deserialize_with = "args::string_or_number")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct PageArgs {
    page: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportArgs {
    #[serde(deserialize_with = "args::string_or_number")]
    log_id: String,
    format: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelapseArgs {
    start_date: String,
    end_date: String,
    format: Option<String>,
}

fn get_logs(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: LogsArgs = args::parse(arguments)?;
    let range = DateRange::new(args.start_date, args.end_date);
    expect_array(client.get_logs(&range, args.limit)?, "logbooks")
}

fn get_log(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: IdArgs = args::parse(arguments)?;
    expect_array(client.get_log(&args.id)?, "logbook")
}

fn get_logs_geojson(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: PageArgs = args::parse(arguments)?;
    // Pages below 1 fall back to the first page.
    let page = args.page.filter(|p| *p >= 1).unwrap_or(1);
    let page = u32::try_from(page).map_err(|_| ToolError::InvalidArgument {
        name: "page".to_string(),
        reason: format!("must be at most {}", u32::MAX),
    })?;
    Ok(client.get_logs_map(page)?)
}

fn export_log_track(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: ExportArgs = args::parse(arguments)?;
    let format = ExportFormat::parse(&args.format).ok_or_else(|| ToolError::InvalidArgument {
        name: "format".to_string(),
        reason: "use 'gpx', 'geojson' or 'kml'".to_string(),
    })?;
    Ok(client.export_log(&args.log_id, format)?)
}

fn get_timelapse_data(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: TimelapseArgs = args::parse(arguments)?;
    let format = match args.format.as_deref() {
        None => TimelapseFormat::default(),
        Some(f) => TimelapseFormat::parse(f).ok_or_else(|| ToolError::InvalidArgument {
            name: "format".to_string(),
            reason: "use 'points' or 'linestring'".to_string(),
        })?,
    };
    Ok(client.get_timelapse(&args.start_date, &args.end_date, format)?)
}
