use postgsail_client::{BackendResponse, DateRange, PostgSailClient, StayType};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{args, expect_array, Tool, ToolError};

pub fn definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            "get_moorages",
            "Get a summary of all moorages/marinas/anchorages, optionally filtered by stay type",
            json!({
                "type": "object",
                "properties": {
                    "stayType": {
                        "type": "string",
                        "description": stay_type_description()
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of moorages to return (default 5)"
                    }
                }
            }),
            get_moorages,
        ),
        Tool::new(
            "get_moorage",
            "Get all details for specific moorage by ID",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": ["string", "integer"], "pattern": "^\\d+$", "description": "Moorage ID" }
                },
                "required": ["id"]
            }),
            get_moorage,
        ),
        Tool::new(
            "get_moorage_stays",
            "Get all stays at a specific moorage",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": ["string", "integer"], "pattern": "^\\d+$", "description": "Moorage ID" }
                },
                "required": ["id"]
            }),
            get_moorage_stays,
        ),
        Tool::new(
            "get_stays",
            "Get a summary of all stays (times at anchor/dock), optionally within a date range",
            json!({
                "type": "object",
                "properties": {
                    "startDate": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Only stays arrived on or after this date (ISO format)"
                    },
                    "endDate": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Only stays departed on or before this date (ISO format)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of stays to return (default 5)"
                    }
                }
            }),
            get_stays,
        ),
        Tool::new(
            "get_stay",
            "Get all details for specific stay by ID",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": ["string", "integer"], "pattern": "^\\d+$", "description": "Stay ID" }
                },
                "required": ["id"]
            }),
            get_stay,
        ),
    ]
}

// Not an enum: an unrecognized label falls back to no filter.
fn stay_type_description() -> String {
    format!(
        "Only moorages whose default stay is of this type: {} (default All)",
        StayType::labels().join(", ")
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MooragesArgs {
    stay_type: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaysArgs {
    start_date: Option<String>,
    end_date: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    #[serde(deserialize_with = "args::string_or_number")]
    id: String,
}

fn get_moorages(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: MooragesArgs = args::parse(arguments)?;
    let stay_type = args.stay_type.as_deref().and_then(StayType::from_label);
    expect_array(client.get_moorages(stay_type, args.limit)?, "moorages")
}

fn get_moorage(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: IdArgs = args::parse(arguments)?;
    expect_array(client.get_moorage(&args.id)?, "moorage")
}

fn get_moorage_stays(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: IdArgs = args::parse(arguments)?;
    expect_array(client.get_moorage_stays(&args.id)?, "moorage stays")
}

fn get_stays(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: StaysArgs = args::parse(arguments)?;
    let range = DateRange::new(args.start_date, args.end_date);
    expect_array(client.get_stays(&range, args.limit)?, "stays")
}

fn get_stay(client: &PostgSailClient, arguments: &Value) -> Result<BackendResponse, ToolError> {
    let args: IdArgs = args::parse(arguments)?;
    expect_array(client.get_stay(&args.id)?, "stay")
}
