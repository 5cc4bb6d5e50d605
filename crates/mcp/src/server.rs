use std::io::{BufRead, Write};

use log::{debug, info};
use postgsail_client::PostgSailClient;
use serde::Serialize;
use serde_json::{json, Value};

use crate::tools::{ToolRegistry, ToolResult};
use crate::transport::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR, RESOURCE_NOT_FOUND,
};
use crate::{prompts, resources, SERVER_NAME, SERVER_VERSION};

/// Newest first; the first entry is the fallback.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

pub struct McpServer {
    client: PostgSailClient,
    tools: ToolRegistry,
    initialized: bool,
}

impl McpServer {
    pub fn new(client: PostgSailClient) -> Self {
        Self::with_tools(client, ToolRegistry::new())
    }

    pub fn with_tools(client: PostgSailClient, tools: ToolRegistry) -> Self {
        Self {
            client,
            tools,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Handles one JSON-RPC line. Returns `None` for notifications.
    pub fn handle_request(&mut self, input: &str) -> Option<String> {
        let request: JsonRpcRequest = match serde_json::from_str(input) {
            Ok(r) => r,
            Err(e) => {
                debug!("unparseable request: {}", e);
                let resp = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error");
                return Some(encode(&resp));
            }
        };

        if request.jsonrpc != "2.0" {
            if request.is_notification() {
                return None;
            }
            let resp = JsonRpcResponse::error(request.id, INVALID_REQUEST, "Invalid Request");
            return Some(encode(&resp));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request),
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                None
            }
            "ping" => Some(JsonRpcResponse::success(request.id.clone(), json!({}))),
            "tools/list" => Some(self.handle_tools_list(&request)),
            "tools/call" => Some(self.handle_tools_call(&request)),
            "resources/list" => Some(handle_resources_list(&request)),
            "resources/read" => Some(handle_resources_read(&request)),
            "prompts/list" => Some(handle_prompts_list(&request)),
            "prompts/get" => Some(handle_prompts_get(&request)),
            _ => Some(JsonRpcResponse::error(
                request.id.clone(),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        if request.is_notification() {
            return None;
        }
        response.map(|r| encode(&r))
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let requested = request
            .params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = negotiate_version(requested);
        info!("initialize: protocol {}", version);

        Some(JsonRpcResponse::success(
            request.id.clone(),
            json!({
                "protocolVersion": version,
                "capabilities": {
                    "tools": { "listChanged": false },
                    "resources": { "listChanged": false },
                    "prompts": { "listChanged": false }
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        ))
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = self.tools.definitions();
        JsonRpcResponse::success(request.id.clone(), json!({ "tools": tools }))
    }

    fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let params = match &request.params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(request.id.clone(), INVALID_PARAMS, "Missing params")
            }
        };

        let name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => {
                return JsonRpcResponse::error(
                    request.id.clone(),
                    INVALID_PARAMS,
                    "Missing tool name",
                )
            }
        };

        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
        let result = self.tools.dispatch(&self.client, name, &arguments);
        respond(request, &result)
    }
}

fn handle_resources_list(request: &JsonRpcRequest) -> JsonRpcResponse {
    JsonRpcResponse::success(
        request.id.clone(),
        json!({ "resources": resources::list() }),
    )
}

fn handle_resources_read(request: &JsonRpcRequest) -> JsonRpcResponse {
    let uri = match request
        .params
        .as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(Value::as_str)
    {
        Some(uri) => uri,
        None => return JsonRpcResponse::error(request.id.clone(), INVALID_PARAMS, "Missing uri"),
    };

    match resources::read(uri) {
        Some(contents) => JsonRpcResponse::success(
            request.id.clone(),
            json!({ "contents": [contents] }),
        ),
        None => JsonRpcResponse::error(
            request.id.clone(),
            RESOURCE_NOT_FOUND,
            format!("Unknown resource: {}", uri),
        ),
    }
}

fn handle_prompts_list(request: &JsonRpcRequest) -> JsonRpcResponse {
    JsonRpcResponse::success(request.id.clone(), json!({ "prompts": prompts::list() }))
}

fn handle_prompts_get(request: &JsonRpcRequest) -> JsonRpcResponse {
    let params = match &request.params {
        Some(p) => p,
        None => return JsonRpcResponse::error(request.id.clone(), INVALID_PARAMS, "Missing params"),
    };

    let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    match prompts::get(name, &arguments) {
        Ok(prompt) => respond(request, &prompt),
        Err(e) => respond(request, &ToolResult::failure(e)),
    }
}

fn respond(request: &JsonRpcRequest, result: &impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
        Err(e) => JsonRpcResponse::error(request.id.clone(), INTERNAL_ERROR, e.to_string()),
    }
}

fn encode(response: &JsonRpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"{}"}}}}"#,
            INTERNAL_ERROR,
            e.to_string().replace('"', "'")
        )
    })
}

/// The client's version when supported, otherwise the newest one.
pub fn negotiate_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
        .copied()
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

/// Serves line-delimited JSON-RPC until `reader` hits EOF.
pub fn run(server: &mut McpServer, reader: impl BufRead, mut writer: impl Write) -> std::io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(resp) = server.handle_request(&line) {
            writeln!(writer, "{}", resp)?;
            writer.flush()?;
        }
    }
    Ok(())
}
