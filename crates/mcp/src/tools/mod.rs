//! Tool catalog and dispatch.
//!
//! Each domain module contributes `definitions()`, a list of [`Tool`] values
//! pairing the advertised schema with the handler that serves it. The
//! registry validates arguments against the schema before a handler runs, so
//! a rejected call never reaches the backend.

pub mod args;
mod logs;
mod moorages;
mod monitoring;
mod vessel;

use std::collections::HashMap;
use std::fmt::Display;

use log::{info, warn};
use postgsail_client::{BackendResponse, ClientError, PostgSailClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0} argument is required")]
    MissingArgument(String),

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    InvalidResponse(String),

    #[error("tool schema is invalid: {0}")]
    InvalidSchema(String),

    #[error(transparent)]
    Backend(#[from] ClientError),
}

pub type Handler = fn(&PostgSailClient, &Value) -> Result<BackendResponse, ToolError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(rename = "outputSchema", skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

pub struct Tool {
    pub definition: ToolDefinition,
    handler: Handler,
}

impl Tool {
    pub fn new(name: &str, description: &str, input_schema: Value, handler: Handler) -> Self {
        Self {
            definition: ToolDefinition {
                name: name.to_string(),
                description: description.to_string(),
                input_schema,
                output_schema: None,
            },
            handler,
        }
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.definition.output_schema = Some(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

/// `CallToolResult` envelope returned for every `tools/call`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text",
                text: text.into(),
            }],
            structured_content: None,
            is_error: false,
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Self {
            is_error: true,
            ..Self::text(format!("Error: {}", error))
        }
    }
}

pub struct ToolRegistry {
    tools: Vec<Tool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            tools: Vec::new(),
            index: HashMap::new(),
        };
        for tool in vessel::definitions()
            .into_iter()
            .chain(logs::definitions())
            .chain(moorages::definitions())
            .chain(monitoring::definitions())
        {
            registry.register(tool);
        }
        registry
    }

    /// Adds a tool, replacing any previous tool of the same name in place.
    pub fn register(&mut self, tool: Tool) {
        match self.index.get(tool.name()) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(tool.name().to_string(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| &t.definition).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validates and runs one tool, returning the typed error on failure.
    pub fn call(
        &self,
        client: &PostgSailClient,
        name: &str,
        arguments: &Value,
    ) -> Result<BackendResponse, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let arguments = args::normalize(arguments)?;
        args::validate(&tool.definition.input_schema, &arguments)?;
        (tool.handler)(client, &arguments)
    }

    /// Runs one tool and folds any failure into the error envelope.
    pub fn dispatch(&self, client: &PostgSailClient, name: &str, arguments: &Value) -> ToolResult {
        info!("tool call: {}", name);

        match self.call(client, name, arguments) {
            Ok(response) => {
                let mut result = ToolResult::text(response.to_text());
                let declares_output = self
                    .get(name)
                    .is_some_and(|t| t.definition.output_schema.is_some());
                if declares_output {
                    result.structured_content = response.into_json().filter(Value::is_object);
                }
                result
            }
            Err(e) => {
                warn!("tool {} failed: {}", name, e);
                ToolResult::failure(e)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(what: &str) -> ToolError {
    ToolError::InvalidResponse(format!("Invalid {} data", what))
}

/// Passes the response through if it is a JSON array.
fn expect_array(response: BackendResponse, what: &str) -> Result<BackendResponse, ToolError> {
    match response {
        BackendResponse::Json(Value::Array(_)) => Ok(response),
        _ => Err(invalid(what)),
    }
}

/// First element of a non-empty JSON array.
fn first_element(response: BackendResponse, what: &str) -> Result<Value, ToolError> {
    match response {
        BackendResponse::Json(Value::Array(mut items)) if !items.is_empty() => {
            Ok(items.swap_remove(0))
        }
        _ => Err(invalid(what)),
    }
}

/// Unwraps `{ "<field>": ... }` returned by the `rpc/*_fn` endpoints.
fn unwrap_field(response: BackendResponse, field: &str, what: &str) -> Result<BackendResponse, ToolError> {
    match response {
        BackendResponse::Json(Value::Object(mut map)) => match map.remove(field) {
            Some(value) if !value.is_null() => Ok(BackendResponse::Json(value)),
            _ => Err(ToolError::InvalidResponse(format!("No {} data found", what))),
        },
        _ => Err(ToolError::InvalidResponse(format!("No {} data found", what))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_names_are_unique() {
        let registry = ToolRegistry::new();
        let mut names: Vec<&str> = registry
            .definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 18);
    }

    #[test]
    fn every_schema_is_an_object_schema() {
        for def in ToolRegistry::new().definitions() {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
            assert!(def.input_schema["properties"].is_object(), "{}", def.name);
            assert!(!def.description.is_empty(), "{}", def.name);
        }
    }

    #[test]
    fn register_replaces_same_name() {
        fn stub(_: &PostgSailClient, _: &Value) -> Result<BackendResponse, ToolError> {
            Ok(BackendResponse::Text("stub".to_string()))
        }

        let mut registry = ToolRegistry::new();
        let before = registry.len();
        registry.register(Tool::new("get_badges", "stub", json!({"type": "object", "properties": {}}), stub));

        assert_eq!(registry.len(), before);
        assert_eq!(registry.get("get_badges").unwrap().definition.description, "stub");
    }

    #[test]
    fn failure_envelope_shape() {
        let value = serde_json::to_value(ToolResult::failure("boom")).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "Error: boom");
        assert!(value.get("structuredContent").is_none());
    }

    #[test]
    fn shape_helpers() {
        assert!(expect_array(BackendResponse::Json(json!([])), "logs").is_ok());
        assert!(expect_array(BackendResponse::Json(json!({})), "logs").is_err());
        assert!(expect_array(BackendResponse::Text("[]".into()), "logs").is_err());

        assert_eq!(
            first_element(BackendResponse::Json(json!([{"a": 1}, {"a": 2}])), "live").unwrap(),
            json!({"a": 1})
        );
        assert!(first_element(BackendResponse::Json(json!([])), "live").is_err());

        assert_eq!(
            unwrap_field(BackendResponse::Json(json!({"vessel": {"name": "Kapla"}})), "vessel", "vessel").unwrap(),
            BackendResponse::Json(json!({"name": "Kapla"}))
        );
        let err = unwrap_field(BackendResponse::Json(json!({"vessel": null})), "vessel", "vessel").unwrap_err();
        assert_eq!(err.to_string(), "No vessel data found");
    }
}
