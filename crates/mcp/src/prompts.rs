//! Canned prompt templates exposed through `prompts/*`.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("{0} argument is required")]
    MissingArgument(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

struct Prompt {
    definition: PromptDefinition,
    /// Description returned by `prompts/get`; may contain `{{arg}}`.
    title: &'static str,
    text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: PromptContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

fn month_argument() -> PromptArgument {
    PromptArgument {
        name: "month",
        description: "Month to analyze stay duration for",
        required: true,
    }
}

fn catalog() -> Vec<Prompt> {
    vec![
        Prompt {
            definition: PromptDefinition {
                name: "vessel-system-status",
                description: "🛥️ Give me a summary of my current systems status.",
                arguments: vec![],
            },
            title: "Give me a summary of my vessel's current systems status.",
            text: "Provide a daily briefing of my boat's systems",
        },
        Prompt {
            definition: PromptDefinition {
                name: "stay-duration-analysis",
                description: "📍 Where did we stay the longest during {{month}}?",
                arguments: vec![month_argument()],
            },
            title: "Where did we stay the longest during {{month}}?",
            text: "Where did we stay the longest during {{month}}? Compare the stays by duration and name the moorage of each.",
        },
        Prompt {
            definition: PromptDefinition {
                name: "anchor-stay-history",
                description: "⚓ Show me all anchorages we used last month.",
                arguments: vec![month_argument()],
            },
            title: "Show me all anchorages we used during {{month}}.",
            text: "Show me all anchorages we used during {{month}}, with arrival and departure dates.",
        },
        Prompt {
            definition: PromptDefinition {
                name: "last-logbook-summary",
                description: "🧾 Summarize my last voyage log.",
                arguments: vec![],
            },
            title: "Summarize my last voyage log.",
            text: "Summarize my last voyage log.",
        },
        Prompt {
            definition: PromptDefinition {
                name: "logbook-summary",
                description: "🧾 Summarize the voyage logs for the last month.",
                arguments: vec![],
            },
            title: "Summarize the voyage logs for the last month.",
            text: "Summarize the voyage logs for the last month.",
        },
        Prompt {
            definition: PromptDefinition {
                name: "system-monitoring",
                description: "🔧 List any alerts or events from the vessel today.",
                arguments: vec![],
            },
            title: "🔧 List any alerts or events from the vessel today.",
            text: "List any alerts or events from the vessel today.",
        },
    ]
}

pub fn list() -> Vec<PromptDefinition> {
    catalog().into_iter().map(|p| p.definition).collect()
}

/// Renders a prompt, substituting `{{name}}` placeholders from `arguments`.
pub fn get(name: &str, arguments: &Value) -> Result<PromptResult, PromptError> {
    let prompt = catalog()
        .into_iter()
        .find(|p| p.definition.name == name)
        .ok_or_else(|| PromptError::UnknownPrompt(name.to_string()))?;

    let mut title = prompt.title.to_string();
    let mut text = prompt.text.to_string();

    for arg in &prompt.definition.arguments {
        let value = match arguments.get(arg.name) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ if arg.required => return Err(PromptError::MissingArgument(arg.name.to_string())),
            _ => continue,
        };
        let placeholder = format!("{{{{{}}}}}", arg.name);
        title = title.replace(&placeholder, &value);
        text = text.replace(&placeholder, &value);
    }

    Ok(PromptResult {
        description: title,
        messages: vec![PromptMessage {
            role: "assistant",
            content: PromptContent {
                content_type: "text",
                text,
            },
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lists_six_prompts() {
        let names: Vec<&str> = list().iter().map(|p| p.name).collect();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"vessel-system-status"));
        assert!(names.contains(&"anchor-stay-history"));
    }

    #[test]
    fn static_prompt_renders() {
        let result = get("logbook-summary", &json!({})).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].role, "assistant");
        assert_eq!(
            result.messages[0].content.text,
            "Summarize the voyage logs for the last month."
        );
    }

    #[test]
    fn month_is_substituted() {
        let result = get("stay-duration-analysis", &json!({ "month": "July" })).unwrap();
        assert_eq!(result.description, "Where did we stay the longest during July?");
        assert!(result.messages[0].content.text.starts_with("Where did we stay the longest during July?"));
        assert!(!result.messages[0].content.text.contains("{{"));
    }

    #[test]
    fn missing_required_argument() {
        let err = get("anchor-stay-history", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "month argument is required");
    }

    #[test]
    fn unknown_prompt() {
        let err = get("weather-forecast", &Value::Null).unwrap_err();
        assert!(matches!(err, PromptError::UnknownPrompt(ref n) if n == "weather-forecast"));
    }
}
