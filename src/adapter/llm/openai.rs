//! OpenAI-compatible structured-inference client.
//!
//! Implements [`StructuredInference`] over the Chat Completions API with
//! a single `function` tool and `tool_choice` forced to it, so the model
//! can only answer with one structured call matching the supplied schema.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::InferenceConfig;
use crate::error::{Error, Result};
use crate::port::{InferenceRequest, StructuredInference};

/// OpenAI Chat Completions API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client.
#[derive(Debug)]
pub struct OpenAi {
    /// HTTP client for API requests.
    client: Client,
    /// API key for authentication.
    api_key: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    model: String,
    /// Sampling temperature (0.0 to 2.0).
    temperature: f64,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Create a client from the `OPENAI_API_KEY` environment variable and
    /// the inference config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(config: &InferenceConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config(crate::error::ConfigError::MissingField {
                field: "OPENAI_API_KEY",
            })
        })?;
        Ok(Self::new(api_key, config.model.clone(), config.temperature))
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    temperature: f64,
    messages: Vec<Message>,
    tools: Vec<ToolDef>,
    tool_choice: Value,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ToolDef {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionDef,
}

#[derive(Serialize)]
struct FunctionDef {
    name: &'static str,
    description: &'static str,
    parameters: Value,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded arguments, per the Chat Completions wire format.
    arguments: String,
}

/// Pull the single structured call out of a response.
///
/// Exactly one matching call is the contract; zero calls, a mismatched
/// function name, or unparseable arguments all violate it.
fn extract_call(response: Response, expected: &str) -> Result<Value> {
    let call = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.tool_calls.into_iter().next())
        .ok_or_else(|| {
            Error::InferenceContract("response contained no structured call".into())
        })?;

    if call.function.name != expected {
        return Err(Error::InferenceContract(format!(
            "expected call to {expected}, got {}",
            call.function.name
        )));
    }

    serde_json::from_str(&call.function.arguments).map_err(|e| {
        Error::InferenceContract(format!("structured call arguments are not valid JSON: {e}"))
    })
}

#[async_trait]
impl StructuredInference for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn invoke(&self, request: &InferenceRequest) -> Result<Value> {
        let body = Request {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: request.system.clone(),
                },
                Message {
                    role: "user",
                    content: request.user.clone(),
                },
            ],
            tools: vec![ToolDef {
                kind: "function",
                function: FunctionDef {
                    name: request.tool.name,
                    description: request.tool.description,
                    parameters: request.tool.parameters.clone(),
                },
            }],
            tool_choice: json!({
                "type": "function",
                "function": {"name": request.tool.name},
            }),
        };

        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?;

        debug!(tool = request.tool.name, "Inference call complete");
        extract_call(response, request.tool.name)
    }
}
