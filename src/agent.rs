// ABOUTME: Language model agents for the prompt2pptx application
// ABOUTME: Sends system prompts and user messages to a hosted chat-completions model

use crate::config::ModelConfig;
use crate::errors::{Prompt2PptxError, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// One piece of a user message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Inline image as a `data:` URL or a remote URL
    Image(String),
}

/// A user message made of one or more parts.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMessage {
    pub parts: Vec<ContentPart>,
}

impl UserMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart::Image(url.into())],
        }
    }
}

/// Constrains the model's reply to a JSON Schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

/// A single request/response exchange with a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub messages: Vec<UserMessage>,
    pub response_schema: Option<ResponseSchema>,
}

/// A hosted language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, used in logs.
    fn model_name(&self) -> &str;

    /// Send the request and return the reply text.
    async fn complete(&self, request: &ModelRequest) -> Result<String>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiChatModel {
    /// Build a client from explicit configuration. Fails when no API key is set.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Prompt2PptxError::ConfigError("OPENAI_API_KEY is not set".to_string())
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
        })
    }

    fn request_body(&self, request: &ModelRequest) -> Value {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: Value::String(request.system.clone()),
        }];

        for message in &request.messages {
            let content = match message.parts.as_slice() {
                [ContentPart::Text(text)] => Value::String(text.clone()),
                parts => Value::Array(
                    parts
                        .iter()
                        .map(|part| match part {
                            ContentPart::Text(text) => json!({ "type": "text", "text": text }),
                            ContentPart::Image(url) => {
                                json!({ "type": "image_url", "image_url": { "url": url } })
                            }
                        })
                        .collect(),
                ),
            };
            messages.push(ChatMessage {
                role: "user",
                content,
            });
        }

        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });

        if let Some(schema) = &request.response_schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": false
                }
            });
        }

        body
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ModelRequest) -> Result<String> {
        debug!(
            "POST {} (model {}, {} messages, structured: {})",
            self.endpoint,
            self.model,
            request.messages.len(),
            request.response_schema.is_some()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Prompt2PptxError::HttpStatusError {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Prompt2PptxError::ModelError("response contained no choices".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(Prompt2PptxError::ModelError(format!("model refused: {}", refusal)));
        }

        match choice.message.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(Prompt2PptxError::ModelError(format!(
                "empty reply (finish reason: {})",
                choice.finish_reason.as_deref().unwrap_or("unknown")
            ))),
        }
    }
}

/// A model paired with fixed instructions.
#[derive(Clone)]
pub struct Agent {
    name: String,
    instructions: String,
    model: Arc<dyn LanguageModel>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, messages: Vec<UserMessage>, response_schema: Option<ResponseSchema>) -> Result<String> {
        let request = ModelRequest {
            system: self.instructions.clone(),
            messages,
            response_schema,
        };

        info!("Agent {} calling model {}", self.name, self.model.model_name());
        let reply = self.model.complete(&request).await?;
        debug!("Agent {} received {} bytes", self.name, reply.len());
        Ok(reply)
    }

    /// Free-text reply to a single instruction.
    pub async fn generate(&self, text: &str) -> Result<String> {
        self.send(vec![UserMessage::text(text)], None).await
    }

    /// Reply to an instruction about one image, sent as two user messages.
    pub async fn generate_with_image(&self, text: &str, image_url: &str) -> Result<String> {
        self.send(vec![UserMessage::text(text), UserMessage::image(image_url)], None)
            .await
    }

    /// Reply constrained to `schema`, parsed as JSON.
    pub async fn generate_structured(&self, text: &str, schema: ResponseSchema) -> Result<Value> {
        let reply = self.send(vec![UserMessage::text(text)], Some(schema)).await?;
        serde_json::from_str(&reply).map_err(|e| Prompt2PptxError::ParseError(e.to_string()))
    }
}
