use async_trait::async_trait;
use mailgenie_core::error::{MailGenieError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Chat-completion style text backend used for tone detection and reply generation.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse>;
    async fn list_models(&self) -> Result<Vec<String>>;

    fn name(&self) -> &str;

    /// Single system + user turn, returning the completion text.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatRequest::new(system, prompt, temperature).with_max_tokens(max_tokens);
        let response = self.chat_completion(request).await?;
        Ok(response.content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    // Falls back to the provider's configured model when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn new(system: &str, prompt: &str, temperature: f32) -> Self {
        Self {
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".into(),
                    content: prompt.to_string(),
                },
            ],
            temperature,
            max_tokens: None,
            response_format: None,
            model: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseFormat {
    #[serde(rename = "json_object")]
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

pub struct OpenAICompatibleProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model_name: Option<String>,
}

impl OpenAICompatibleProvider {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model_name: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailGenieError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model_name,
        })
    }

    fn request_body(&self, request: &ChatRequest) -> Result<serde_json::Value> {
        let mut req_json =
            serde_json::to_value(request).map_err(|e| MailGenieError::Internal(e.to_string()))?;
        if let Some(obj) = req_json.as_object_mut() {
            if !obj.contains_key("model") {
                if let Some(m) = &self.model_name {
                    obj.insert("model".to_string(), serde_json::Value::String(m.clone()));
                }
            }
        }
        Ok(req_json)
    }
}

fn transport_error(e: reqwest::Error) -> MailGenieError {
    if e.is_timeout() {
        MailGenieError::Backend("Request to generation backend timed out".into())
    } else {
        MailGenieError::Backend(format!("HTTP request failed: {}", e))
    }
}

/// Pulls the first choice out of an OpenAI-style `/chat/completions` body.
pub fn parse_chat_body(body: &serde_json::Value) -> Result<ChatResponse> {
    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| MailGenieError::Backend("Invalid AI response format".into()))?
        .to_string();

    let usage = Usage {
        prompt_tokens: body["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: body["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    };

    Ok(ChatResponse { content, usage })
}

/// Model ids from an OpenAI-style `/models` body, sorted.
pub fn parse_models_body(body: &serde_json::Value) -> Result<Vec<String>> {
    let entries = body["data"]
        .as_array()
        .ok_or_else(|| MailGenieError::Backend("Invalid model list format".into()))?;

    let mut models: Vec<String> = entries
        .iter()
        .filter_map(|m| m["id"].as_str().map(str::to_string))
        .collect();
    models.sort();
    Ok(models)
}

#[async_trait]
impl AiProvider for OpenAICompatibleProvider {
    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);
        let mut builder = self.client.get(&url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailGenieError::Backend(format!(
                "Model listing failed: {} - {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MailGenieError::Backend(format!("Response parse error: {}", e)))?;

        parse_models_body(&body)
    }

    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let req_json = self.request_body(&request)?;
        debug!(url = %url, "Sending chat completion request");

        let response = builder
            .json(&req_json)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailGenieError::Backend(format!(
                "Generation backend error: {} - {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MailGenieError::Backend(format!("Response parse error: {}", e)))?;

        parse_chat_body(&body)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}
