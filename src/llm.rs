use async_trait::async_trait;
use log::debug;

use crate::{Error, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// A chat-style language model endpoint
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, system: &str, directive: &str, content: &str) -> Result<String>;
}

/// Which wire format the configured model speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    OpenAi,
    Anthropic,
}

impl Vendor {
    pub fn for_model(model: &str) -> Self {
        if model.starts_with("claude") {
            Vendor::Anthropic
        } else {
            Vendor::OpenAi
        }
    }

    /// Environment variables that may hold the credential, in lookup order
    pub fn key_vars(&self) -> &'static [&'static str] {
        match self {
            Vendor::OpenAi => &["OPENAI_API_KEY", "OPENAI_ACCESS"],
            Vendor::Anthropic => &["ANTHROPIC_API_KEY"],
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Vendor::OpenAi => OPENAI_BASE_URL,
            Vendor::Anthropic => ANTHROPIC_BASE_URL,
        }
    }
}

pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    vendor: Vendor,
    base_url: String,
}

impl LlmClient {
    pub fn new(client: reqwest::Client, api_key: String, model: impl Into<String>) -> Self {
        let model = model.into();
        let vendor = Vendor::for_model(&model);
        LlmClient {
            client,
            api_key,
            model,
            vendor,
            base_url: vendor.default_base_url().to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_openai(&self, system: &str, directive: &str, content: &str) -> Result<String> {
        debug!("Calling OpenAI API with model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "assistant", "content": directive},
                {"role": "user", "content": content}
            ]
        });

        let request = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);

        let json = send(request, "OpenAI").await?;
        extract_openai_text(&json)
    }

    async fn complete_anthropic(&self, system: &str, directive: &str, content: &str) -> Result<String> {
        debug!("Calling Anthropic API with model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 1024,
            "system": system,
            "messages": [
                {
                    "role": "user",
                    "content": format!("{directive}\n\n{content}")
                }
            ]
        });

        let request = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body);

        let json = send(request, "Anthropic").await?;
        extract_anthropic_text(&json)
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(&self, system: &str, directive: &str, content: &str) -> Result<String> {
        let text = match self.vendor {
            Vendor::OpenAi => self.complete_openai(system, directive, content).await?,
            Vendor::Anthropic => self.complete_anthropic(system, directive, content).await?,
        };
        Ok(text.trim().to_string())
    }
}

async fn send(request: reqwest::RequestBuilder, vendor: &str) -> Result<serde_json::Value> {
    let resp = request
        .send()
        .await
        .map_err(|e| Error::upstream(format!("{vendor} API request failed: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::upstream(format!("{vendor} API returned {status}: {body}")));
    }

    resp.json()
        .await
        .map_err(|e| Error::upstream(format!("{vendor} API returned invalid JSON: {e}")))
}

fn extract_anthropic_text(json: &serde_json::Value) -> Result<String> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str().map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Err(Error::upstream("unexpected Anthropic API response format"))
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::upstream("unexpected OpenAI API response format"))
}
