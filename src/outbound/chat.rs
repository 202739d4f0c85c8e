//! OpenRouter chat completion proxy

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::OutboundError;
use crate::build_info::BuildInfo;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);
const REFERER: &str = "http://localhost:5173";
const TITLE: &str = "LifeMon Chat";

/// Body forwarded to the completion API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Value>,
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// False when no API key is available
    fn is_configured(&self) -> bool;

    /// Forward a completion request and return the upstream JSON unchanged
    async fn complete(&self, request: &ChatRequest) -> Result<Value, OutboundError>;
}

pub struct OpenRouterClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl OpenRouterClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self, OutboundError> {
        let client = Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .user_agent(BuildInfo::current().user_agent())
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<Value, OutboundError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(OutboundError::NotConfigured("OPENROUTER_API_KEY"))?;

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        interpret_reply(status.as_u16(), &bytes)
    }
}

/// A 2xx reply must be JSON. Other replies are passed through as
/// `Upstream`, with a non-JSON body wrapped as `{"error": text}`.
fn interpret_reply(status: u16, bytes: &[u8]) -> Result<Value, OutboundError> {
    let parsed = serde_json::from_slice::<Value>(bytes);

    if (200..300).contains(&status) {
        return parsed.map_err(|e| OutboundError::Decode(e.to_string()));
    }

    let body = parsed
        .unwrap_or_else(|_| serde_json::json!({ "error": String::from_utf8_lossy(bytes) }));
    Err(OutboundError::Upstream { status, body })
}
