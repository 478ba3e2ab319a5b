//! The generative-model collaborator seam and its two implementations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

use stratos_core::error::{Result, StratosError};

/// Tuning and connection parameters for the model call
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Completion endpoint URL
    pub endpoint: String,

    /// API key sent as `x-api-key`, if the endpoint requires one
    pub api_key: Option<String>,

    /// Model identifier passed through to the provider
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Response length cap
    pub max_tokens: u32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Caller-imposed deadline for one attempt, in milliseconds
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            endpoint: "http://localhost:8080/v1/generate".to_string(),
            api_key: None,
            model: "strategist-large".to_string(),
            temperature: 0.4,
            max_tokens: 4096,
            top_p: 0.9,
            timeout_ms: 60_000,
        }
    }
}

/// Trait for generative-model backends.
///
/// Implementations return the model's raw text untouched; interpreting it
/// is the parser's job.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Sends one prompt and returns the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Identifier used in logs and error reports
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

/// HTTP-backed [`ModelProvider`] speaking a JSON completion protocol
pub struct HttpProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(config: ProviderConfig) -> Self {
        HttpProvider {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn unavailable(&self, message: String) -> StratosError {
        StratosError::ProviderUnavailable {
            provider: self.config.model.clone(),
            message,
        }
    }
}

#[async_trait]
impl ModelProvider for HttpProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            prompt_len = prompt.len(),
            "requesting completion"
        );

        let mut request = self.client.post(&self.config.endpoint).json(&GenerateRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        });
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| self.unavailable(e.to_string()))?;

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.unavailable(format!("malformed provider payload: {}", e)))?;
        Ok(payload.text)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// A well-formed sample completion for offline development
pub const CANNED_RESPONSE: &str = r#"[[BLOCK:Positioning]]
[[SECTION]]
Anchor all messaging on the clearest differentiator in the brief and repeat it across every channel the team already operates.
[[SECTION]]
Rewrite the website hero and social profiles so a first-time visitor can state what makes the offer different within ten seconds.
[[BLOCK:Channel Strategy]]
[[SECTION]]
Concentrate the monthly budget on the two channels with proven traction instead of spreading spend across new ones.
[[SECTION]]
Publish one substantial piece of expertise-led content per week and repurpose it into smaller posts for each active channel.
[[BLOCK:Measurement]]
[[SECTION]]
Review the primary objective's metric weekly and reallocate budget monthly toward whichever channel shows the lowest acquisition cost.
"#;

/// Offline [`ModelProvider`] serving scripted responses.
///
/// Backs local development (the node falls back to it when no endpoint is
/// configured) and tests that need predictable completions.
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<String>>,
    fallback: Option<String>,
}

impl ScriptedProvider {
    /// Serves [`CANNED_RESPONSE`] forever
    pub fn canned() -> Self {
        ScriptedProvider {
            queue: Mutex::new(VecDeque::new()),
            fallback: Some(CANNED_RESPONSE.to_string()),
        }
    }

    /// Serves the given responses in order, then fails as unavailable
    pub fn with_responses(responses: Vec<String>) -> Self {
        ScriptedProvider {
            queue: Mutex::new(responses.into()),
            fallback: None,
        }
    }

    fn next_response(&self) -> Option<String> {
        let mut queue = match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        queue.pop_front().or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.next_response().ok_or_else(|| StratosError::ProviderUnavailable {
            provider: "scripted".to_string(),
            message: "script exhausted".to_string(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
