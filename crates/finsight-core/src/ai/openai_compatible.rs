//! OpenAI-compatible backend implementation
//!
//! Works with the hosted OpenAI API and any server that implements the
//! `/v1/chat/completions` endpoint (vLLM, LocalAI, llama-server, ...).
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_API_KEY`: API key (falls back to `secrets/openai_key.txt`)
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: Model name (default: gpt-4o-mini)

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{gbp, percent};
use crate::models::ScenarioFacts;
use crate::prompts::{PromptId, PromptLibrary};

use super::parsing::{parse_simulation_text, parse_summary_text};
use super::types::ScenarioReply;
use super::AIBackend;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Key file consulted when `OPENAI_API_KEY` is unset
pub const KEY_FILE: &str = "secrets/openai_key.txt";

/// Upper bound on a single completion round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// export OPENAI_API_KEY="sk-..."
/// export OPENAI_MODEL="gpt-4o-mini"
///
/// // Local vLLM instead of the hosted API
/// export OPENAI_BASE_URL="http://192.168.1.100:8000"
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        let mut backend = Self::new(base_url, model);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Replace the prompt library (tests pin it to the embedded prompts)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    ///
    /// Returns `None` when no API key is configured in the environment or in
    /// the key file.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| read_key_file(Path::new(KEY_FILE)))?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Some(Self::with_api_key(&base_url, &model, &api_key))
    }

    /// Render a prompt into system text, user text and sampling settings
    fn render(&self, id: PromptId, vars: &HashMap<&str, &str>) -> Result<RenderedPrompt> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(id)?;
        Ok(RenderedPrompt {
            system: template.system_section().map(str::to_string),
            user: template.render_user(vars),
            temperature: template.metadata.temperature,
            max_tokens: template.metadata.max_tokens,
        })
    }

    /// Make a chat completion request
    async fn chat_completion(&self, prompt: RenderedPrompt) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.user,
        });

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(prompt.temperature),
            max_tokens: prompt.max_tokens,
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream { status, body });
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::InvalidData("No response from OpenAI API".into()))
    }
}

/// Read an API key from a file, ignoring surrounding whitespace
fn read_key_file(path: &Path) -> Option<String> {
    let key = std::fs::read_to_string(path).ok()?;
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// Template variables for the scenario coach prompt
fn scenario_vars(facts: &ScenarioFacts) -> Vec<(&'static str, String)> {
    let top_expenses = facts
        .top_expenses
        .iter()
        .map(|e| format!("{} {}", e.label, gbp(e.monthly)))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        ("period", facts.period.clone()),
        ("income", gbp(facts.salary_monthly)),
        ("expenses", gbp(facts.expenses_monthly)),
        ("savings", gbp(facts.savings_monthly)),
        ("resilience", percent(facts.resilience_pct)),
        ("liquidity", percent(facts.liquidity_pct)),
        ("top_expenses", top_expenses),
    ]
}

struct RenderedPrompt {
    system: Option<String>,
    user: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message (content is null for refusals and tool calls)
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn simulate_scenario(
        &self,
        facts: &ScenarioFacts,
        question: &str,
    ) -> Result<ScenarioReply> {
        let owned = scenario_vars(facts);
        let mut vars: HashMap<&str, &str> =
            owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        vars.insert("question", question);

        let prompt = self.render(PromptId::ScenarioCoach, &vars)?;
        let response = self.chat_completion(prompt).await?;
        debug!("OpenAI-compatible scenario response: {}", response);

        parse_simulation_text(&response)
    }

    async fn summarize_facts(&self, facts: &ScenarioFacts) -> Result<String> {
        let facts_json = serde_json::to_string(facts)?;
        let mut vars = HashMap::new();
        vars.insert("facts", facts_json.as_str());

        let prompt = self.render(PromptId::FactsSummary, &vars)?;
        let response = self.chat_completion(prompt).await?;
        debug!("OpenAI-compatible summary response: {}", response);

        parse_summary_text(&response)
    }

    async fn health_check(&self) -> bool {
        let mut req = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req = req.bearer_auth(api_key);
        }

        match req.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
