//! Remote scorer client — sync HTTP via ureq, no async runtime needed
//!
//! Speaks the OpenAI-compatible chat-completions wire format, which also
//! covers local gateways (Ollama, LiteLLM) through the base-URL override.

use crate::ai::{parse_structured_verdict, RemoteError, RemoteResult, RemoteVerdict};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Remote scorer settings
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// HTTP timeout for the whole call; the watch loop never waits on this,
    /// only the analysis task that issued it.
    pub timeout: std::time::Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 512,
            temperature: 0.2,
            timeout: std::time::Duration::from_secs(30),
        }
    }
}

/// Client for the optional remote scoring path
pub struct RemoteScorer {
    config: RemoteConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: std::time::Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We handle status codes ourselves
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl RemoteScorer {
    pub fn new(config: RemoteConfig, api_key: impl Into<String>) -> Self {
        let agent = make_agent(config.timeout);
        Self {
            config,
            api_key: api_key.into(),
            agent,
        }
    }

    /// Ask the remote model to rate `source` in the given persona.
    ///
    /// Any transport failure, non-2xx status, or unparseable body comes back
    /// as a [`RemoteError`]; the caller falls back to structural scoring.
    pub fn score(&self, source: &str, persona: &str) -> RemoteResult<RemoteVerdict> {
        let system = format!(
            "You are a code reviewer with the persona: {persona}. \
             Analyze the code for complexity, style, and bad practices."
        );
        let prompt = format!(
            "Analyze the following source code.\n\n\
             Return the response AS A RAW JSON OBJECT with no markdown formatting.\n\
             The JSON object must have keys: \"score\" (integer 0-100) and \"verdict\" (string).\n\n\
             Code:\n{source}"
        );

        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .agent
            .post(&self.config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(RemoteError::Api { status, message });
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RemoteError::Malformed("no response choices".to_string()))?;

        parse_structured_verdict(&content)
    }
}

// OpenAI-compatible wire types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}
