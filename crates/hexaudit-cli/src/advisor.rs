//! Blocking HTTP advisor for OpenAI-compatible chat endpoints.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use hexaudit_core::{Advisor, AdvisorError};

/// Default request timeout. Generous: a single review file can take the
/// model a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Advisor backed by any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiAdvisor {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiAdvisor {
    /// Creates an advisor for the given endpoint and model.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

impl Advisor for OpenAiAdvisor {
    fn infer(&self, prompt: &str) -> Result<String, AdvisorError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0,
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| AdvisorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(AdvisorError::Api(format!("{status}: {detail}")));
        }

        let reply: ChatReply = response
            .json()
            .map_err(|e| AdvisorError::Transport(e.to_string()))?;

        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AdvisorError::EmptyResponse)
    }
}
