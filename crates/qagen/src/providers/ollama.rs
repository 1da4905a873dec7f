use crate::prelude::*;
use qagen_core::{build_combined_prompt, GenerationRequest};
use serde_json::{json, Value};

use super::CompletionProvider;

/// Locally reachable generation endpoint (single combined prompt, no roles).
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
        }
    }
}

/// Build the /api/generate request body. Streaming is always disabled.
fn build_generate_payload(model: &str, request: &GenerationRequest) -> Value {
    json!({
        "model": model,
        "prompt": build_combined_prompt(request),
        "stream": false,
    })
}

/// Pluck the completion text out of a generate response body.
fn completion_text(body: &Value) -> Option<String> {
    body.get("response")?.as_str().map(str::to_string)
}

#[async_trait::async_trait]
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = build_generate_payload(&self.model, request);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| eyre!("Failed to reach Ollama at {}: {}", self.base_url, e))?;

        if !response.status().is_success() {
            return Err(eyre!(
                "Ollama generate request failed: HTTP {}",
                response.status()
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse Ollama response: {}", e))?;

        completion_text(&body).ok_or_eyre("Ollama response carried no response field")
    }
}
