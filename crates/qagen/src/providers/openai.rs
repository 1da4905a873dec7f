use crate::prelude::*;
use qagen_core::{build_user_prompt, GenerationRequest, SYSTEM_PREAMBLE};
use serde_json::{json, Value};

use super::CompletionProvider;

/// Hosted chat-completions provider (system/user roles, bearer auth).
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(
        api_base: String,
        api_key: String,
        model: String,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
            model,
            temperature,
            max_tokens,
        }
    }
}

/// Build the chat-completions request body.
fn build_chat_payload(
    model: &str,
    temperature: f64,
    max_tokens: u32,
    request: &GenerationRequest,
) -> Value {
    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": SYSTEM_PREAMBLE},
            {"role": "user", "content": build_user_prompt(request)},
        ],
        "temperature": temperature,
        "max_tokens": max_tokens,
    })
}

/// Pluck the completion text out of a chat-completions response body.
fn completion_text(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base);
        let payload = build_chat_payload(&self.model, self.temperature, self.max_tokens, request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| eyre!("Failed to reach chat completions endpoint: {}", e))?;

        if !response.status().is_success() {
            return Err(eyre!(
                "Chat completion request failed: HTTP {}",
                response.status()
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse chat completion response: {}", e))?;

        completion_text(&body).ok_or_eyre("Chat completion response carried no message content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            source_text: "The Nile is a river in Africa.".to_string(),
            requested_count: 3,
        }
    }

    #[test]
    fn test_payload_carries_model_and_sampling() {
        let payload = build_chat_payload("gpt-3.5-turbo", 0.7, 1000, &request());

        assert_eq!(payload["model"], "gpt-3.5-turbo");
        assert_eq!(payload["temperature"], 0.7);
        assert_eq!(payload["max_tokens"], 1000);
    }

    #[test]
    fn test_payload_has_system_and_user_roles() {
        let payload = build_chat_payload("gpt-3.5-turbo", 0.7, 1000, &request());
        let messages = payload["messages"].as_array().unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_PREAMBLE);
        assert_eq!(messages[1]["role"], "user");
        assert!(messages[1]["content"]
            .as_str()
            .unwrap()
            .contains("The Nile is a river in Africa."));
    }

    #[test]
    fn test_completion_text_plucked() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "[{\"question\":\"Q\",\"answer\":\"A\"}]"}}]
        });

        assert_eq!(
            completion_text(&body).unwrap(),
            "[{\"question\":\"Q\",\"answer\":\"A\"}]"
        );
    }

    #[test]
    fn test_completion_text_missing_fields() {
        assert_eq!(completion_text(&json!({})), None);
        assert_eq!(completion_text(&json!({"choices": []})), None);
        assert_eq!(
            completion_text(&json!({"choices": [{"message": {}}]})),
            None
        );
    }
}
