use crate::prelude::*;
use qagen_core::GenerationRequest;

pub mod ollama;
pub mod openai;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// One completion capability behind both provider shapes.
///
/// Implementations map a generation request to the provider's raw
/// completion text. Transport and API-level failures propagate to the
/// caller; the extraction layer never sees them. No retries, no caching.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Send one request and return the raw completion text.
    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}

/// Provider connection settings, shared by the CLI and the web server.
#[derive(Debug, Clone, clap::Args)]
pub struct ProviderOptions {
    /// API key for the hosted chat provider
    #[arg(
        long,
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    pub openai_api_key: String,

    /// Base URL for the hosted chat provider
    #[arg(long, env = "OPENAI_API_BASE", default_value = "https://api.openai.com")]
    pub openai_api_base: String,

    /// Model identifier for the hosted chat provider
    #[arg(long, env = "QAGEN_OPENAI_MODEL", default_value = "gpt-3.5-turbo")]
    pub openai_model: String,

    /// Ollama base URL
    #[arg(long, env = "OLLAMA_API_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    /// Ollama model identifier
    #[arg(long, env = "QAGEN_OLLAMA_MODEL", default_value = "llama2")]
    pub ollama_model: String,

    /// Sampling temperature for the chat provider
    #[arg(long, env = "QAGEN_TEMPERATURE", default_value = "0.7")]
    pub temperature: f64,

    /// Completion token cap for the chat provider
    #[arg(long, env = "QAGEN_MAX_TOKENS", default_value = "1000")]
    pub max_tokens: u32,
}

impl ProviderOptions {
    /// Select a provider once, at construction time.
    ///
    /// The web form's literal model value "ollama" and the CLI's
    /// --use-ollama flag select the local endpoint; anything else selects
    /// the hosted chat provider. Adding a third provider means adding a
    /// branch here and nowhere else.
    pub fn select(&self, use_ollama: bool) -> Box<dyn CompletionProvider> {
        if use_ollama {
            Box::new(OllamaProvider::new(
                self.ollama_url.clone(),
                self.ollama_model.clone(),
            ))
        } else {
            Box::new(OpenAiProvider::new(
                self.openai_api_base.clone(),
                self.openai_api_key.clone(),
                self.openai_model.clone(),
                self.temperature,
                self.max_tokens,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ProviderOptions {
        ProviderOptions {
            openai_api_key: "sk-test".to_string(),
            openai_api_base: "https://api.openai.com".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama2".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    #[test]
    fn test_select_ollama() {
        assert_eq!(options().select(true).name(), "ollama");
    }

    #[test]
    fn test_select_openai() {
        assert_eq!(options().select(false).name(), "openai");
    }
}
