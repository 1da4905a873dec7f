use crate::prelude::*;
use qagen_core::{extract_qa_pairs, GenerationRequest, QaPair};

use crate::providers::CompletionProvider;

/// Orchestrates one generation: a single provider call followed by
/// extraction. Constructed fresh per invocation; holds no other state.
pub struct QaGenerator {
    provider: Box<dyn CompletionProvider>,
}

impl QaGenerator {
    pub fn new(provider: Box<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Generate pairs for the request.
    ///
    /// Provider and transport failures propagate. A completion the
    /// extractor cannot use degrades to an empty result with a warn-level
    /// diagnostic; an empty result is therefore indistinguishable from
    /// "the model returned nothing usable".
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<QaPair>> {
        let completion = self.provider.complete(request).await?;

        match extract_qa_pairs(&completion) {
            Ok(pairs) => Ok(pairs),
            Err(reason) => {
                log::warn!(
                    "discarding {} completion ({} chars): {}",
                    self.provider.name(),
                    completion.len(),
                    reason
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProvider(&'static str);

    #[async_trait::async_trait]
    impl CompletionProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn complete(&self, _request: &GenerationRequest) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl CompletionProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn complete(&self, _request: &GenerationRequest) -> Result<String> {
            Err(eyre!("connection refused"))
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            source_text: "text".to_string(),
            requested_count: 2,
        }
    }

    #[tokio::test]
    async fn test_good_completion_yields_pairs() {
        let generator = QaGenerator::new(Box::new(CannedProvider(
            "Sure!\n[{\"question\":\"Q1\",\"answer\":\"A1\"},{\"question\":\"Q2\",\"answer\":\"A2\"}]",
        )));

        let pairs = generator.generate(&request()).await.unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "Q1");
        assert_eq!(pairs[1].answer, "A2");
    }

    #[tokio::test]
    async fn test_garbage_completion_absorbed_to_empty() {
        let generator =
            QaGenerator::new(Box::new(CannedProvider("I cannot help with that request.")));

        let pairs = generator.generate(&request()).await.unwrap();

        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let generator = QaGenerator::new(Box::new(FailingProvider));

        let result = generator.generate(&request()).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("connection refused"));
    }
}
