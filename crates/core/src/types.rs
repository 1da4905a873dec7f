use serde::{Deserialize, Serialize};

/// A validated question/answer record extracted from a model completion.
///
/// Both fields are non-empty after trimming; construction goes through
/// the extraction layer, which enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// A request for question-answer pair generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The source text to generate questions from.
    pub source_text: String,
    /// How many pairs the model is asked to produce. Must be positive;
    /// entry points may bound it further (the web form caps it at 20).
    pub requested_count: usize,
}
