use crate::types::GenerationRequest;

/// Format rules sent as the system message to providers with chat roles.
pub const SYSTEM_PREAMBLE: &str = "\
You are a question-answer pair generator. You receive a source text and a count.
You output ONLY a JSON array of question-answer pairs.

Rules:
- Output a raw JSON array only. No markdown fences. No explanations. No commentary.
- Produce exactly the requested number of pairs.
- Each element is an object with exactly two fields: \"question\" and \"answer\".
- Both fields are strings, double-quoted.
- Make questions diverse and challenging.";

/// Build the user prompt from a generation request.
///
/// Carries the source text, the requested count, and the expected output
/// shape so the completion stays parseable.
pub fn build_user_prompt(request: &GenerationRequest) -> String {
    format!(
        "Given the following text, generate {count} question-answer pairs.\n\
         \n\
         Text:\n\
         {text}\n\
         \n\
         Generate the pairs in the following format:\n\
         [\n\
         {{\"question\": \"Q1\", \"answer\": \"A1\"}},\n\
         {{\"question\": \"Q2\", \"answer\": \"A2\"}}\n\
         ]",
        count = request.requested_count,
        text = request.source_text,
    )
}

/// Build a single combined prompt for providers without system/user roles.
pub fn build_combined_prompt(request: &GenerationRequest) -> String {
    format!("{SYSTEM_PREAMBLE}\n\n{}", build_user_prompt(request))
}
