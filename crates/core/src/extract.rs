use serde_json::Value;

use crate::types::QaPair;

/// Why a completion yielded no usable pairs.
///
/// This is a diagnostic, not a propagated failure: callers absorb it into an
/// empty result and log the reason. Provider/transport errors never reach
/// this type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no JSON array found in completion")]
    NoArrayFound,

    #[error("bracket span is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("completion payload is not a JSON array")]
    NotAnArray,

    #[error("no usable question/answer objects in completion")]
    NoUsablePairs,
}

/// Extract validated question/answer pairs from a raw model completion.
///
/// Completions routinely wrap the JSON payload in prose or markdown fences,
/// so the array is recovered in three steps: parse the whole response
/// directly, then a string-aware balanced scan from the first `[`, then the
/// naive first-`[`/last-`]` slice as a last resort.
///
/// Elements that are not objects, or that lack a `question` or `answer`
/// key, are silently dropped. String values are trimmed; numbers and bools
/// are coerced to their JSON text. An array that survives parsing but
/// yields zero pairs is reported as [`ExtractionError::NoUsablePairs`].
/// Order is preserved from the model output.
pub fn extract_qa_pairs(response: &str) -> Result<Vec<QaPair>, ExtractionError> {
    let items = parse_array(response)?;

    let pairs: Vec<QaPair> = items.iter().filter_map(qa_pair_from).collect();

    if pairs.is_empty() {
        return Err(ExtractionError::NoUsablePairs);
    }

    Ok(pairs)
}

/// Recover the top-level JSON array from the completion text.
fn parse_array(response: &str) -> Result<Vec<Value>, ExtractionError> {
    // Completions that follow the format rules are pure JSON already.
    let direct = serde_json::from_str::<Value>(response.trim()).ok();
    if let Some(Value::Array(items)) = direct {
        return Ok(items);
    }

    if let Some(span) = balanced_array_span(response) {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(span) {
            return Ok(items);
        }
    }

    let Some(span) = outermost_array_span(response) else {
        // A parseable non-array with no embedded array span is a shape
        // error; anything else means the brackets were never there.
        return Err(if direct.is_some() {
            ExtractionError::NotAnArray
        } else {
            ExtractionError::NoArrayFound
        });
    };

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(ExtractionError::NotAnArray),
        Err(err) => Err(ExtractionError::InvalidJson(err.to_string())),
    }
}

/// Find the span from the first `[` to its matching `]`.
///
/// Tracks JSON string and escape state so literal brackets inside values do
/// not terminate the scan. Returns `None` when the array never closes.
fn balanced_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// The naive heuristic: first `[` through last `]`, inclusive.
fn outermost_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Build a pair from one array element, if it qualifies.
fn qa_pair_from(value: &Value) -> Option<QaPair> {
    let object = value.as_object()?;
    let question = coerce_text(object.get("question")?)?;
    let answer = coerce_text(object.get("answer")?)?;
    Some(QaPair { question, answer })
}

/// Coerce a JSON value to trimmed, non-empty text.
///
/// Strings are trimmed; numbers and bools keep their JSON rendering. Null
/// and composite values do not coerce.
fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() {
        return None;
    }

    Some(text)
}
