//! Prompt construction and response parsing for LLM extraction.

use edict_core::{EdictError, Stance};
use serde::Deserialize;

/// System prompt for the extraction conversation.
pub const SYSTEM_PROMPT: &str = "You are a policy analyst extracting structured arguments \
from public comments on draft legislation. Respond only with a JSON object.";

/// Build the user prompt for one comment.
///
/// # Examples
///
/// ```
/// use edict_mining::prompt::build_extraction_prompt;
///
/// let prompt = build_extraction_prompt("I oppose this", "Section 7(a)");
/// assert!(prompt.contains("Section 7(a)"));
/// assert!(prompt.contains("I oppose this"));
/// ```
pub fn build_extraction_prompt(comment_text: &str, clause: &str) -> String {
    format!(
        r#"Analyze the following public comment on policy clause "{clause}".

Comment:
{comment_text}

Return a JSON object with exactly these fields:
- "stance": one of "support", "objection", or "neutral"
- "themes": an array of short topical tags (e.g. ["privacy", "economic"])
- "confidence": a number between 0 and 1
- "citations": an array of citation identifiers the comment references, or []"#
    )
}

/// One argument as extracted by the model.
///
/// Fields the model omits get conservative defaults during parsing.
#[derive(Debug, Clone)]
pub struct ExtractedArgument {
    /// Stance toward the clause.
    pub stance: Stance,
    /// Topical tags.
    pub themes: Vec<String>,
    /// Extraction confidence in `[0, 1]`.
    pub confidence: f64,
    /// Citation identifiers named by the comment.
    pub citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    stance: Option<String>,
    #[serde(default)]
    themes: Option<Vec<String>>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    citations: Option<Vec<String>>,
}

/// Parse a model response into an [`ExtractedArgument`].
///
/// Tolerates markdown code fences around the JSON. An unrecognized stance
/// maps to neutral, missing themes become `["general"]`, a missing
/// confidence defaults to 0.8, and confidence is clamped to `[0, 1]`.
///
/// # Errors
///
/// Returns [`EdictError::Llm`] when the response is not a JSON object at
/// all; callers fall back to the heuristic extractor per comment.
///
/// # Examples
///
/// ```
/// use edict_mining::prompt::parse_extraction_response;
/// use edict_core::Stance;
///
/// let arg = parse_extraction_response(
///     r#"{"stance": "support", "themes": ["privacy"], "confidence": 0.95, "citations": []}"#,
/// ).unwrap();
/// assert_eq!(arg.stance, Stance::Support);
/// assert_eq!(arg.confidence, 0.95);
/// ```
pub fn parse_extraction_response(response: &str) -> Result<ExtractedArgument, EdictError> {
    let stripped = strip_code_fences(response);
    let raw: RawExtraction = serde_json::from_str(stripped)
        .map_err(|e| EdictError::Llm(format!("malformed extraction response: {e}")))?;

    let stance = raw
        .stance
        .as_deref()
        .and_then(|s| s.parse::<Stance>().ok())
        .unwrap_or(Stance::Neutral);

    let themes = match raw.themes {
        Some(themes) if !themes.is_empty() => themes,
        _ => vec!["general".into()],
    };

    Ok(ExtractedArgument {
        stance,
        themes,
        confidence: raw.confidence.unwrap_or(0.8).clamp(0.0, 1.0),
        citations: raw.citations.unwrap_or_default(),
    })
}

/// Strip a surrounding markdown code fence, with or without a language tag.
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_clause_and_fields() {
        let prompt = build_extraction_prompt("too expensive", "clause_001");
        assert!(prompt.contains("clause_001"));
        assert!(prompt.contains("too expensive"));
        assert!(prompt.contains("\"stance\""));
        assert!(prompt.contains("\"citations\""));
    }

    #[test]
    fn parses_complete_response() {
        let arg = parse_extraction_response(
            r#"{"stance": "objection", "themes": ["privacy", "legal"], "confidence": 0.9, "citations": ["cit_001"]}"#,
        )
        .unwrap();
        assert_eq!(arg.stance, Stance::Objection);
        assert_eq!(arg.themes, vec!["privacy", "legal"]);
        assert_eq!(arg.citations, vec!["cit_001"]);
    }

    #[test]
    fn strips_fenced_responses() {
        let fenced = "```json\n{\"stance\": \"support\"}\n```";
        let arg = parse_extraction_response(fenced).unwrap();
        assert_eq!(arg.stance, Stance::Support);

        let bare_fence = "```\n{\"stance\": \"neutral\"}\n```";
        assert!(parse_extraction_response(bare_fence).is_ok());
    }

    #[test]
    fn unknown_stance_maps_to_neutral() {
        let arg = parse_extraction_response(r#"{"stance": "ambivalent"}"#).unwrap();
        assert_eq!(arg.stance, Stance::Neutral);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let arg = parse_extraction_response("{}").unwrap();
        assert_eq!(arg.stance, Stance::Neutral);
        assert_eq!(arg.themes, vec!["general"]);
        assert_eq!(arg.confidence, 0.8);
        assert!(arg.citations.is_empty());
    }

    #[test]
    fn empty_theme_list_becomes_general() {
        let arg = parse_extraction_response(r#"{"themes": []}"#).unwrap();
        assert_eq!(arg.themes, vec!["general"]);
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        let high = parse_extraction_response(r#"{"confidence": 1.7}"#).unwrap();
        assert_eq!(high.confidence, 1.0);
        let low = parse_extraction_response(r#"{"confidence": -0.2}"#).unwrap();
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_extraction_response("I think they support it").is_err());
        assert!(parse_extraction_response("").is_err());
    }
}
