//! Heuristic argument extraction.
//!
//! Keyword lookup tables stand in for a real model: stance comes from
//! counting support vs objection keywords, themes from five fixed keyword
//! lists, and confidence from a small additive formula over stance, theme
//! count, and keyword density.

use uuid::Uuid;

use edict_core::{Argument, Comment, LlmConfig, Stance};

use crate::llm::{ChatMessage, LlmClient};
use crate::prompt::{build_extraction_prompt, parse_extraction_response, SYSTEM_PROMPT};

const SUPPORT_KEYWORDS: &[&str] = &["support", "agree", "good", "benefit", "positive", "favor"];

const OBJECTION_KEYWORDS: &[&str] = &[
    "against",
    "disagree",
    "bad",
    "negative",
    "concern",
    "problem",
    "issue",
];

const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "privacy",
        &["privacy", "personal data", "surveillance", "monitoring"],
    ),
    (
        "economic",
        &["cost", "expense", "money", "financial", "economy"],
    ),
    ("legal", &["law", "legal", "constitution", "rights"]),
    (
        "technical",
        &["technology", "technical", "system", "software"],
    ),
    (
        "implementation",
        &["implement", "process", "procedure", "execute"],
    ),
];

/// Normalize comment text for keyword matching.
///
/// Lowercases, collapses runs of whitespace, and strips characters outside
/// word characters, whitespace, and basic punctuation.
///
/// # Examples
///
/// ```
/// use edict_mining::extractor::normalize_text;
///
/// assert_eq!(normalize_text("  I  SUPPORT   this! "), "i support this!");
/// assert_eq!(normalize_text("no @#$ specials"), "no  specials");
/// ```
pub fn normalize_text(text: &str) -> String {
    let collapsed = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    collapsed
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || *c == '_' || c.is_whitespace() || ".,;:!?()-".contains(*c)
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Classify the stance of normalized text.
///
/// Counts how many support keywords vs objection keywords appear as
/// substrings; the larger side wins and a tie (including zero hits on
/// both sides) is neutral.
///
/// # Examples
///
/// ```
/// use edict_mining::extractor::classify_stance;
/// use edict_core::Stance;
///
/// assert_eq!(classify_stance("i support this good benefit"), Stance::Support);
/// assert_eq!(classify_stance("i am against this, serious problem"), Stance::Objection);
/// assert_eq!(classify_stance("no opinion here"), Stance::Neutral);
/// ```
pub fn classify_stance(text: &str) -> Stance {
    let support_count = SUPPORT_KEYWORDS.iter().filter(|k| text.contains(*k)).count();
    let objection_count = OBJECTION_KEYWORDS
        .iter()
        .filter(|k| text.contains(*k))
        .count();

    if support_count > objection_count {
        Stance::Support
    } else if objection_count > support_count {
        Stance::Objection
    } else {
        Stance::Neutral
    }
}

/// Extract theme tags from normalized text.
///
/// A theme is assigned when any of its keyword phrases appears as a
/// substring. When nothing matches, the singleton `["general"]` is
/// returned.
///
/// # Examples
///
/// ```
/// use edict_mining::extractor::extract_themes;
///
/// assert_eq!(extract_themes("this surveillance is costly"), vec!["privacy", "economic"]);
/// assert_eq!(extract_themes("nothing topical"), vec!["general"]);
/// ```
pub fn extract_themes(text: &str) -> Vec<String> {
    let mut themes: Vec<String> = THEME_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(theme, _)| (*theme).to_string())
        .collect();

    if themes.is_empty() {
        themes.push("general".into());
    }

    themes
}

/// Stance-keyword density of normalized text.
///
/// Counts substring *occurrences* of every stance keyword (so "bad"
/// inside "badge" counts) divided by `max(word_count, 1)`. This matches
/// the observed behavior of the reference heuristic; it is intentionally
/// not a whole-word match.
pub fn keyword_density(text: &str) -> f64 {
    let occurrences: usize = SUPPORT_KEYWORDS
        .iter()
        .chain(OBJECTION_KEYWORDS.iter())
        .map(|k| text.match_indices(k).count())
        .sum();
    let word_count = text.split_whitespace().count().max(1);
    occurrences as f64 / word_count as f64
}

/// Confidence score for a heuristic extraction, clamped to `[0, 1]`.
///
/// Base 0.5, +0.2 for a non-neutral stance, +0.1 per theme capped at
/// +0.3, and +2x keyword density capped at +0.2.
pub fn confidence_score(stance: Stance, theme_count: usize, density: f64) -> f64 {
    let mut score = 0.5;
    if stance != Stance::Neutral {
        score += 0.2;
    }
    score += (theme_count as f64 * 0.1).min(0.3);
    score += (2.0 * density).min(0.2);
    score.clamp(0.0, 1.0)
}

/// Extract exactly one argument from a comment.
///
/// The argument carries the normalized text and a fresh uuid; citations
/// are attached later by the oracle.
///
/// # Examples
///
/// ```
/// use edict_mining::extractor::extract_argument;
/// use edict_core::{Comment, Stance};
/// use chrono::Utc;
///
/// let comment = Comment {
///     id: "c1".into(),
///     text: "I support this good benefit".into(),
///     source: "portal".into(),
///     timestamp: Utc::now(),
///     policy_clause: "Section 7(a)".into(),
///     metadata: None,
/// };
/// let arg = extract_argument(&comment);
/// assert_eq!(arg.stance, Stance::Support);
/// assert_eq!(arg.clause, "Section 7(a)");
/// ```
pub fn extract_argument(comment: &Comment) -> Argument {
    let text = normalize_text(&comment.text);
    let stance = classify_stance(&text);
    let themes = extract_themes(&text);
    let confidence = confidence_score(stance, themes.len(), keyword_density(&text));

    Argument {
        id: Uuid::new_v4().to_string(),
        comment_id: comment.id.clone(),
        text,
        stance,
        themes,
        clause: comment.policy_clause.clone(),
        confidence,
        citations: Vec::new(),
        related_arguments: Vec::new(),
    }
}

/// Extract one argument per comment. Infallible; order is preserved.
pub fn extract_arguments(comments: &[Comment]) -> Vec<Argument> {
    comments.iter().map(extract_argument).collect()
}

/// LLM-backed extractor with per-comment heuristic fallback.
///
/// Each comment is sent to the model individually; a failed request or an
/// unparsable response degrades that one comment to the keyword heuristic
/// with a stderr warning, so a flaky provider never aborts a run.
pub struct LlmExtractor {
    client: LlmClient,
}

impl LlmExtractor {
    /// Create an extractor from LLM configuration.
    ///
    /// # Errors
    ///
    /// Returns [`edict_core::EdictError::Llm`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &LlmConfig) -> edict_core::Result<Self> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }

    /// Model name in use.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Extract one argument from a comment via the model.
    ///
    /// Unlike the heuristic path, the argument keeps the raw comment text.
    /// Citations named by the model are carried as-is; downstream code
    /// validates them against the reference library.
    pub async fn extract_argument(&self, comment: &Comment) -> Argument {
        match self.try_extract(comment).await {
            Ok(argument) => argument,
            Err(e) => {
                eprintln!(
                    "warning: LLM extraction failed for comment '{}', using heuristic: {e}",
                    comment.id
                );
                extract_argument(comment)
            }
        }
    }

    /// Extract one argument per comment, in order.
    pub async fn extract_arguments(&self, comments: &[Comment]) -> Vec<Argument> {
        let mut arguments = Vec::with_capacity(comments.len());
        for comment in comments {
            arguments.push(self.extract_argument(comment).await);
        }
        arguments
    }

    async fn try_extract(&self, comment: &Comment) -> edict_core::Result<Argument> {
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_extraction_prompt(
                &comment.text,
                &comment.policy_clause,
            )),
        ];
        let response = self.client.chat(messages).await?;
        let extracted = parse_extraction_response(&response)?;

        Ok(Argument {
            id: Uuid::new_v4().to_string(),
            comment_id: comment.id.clone(),
            text: comment.text.clone(),
            stance: extracted.stance,
            themes: extracted.themes,
            clause: comment.policy_clause.clone(),
            confidence: extracted.confidence,
            citations: extracted.citations,
            related_arguments: Vec::new(),
        })
    }
}
