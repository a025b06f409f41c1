use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single public comment on a policy document.
///
/// Created once at ingestion and never mutated; the [`crate::SessionStore`]
/// owns all comments for the lifetime of an analysis run.
///
/// # Examples
///
/// ```
/// use edict_core::Comment;
/// use chrono::Utc;
///
/// let comment = Comment {
///     id: "comment_001".into(),
///     text: "This clause seems to infringe on individual privacy rights.".into(),
///     source: "e-consultation_portal".into(),
///     timestamp: Utc::now(),
///     policy_clause: "Section 7(a)".into(),
///     metadata: None,
/// };
/// assert_eq!(comment.policy_clause, "Section 7(a)");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment identifier.
    pub id: String,
    /// Raw comment text.
    pub text: String,
    /// Where the comment came from (portal, upload, ingestor name).
    pub source: String,
    /// When the comment was made; ingestion time if unparsable.
    pub timestamp: DateTime<Utc>,
    /// The policy clause the comment attaches to.
    pub policy_clause: String,
    /// Free-form metadata from the ingestion source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Stance a comment takes towards its clause.
///
/// # Examples
///
/// ```
/// use edict_core::Stance;
///
/// let s: Stance = serde_json::from_str("\"objection\"").unwrap();
/// assert_eq!(s, Stance::Objection);
/// assert_eq!(format!("{s}"), "objection");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// The commenter backs the clause as written.
    Support,
    /// The commenter wants the clause changed or removed.
    Objection,
    /// No clear position either way.
    Neutral,
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Support => write!(f, "support"),
            Stance::Objection => write!(f, "objection"),
            Stance::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "support" => Ok(Stance::Support),
            "objection" => Ok(Stance::Objection),
            "neutral" => Ok(Stance::Neutral),
            other => Err(format!("unknown stance: {other}")),
        }
    }
}

/// A stance-classified, themed argument extracted from exactly one comment.
///
/// `citations` is mutated once, when the oracle attaches matching citation
/// ids after extraction. Arguments are never deleted within a session.
///
/// # Examples
///
/// ```
/// use edict_core::{Argument, Stance};
///
/// let arg = Argument {
///     id: "arg_001".into(),
///     comment_id: "comment_001".into(),
///     text: "this clause infringes on privacy rights".into(),
///     stance: Stance::Objection,
///     themes: vec!["privacy".into()],
///     clause: "Section 7(a)".into(),
///     confidence: 0.9,
///     citations: vec![],
///     related_arguments: vec![],
/// };
/// assert_eq!(arg.stance, Stance::Objection);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    /// Unique argument identifier.
    pub id: String,
    /// Id of the comment this argument was extracted from.
    pub comment_id: String,
    /// Argument text (normalized on the heuristic path, raw on the LLM path).
    pub text: String,
    /// Classified stance.
    pub stance: Stance,
    /// Topical theme tags; `["general"]` when nothing matched.
    pub themes: Vec<String>,
    /// The policy clause this argument attaches to.
    pub clause: String,
    /// Extraction confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Ids of citations attached by the oracle.
    #[serde(default)]
    pub citations: Vec<String>,
    /// Ids of related arguments.
    #[serde(default)]
    pub related_arguments: Vec<String>,
}

/// Kind of reference a citation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationKind {
    /// Court judgments, statutes, regulations.
    Legal,
    /// Peer-reviewed studies and journal articles.
    Academic,
    /// Expert commissions, standards bodies, white papers.
    Expert,
}

impl fmt::Display for CitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationKind::Legal => write!(f, "legal"),
            CitationKind::Academic => write!(f, "academic"),
            CitationKind::Expert => write!(f, "expert"),
        }
    }
}

/// A legal or academic reference record.
///
/// Static read-only data; the oracle matches citations against argument
/// text by token overlap.
///
/// # Examples
///
/// ```
/// use edict_core::{Citation, CitationKind};
///
/// let cit = Citation {
///     id: "cit_001".into(),
///     title: "Puttaswamy Judgment on Privacy Rights".into(),
///     source: "Supreme Court of India".into(),
///     kind: CitationKind::Legal,
///     url: Some("https://example.com/puttaswamy-judgment".into()),
///     summary: "Landmark judgment establishing privacy as a fundamental right.".into(),
///     relevance_score: 0.98,
/// };
/// assert_eq!(cit.kind, CitationKind::Legal);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Unique citation identifier.
    pub id: String,
    /// Title of the cited work.
    pub title: String,
    /// Issuing court, journal, or body.
    pub source: String,
    /// Legal, academic, or expert.
    pub kind: CitationKind,
    /// Link to the cited work, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// One-paragraph summary used for matching.
    pub summary: String,
    /// Curated relevance score in `[0.0, 1.0]`.
    pub relevance_score: f64,
}

/// Which amendment template a suggestion was rendered from.
///
/// # Examples
///
/// ```
/// use edict_core::SuggestionKind;
///
/// let k: SuggestionKind = serde_json::from_str("\"objection_response\"").unwrap();
/// assert_eq!(k, SuggestionKind::ObjectionResponse);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Objections outweigh support; revise the clause.
    ObjectionResponse,
    /// Support outweighs objections; retain the clause.
    SupportAcknowledgment,
    /// Mixed or no feedback; review in detail.
    BalancedReview,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionKind::ObjectionResponse => write!(f, "objection_response"),
            SuggestionKind::SupportAcknowledgment => write!(f, "support_acknowledgment"),
            SuggestionKind::BalancedReview => write!(f, "balanced_review"),
        }
    }
}

/// A templated amendment suggestion for one clause.
///
/// Derived solely from the arguments on that clause; recomputed on every
/// analysis run and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendmentSuggestion {
    /// Fresh unique identifier for this suggestion.
    pub id: String,
    /// The clause this suggestion addresses.
    pub clause: String,
    /// Template the suggestion was rendered from.
    pub kind: SuggestionKind,
    /// One-line summary.
    pub summary: String,
    /// Longer explanation of the recommendation.
    pub details: String,
    /// Concrete change to make to the clause.
    pub suggested_change: String,
    /// Supporting citations (at most 3, objection_response only).
    pub citations: Vec<Citation>,
    /// Template confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// A single clause of a policy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyClause {
    /// Clause identifier (e.g. `"clause_003"`).
    pub id: String,
    /// Clause text.
    pub text: String,
    /// Section label (e.g. `"Section 4"`).
    pub section: String,
}

/// A parsed policy document.
///
/// # Examples
///
/// ```
/// use edict_core::PolicyDocument;
///
/// let policy = PolicyDocument {
///     id: "policy_001".into(),
///     title: "Digital Privacy Protection Act".into(),
///     content: "Full text...".into(),
///     clauses: vec![],
/// };
/// assert!(policy.clauses.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Full document text.
    pub content: String,
    /// Clauses parsed out of the document.
    #[serde(default)]
    pub clauses: Vec<PolicyClause>,
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use edict_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stance_roundtrips_through_json() {
        let json = serde_json::to_string(&Stance::Support).unwrap();
        assert_eq!(json, "\"support\"");

        let parsed: Stance = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(parsed, Stance::Neutral);
    }

    #[test]
    fn stance_from_str() {
        assert_eq!("support".parse::<Stance>().unwrap(), Stance::Support);
        assert_eq!("Objection".parse::<Stance>().unwrap(), Stance::Objection);
        assert_eq!("NEUTRAL".parse::<Stance>().unwrap(), Stance::Neutral);
        assert!("maybe".parse::<Stance>().is_err());
    }

    #[test]
    fn suggestion_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SuggestionKind::SupportAcknowledgment).unwrap();
        assert_eq!(json, "\"support_acknowledgment\"");
        assert_eq!(
            SuggestionKind::BalancedReview.to_string(),
            "balanced_review"
        );
    }

    #[test]
    fn argument_serializes_camel_case() {
        let arg = Argument {
            id: "a1".into(),
            comment_id: "c1".into(),
            text: "text".into(),
            stance: Stance::Neutral,
            themes: vec!["general".into()],
            clause: "Section 1".into(),
            confidence: 0.5,
            citations: vec![],
            related_arguments: vec![],
        };
        let json = serde_json::to_value(&arg).unwrap();
        assert!(json.get("commentId").is_some());
        assert!(json.get("comment_id").is_none());
        assert!(json.get("relatedArguments").is_some());
    }

    #[test]
    fn argument_citations_default_to_empty() {
        let json = r#"{
            "id": "a1",
            "commentId": "c1",
            "text": "t",
            "stance": "support",
            "themes": ["general"],
            "clause": "Section 1",
            "confidence": 0.5
        }"#;
        let arg: Argument = serde_json::from_str(json).unwrap();
        assert!(arg.citations.is_empty());
        assert!(arg.related_arguments.is_empty());
    }

    #[test]
    fn citation_omits_missing_url() {
        let cit = Citation {
            id: "cit_x".into(),
            title: "T".into(),
            source: "S".into(),
            kind: CitationKind::Expert,
            url: None,
            summary: "sum".into(),
            relevance_score: 0.5,
        };
        let json = serde_json::to_value(&cit).unwrap();
        assert!(json.get("url").is_none());
        assert_eq!(json["kind"], "expert");
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
