use crate::types::{Argument, Citation, Comment, PolicyDocument};

/// Owned in-memory store for one analysis session.
///
/// Replaces the process-global mutable map of the reference deployment with
/// an explicitly owned object: one store per run, mutated only by the
/// pipeline that owns it. Comments are append-only, arguments are replaced
/// wholesale on each analysis, and citations are deduplicated by id.
///
/// # Examples
///
/// ```
/// use edict_core::SessionStore;
///
/// let store = SessionStore::new();
/// assert!(!store.has_comments());
/// assert!(!store.has_policy());
/// ```
#[derive(Debug, Default)]
pub struct SessionStore {
    comments: Vec<Comment>,
    arguments: Vec<Argument>,
    policies: Vec<PolicyDocument>,
    citations: Vec<Citation>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append ingested comments to the session.
    pub fn add_comments(&mut self, comments: Vec<Comment>) {
        self.comments.extend(comments);
    }

    /// Register a parsed policy document.
    pub fn add_policy(&mut self, policy: PolicyDocument) {
        self.policies.push(policy);
    }

    /// Replace the extracted arguments for this session.
    pub fn replace_arguments(&mut self, arguments: Vec<Argument>) {
        self.arguments = arguments;
    }

    /// Record citations matched during analysis, skipping ids already seen.
    pub fn add_citations(&mut self, citations: Vec<Citation>) {
        for citation in citations {
            if !self.citations.iter().any(|c| c.id == citation.id) {
                self.citations.push(citation);
            }
        }
    }

    /// Drop all session data.
    pub fn clear(&mut self) {
        self.comments.clear();
        self.arguments.clear();
        self.policies.clear();
        self.citations.clear();
    }

    /// Whether any comments have been ingested.
    pub fn has_comments(&self) -> bool {
        !self.comments.is_empty()
    }

    /// Whether a policy document has been registered.
    pub fn has_policy(&self) -> bool {
        !self.policies.is_empty()
    }

    /// All ingested comments, in ingestion order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Arguments from the most recent analysis run.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Mutable view of the session's arguments, for citation attachment.
    pub fn arguments_mut(&mut self) -> &mut [Argument] {
        &mut self.arguments
    }

    /// Registered policy documents.
    pub fn policies(&self) -> &[PolicyDocument] {
        &self.policies
    }

    /// Citations matched during the most recent analysis run.
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CitationKind, Stance};
    use chrono::Utc;

    fn make_comment(id: &str) -> Comment {
        Comment {
            id: id.into(),
            text: "text".into(),
            source: "test".into(),
            timestamp: Utc::now(),
            policy_clause: "Section 1".into(),
            metadata: None,
        }
    }

    fn make_citation(id: &str) -> Citation {
        Citation {
            id: id.into(),
            title: "T".into(),
            source: "S".into(),
            kind: CitationKind::Legal,
            url: None,
            summary: "sum".into(),
            relevance_score: 0.9,
        }
    }

    #[test]
    fn comments_append_in_order() {
        let mut store = SessionStore::new();
        store.add_comments(vec![make_comment("c1")]);
        store.add_comments(vec![make_comment("c2"), make_comment("c3")]);
        let ids: Vec<&str> = store.comments().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn replace_arguments_discards_previous_run() {
        let mut store = SessionStore::new();
        let arg = Argument {
            id: "a1".into(),
            comment_id: "c1".into(),
            text: "t".into(),
            stance: Stance::Neutral,
            themes: vec!["general".into()],
            clause: "Section 1".into(),
            confidence: 0.5,
            citations: vec![],
            related_arguments: vec![],
        };
        store.replace_arguments(vec![arg.clone()]);
        assert_eq!(store.arguments().len(), 1);

        store.replace_arguments(vec![arg.clone(), arg]);
        assert_eq!(store.arguments().len(), 2);
    }

    #[test]
    fn citations_dedupe_by_id() {
        let mut store = SessionStore::new();
        store.add_citations(vec![make_citation("cit_001"), make_citation("cit_001")]);
        store.add_citations(vec![make_citation("cit_002"), make_citation("cit_001")]);
        assert_eq!(store.citations().len(), 2);
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = SessionStore::new();
        store.add_comments(vec![make_comment("c1")]);
        store.add_citations(vec![make_citation("cit_001")]);
        store.clear();
        assert!(!store.has_comments());
        assert!(store.citations().is_empty());
    }
}
