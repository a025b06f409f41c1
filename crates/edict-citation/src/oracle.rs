//! Token-overlap citation matching against the static reference library.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use edict_core::{Argument, Citation, CitationKind};

/// Minimum shared-token count (exclusive) for a citation to match.
const OVERLAP_THRESHOLD: usize = 2;

static REFERENCE_LIBRARY: Lazy<Vec<Citation>> = Lazy::new(|| {
    vec![
        Citation {
            id: "cit_001".into(),
            title: "Puttaswamy Judgment on Privacy Rights".into(),
            source: "Supreme Court of India".into(),
            kind: CitationKind::Legal,
            url: Some("https://example.com/puttaswamy-judgment".into()),
            summary: "Landmark judgment establishing privacy as a fundamental right under the Indian Constitution.".into(),
            relevance_score: 0.98,
        },
        Citation {
            id: "cit_002".into(),
            title: "General Data Protection Regulation (GDPR)".into(),
            source: "European Union".into(),
            kind: CitationKind::Legal,
            url: Some("https://example.com/gdpr".into()),
            summary: "Regulation on data protection and privacy in the European Union.".into(),
            relevance_score: 0.95,
        },
        Citation {
            id: "cit_003".into(),
            title: "Economic Impact of Data Privacy Laws".into(),
            source: "Journal of Digital Economics".into(),
            kind: CitationKind::Academic,
            url: Some("https://example.com/economic-impact".into()),
            summary: "Study on the economic effects of implementing strict data privacy regulations.".into(),
            relevance_score: 0.85,
        },
        Citation {
            id: "cit_004".into(),
            title: "Committee of Experts Report on Data Protection".into(),
            source: "Ministry of Electronics and Information Technology".into(),
            kind: CitationKind::Expert,
            url: None,
            summary: "Expert committee report recommending safeguards for the processing of personal data.".into(),
            relevance_score: 0.90,
        },
        Citation {
            id: "cit_005".into(),
            title: "Surveillance Technology and Civil Liberties".into(),
            source: "Centre for Internet and Society".into(),
            kind: CitationKind::Expert,
            url: Some("https://example.com/surveillance-liberties".into()),
            summary: "Expert analysis of government surveillance and monitoring systems and their effect on civil liberties.".into(),
            relevance_score: 0.82,
        },
    ]
});

/// The static citation table, in insertion order.
///
/// # Examples
///
/// ```
/// use edict_citation::oracle::reference_library;
///
/// let library = reference_library();
/// assert!(library.len() >= 3);
/// assert_eq!(library[0].id, "cit_001");
/// ```
pub fn reference_library() -> &'static [Citation] {
    &REFERENCE_LIBRARY
}

/// Find citations relevant to an argument by whitespace-token overlap.
///
/// A citation matches when the lowercased argument text shares strictly
/// more than 2 distinct tokens with the citation's title and summary.
/// Results keep the library's insertion order; there is no further ranking.
///
/// # Examples
///
/// ```
/// use edict_citation::oracle::find_citations;
/// use edict_core::{Argument, Stance};
///
/// let arg = Argument {
///     id: "a1".into(),
///     comment_id: "c1".into(),
///     text: "privacy is a fundamental right".into(),
///     stance: Stance::Objection,
///     themes: vec!["privacy".into()],
///     clause: "Section 7(a)".into(),
///     confidence: 0.9,
///     citations: vec![],
///     related_arguments: vec![],
/// };
/// let citations = find_citations(&arg);
/// assert!(citations.iter().any(|c| c.id == "cit_001"));
/// ```
pub fn find_citations(argument: &Argument) -> Vec<Citation> {
    let argument_tokens: HashSet<String> = argument
        .text
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut relevant = Vec::new();
    for citation in reference_library() {
        let citation_text = format!("{} {}", citation.title, citation.summary).to_lowercase();
        let citation_tokens: HashSet<&str> = citation_text.split_whitespace().collect();

        let overlap = argument_tokens
            .iter()
            .filter(|t| citation_tokens.contains(t.as_str()))
            .count();

        if overlap > OVERLAP_THRESHOLD {
            relevant.push(citation.clone());
        }
    }

    relevant
}

/// Whether `citation_id` exists in the static table.
///
/// Used to guard external references (e.g. citation ids returned by an LLM)
/// before attaching them to an argument.
///
/// # Examples
///
/// ```
/// use edict_citation::oracle::validate_citation;
///
/// assert!(validate_citation("cit_001"));
/// assert!(!validate_citation("cit_999"));
/// ```
pub fn validate_citation(citation_id: &str) -> bool {
    reference_library().iter().any(|c| c.id == citation_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edict_core::Stance;

    fn make_argument(text: &str) -> Argument {
        Argument {
            id: "a1".into(),
            comment_id: "c1".into(),
            text: text.into(),
            stance: Stance::Objection,
            themes: vec!["privacy".into()],
            clause: "Section 7(a)".into(),
            confidence: 0.9,
            citations: vec![],
            related_arguments: vec![],
        }
    }

    #[test]
    fn three_shared_tokens_match() {
        // "privacy", "a", "fundamental", "right" all appear in cit_001's
        // title+summary, so the overlap is comfortably above the threshold.
        let arg = make_argument("privacy is a fundamental right");
        let citations = find_citations(&arg);
        assert!(citations.iter().any(|c| c.id == "cit_001"));
    }

    #[test]
    fn two_shared_tokens_do_not_match() {
        // Only "privacy" and "rights" overlap with cit_001.
        let arg = make_argument("privacy rights matter");
        let citations = find_citations(&arg);
        assert!(!citations.iter().any(|c| c.id == "cit_001"));
    }

    #[test]
    fn no_overlap_returns_empty() {
        let arg = make_argument("completely unrelated commentary about roads");
        assert!(find_citations(&arg).is_empty());
    }

    #[test]
    fn results_keep_library_order() {
        // Tokens chosen to overlap with both cit_001 and cit_002.
        let arg =
            make_argument("data protection and privacy regulation is a fundamental right in the union");
        let citations = find_citations(&arg);
        let ids: Vec<&str> = citations.iter().map(|c| c.id.as_str()).collect();
        let pos_1 = ids.iter().position(|id| *id == "cit_001");
        let pos_2 = ids.iter().position(|id| *id == "cit_002");
        if let (Some(p1), Some(p2)) = (pos_1, pos_2) {
            assert!(p1 < p2);
        }
        assert!(pos_1.is_some());
    }

    #[test]
    fn validate_known_and_unknown_ids() {
        assert!(validate_citation("cit_001"));
        assert!(validate_citation("cit_005"));
        assert!(!validate_citation("cit_042"));
        assert!(!validate_citation(""));
    }

    #[test]
    fn overlap_counts_distinct_tokens_not_occurrences() {
        // "privacy privacy privacy" is still a single shared token.
        let arg = make_argument("privacy privacy privacy");
        assert!(find_citations(&arg).is_empty());
    }

    #[test]
    fn library_scores_are_bounded() {
        for citation in reference_library() {
            assert!((0.0..=1.0).contains(&citation.relevance_score));
        }
    }
}
