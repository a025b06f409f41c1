//! Templated amendment suggestions.
//!
//! One suggestion per clause, picked by comparing support and objection
//! counts. The three templates carry fixed confidences: 0.9 for an
//! objection response, 0.8 for a support acknowledgment, 0.7 for a
//! balanced review.

use uuid::Uuid;

use edict_citation::{find_citations, reference_library};
use edict_core::{AmendmentConfig, AmendmentSuggestion, Citation, Stance, SuggestionKind};
use edict_fusion::ClauseGroup;

/// Generate one amendment suggestion per clause group.
///
/// Group order is preserved. A group where objections outnumber support
/// gets an objection response naming the dominant objection themes and up
/// to `config.max_citations` supporting citations; a support-dominated
/// group gets a retention recommendation; a tie (including all-neutral
/// groups) gets a balanced-review recommendation.
///
/// # Examples
///
/// ```
/// use edict_amend::generator::suggest_amendments;
/// use edict_core::AmendmentConfig;
///
/// let suggestions = suggest_amendments(&[], &AmendmentConfig::default());
/// assert!(suggestions.is_empty());
/// ```
pub fn suggest_amendments(
    groups: &[ClauseGroup],
    config: &AmendmentConfig,
) -> Vec<AmendmentSuggestion> {
    groups
        .iter()
        .map(|group| suggest_for_group(group, config))
        .collect()
}

fn suggest_for_group(group: &ClauseGroup, config: &AmendmentConfig) -> AmendmentSuggestion {
    let support = count_stance(group, Stance::Support);
    let objection = count_stance(group, Stance::Objection);

    if objection > support {
        objection_response(group, config)
    } else if support > objection {
        support_acknowledgment(group)
    } else {
        balanced_review(group)
    }
}

fn count_stance(group: &ClauseGroup, stance: Stance) -> usize {
    group.arguments.iter().filter(|a| a.stance == stance).count()
}

fn objection_response(group: &ClauseGroup, config: &AmendmentConfig) -> AmendmentSuggestion {
    let themes = top_objection_themes(group, config.max_themes);
    let theme_list = themes.join(", ");

    AmendmentSuggestion {
        id: Uuid::new_v4().to_string(),
        clause: group.clause.clone(),
        kind: SuggestionKind::ObjectionResponse,
        summary: format!("Address concerns regarding {theme_list}"),
        details: format!(
            "This clause has received significant objection, primarily concerning \
             {theme_list}. Consider revising to address these concerns."
        ),
        suggested_change: format!(
            "Revise clause {} to better address {theme_list} concerns",
            group.clause
        ),
        citations: objection_citations(group, config.max_citations),
        confidence: 0.9,
    }
}

fn support_acknowledgment(group: &ClauseGroup) -> AmendmentSuggestion {
    AmendmentSuggestion {
        id: Uuid::new_v4().to_string(),
        clause: group.clause.clone(),
        kind: SuggestionKind::SupportAcknowledgment,
        summary: "Positive reception".into(),
        details: "This clause has received strong support from commenters.".into(),
        suggested_change: "Retain this clause as currently worded".into(),
        citations: Vec::new(),
        confidence: 0.8,
    }
}

fn balanced_review(group: &ClauseGroup) -> AmendmentSuggestion {
    AmendmentSuggestion {
        id: Uuid::new_v4().to_string(),
        clause: group.clause.clone(),
        kind: SuggestionKind::BalancedReview,
        summary: "Mixed feedback requires detailed review".into(),
        details: "This clause has received both support and objection. A detailed review \
                  is recommended."
            .into(),
        suggested_change: format!(
            "Conduct detailed review of clause {} considering all feedback",
            group.clause
        ),
        citations: Vec::new(),
        confidence: 0.7,
    }
}

/// The most frequent themes across a clause's objection arguments.
///
/// Ties break toward the theme encountered first.
fn top_objection_themes(group: &ClauseGroup, max_themes: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for argument in group.arguments.iter().filter(|a| a.stance == Stance::Objection) {
        for theme in &argument.themes {
            match counts.iter_mut().find(|(t, _)| t == theme) {
                Some((_, n)) => *n += 1,
                None => counts.push((theme.clone(), 1)),
            }
        }
    }

    // stable sort keeps first-encountered order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(max_themes);

    if counts.is_empty() {
        vec!["general".into()]
    } else {
        counts.into_iter().map(|(theme, _)| theme).collect()
    }
}

/// Collect supporting citations for a clause's objection arguments.
///
/// For each objection argument, ids already attached to it are resolved
/// first, then the reference library is consulted for further matches
/// against the argument text. Ids unknown to the library are skipped and
/// duplicates collapse; the result is capped at `max_citations` in
/// first-encountered order.
fn objection_citations(group: &ClauseGroup, max_citations: usize) -> Vec<Citation> {
    let mut citations: Vec<Citation> = Vec::new();
    for argument in group.arguments.iter().filter(|a| a.stance == Stance::Objection) {
        for citation_id in &argument.citations {
            if let Some(citation) = reference_library().iter().find(|c| &c.id == citation_id) {
                push_distinct(&mut citations, citation.clone(), max_citations);
            }
        }
        for citation in find_citations(argument) {
            push_distinct(&mut citations, citation, max_citations);
        }
        if citations.len() == max_citations {
            break;
        }
    }
    citations
}

fn push_distinct(citations: &mut Vec<Citation>, citation: Citation, max_citations: usize) {
    if citations.len() < max_citations && !citations.iter().any(|c| c.id == citation.id) {
        citations.push(citation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edict_core::Argument;

    fn make_argument(stance: Stance, themes: &[&str], citations: &[&str]) -> Argument {
        Argument {
            id: Uuid::new_v4().to_string(),
            comment_id: Uuid::new_v4().to_string(),
            text: "text".into(),
            stance,
            themes: themes.iter().map(|t| t.to_string()).collect(),
            clause: "Section 7(a)".into(),
            confidence: 0.8,
            citations: citations.iter().map(|c| c.to_string()).collect(),
            related_arguments: vec![],
        }
    }

    fn make_group(arguments: Vec<Argument>) -> ClauseGroup {
        ClauseGroup {
            clause: "Section 7(a)".into(),
            arguments,
        }
    }

    #[test]
    fn objections_dominating_produce_objection_response() {
        let group = make_group(vec![
            make_argument(Stance::Objection, &["privacy"], &[]),
            make_argument(Stance::Objection, &["privacy", "legal"], &[]),
            make_argument(Stance::Support, &["economic"], &[]),
        ]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.kind, SuggestionKind::ObjectionResponse);
        assert_eq!(s.confidence, 0.9);
        assert_eq!(s.summary, "Address concerns regarding privacy, legal");
        assert!(s.suggested_change.starts_with("Revise clause Section 7(a)"));
    }

    #[test]
    fn support_dominating_produces_acknowledgment() {
        let group = make_group(vec![
            make_argument(Stance::Support, &["general"], &[]),
            make_argument(Stance::Support, &["general"], &[]),
            make_argument(Stance::Objection, &["privacy"], &[]),
        ]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        let s = &suggestions[0];
        assert_eq!(s.kind, SuggestionKind::SupportAcknowledgment);
        assert_eq!(s.confidence, 0.8);
        assert_eq!(s.suggested_change, "Retain this clause as currently worded");
        assert!(s.citations.is_empty());
    }

    #[test]
    fn tie_produces_balanced_review() {
        let group = make_group(vec![
            make_argument(Stance::Support, &["general"], &[]),
            make_argument(Stance::Objection, &["privacy"], &[]),
        ]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        let s = &suggestions[0];
        assert_eq!(s.kind, SuggestionKind::BalancedReview);
        assert_eq!(s.confidence, 0.7);
    }

    #[test]
    fn all_neutral_group_gets_balanced_review() {
        let group = make_group(vec![make_argument(Stance::Neutral, &["general"], &[])]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        assert_eq!(suggestions[0].kind, SuggestionKind::BalancedReview);
    }

    #[test]
    fn themes_rank_by_frequency_with_first_seen_tiebreak() {
        let group = make_group(vec![
            make_argument(Stance::Objection, &["legal", "privacy"], &[]),
            make_argument(Stance::Objection, &["privacy"], &[]),
            make_argument(Stance::Objection, &["economic"], &[]),
            make_argument(Stance::Objection, &["technical"], &[]),
        ]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        // privacy (2) first, then legal/economic tie broken by encounter order
        assert_eq!(
            suggestions[0].summary,
            "Address concerns regarding privacy, legal, economic"
        );
    }

    #[test]
    fn support_themes_do_not_leak_into_objection_response() {
        let group = make_group(vec![
            make_argument(Stance::Support, &["economic"], &[]),
            make_argument(Stance::Objection, &["privacy"], &[]),
            make_argument(Stance::Objection, &["privacy"], &[]),
        ]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        assert_eq!(suggestions[0].summary, "Address concerns regarding privacy");
    }

    #[test]
    fn citations_deduplicate_cap_and_skip_unknown_ids() {
        let group = make_group(vec![
            make_argument(Stance::Objection, &["privacy"], &["cit_001", "cit_999"]),
            make_argument(Stance::Objection, &["privacy"], &["cit_001", "cit_002"]),
            make_argument(Stance::Objection, &["privacy"], &["cit_003", "cit_004"]),
        ]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        let ids: Vec<&str> = suggestions[0]
            .citations
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["cit_001", "cit_002", "cit_003"]);
    }

    #[test]
    fn mixed_comments_on_one_clause_yield_balanced_review() {
        use chrono::Utc;
        use edict_core::Comment;

        let comment = |id: &str, text: &str| Comment {
            id: id.into(),
            text: text.into(),
            source: "portal".into(),
            timestamp: Utc::now(),
            policy_clause: "Section 7(a)".into(),
            metadata: None,
        };
        let comments = vec![
            comment("c1", "I support this good benefit"),
            comment("c2", "I am against this, serious problem"),
        ];

        let arguments = edict_mining::extract_arguments(&comments);
        let groups = edict_fusion::aggregate_by_clause(&arguments);
        let suggestions = suggest_amendments(&groups, &AmendmentConfig::default());

        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.clause, "Section 7(a)");
        assert_eq!(s.kind, SuggestionKind::BalancedReview);
        assert_eq!(s.confidence, 0.7);
        assert!(s.citations.is_empty());
    }

    #[test]
    fn unattached_objections_still_pick_up_library_matches() {
        let mut argument = make_argument(Stance::Objection, &["privacy"], &[]);
        argument.text = "privacy is a fundamental right under the constitution".into();
        let group = make_group(vec![argument]);
        let suggestions = suggest_amendments(&[group], &AmendmentConfig::default());
        let ids: Vec<&str> = suggestions[0]
            .citations
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["cit_001"]);
    }

    #[test]
    fn one_suggestion_per_group_in_order() {
        let first = ClauseGroup {
            clause: "Section 1".into(),
            arguments: vec![make_argument(Stance::Support, &["general"], &[])],
        };
        let second = ClauseGroup {
            clause: "Section 2".into(),
            arguments: vec![make_argument(Stance::Objection, &["legal"], &[])],
        };
        let suggestions = suggest_amendments(&[first, second], &AmendmentConfig::default());
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].clause, "Section 1");
        assert_eq!(suggestions[1].clause, "Section 2");
        assert_ne!(suggestions[0].id, suggestions[1].id);
    }
}
