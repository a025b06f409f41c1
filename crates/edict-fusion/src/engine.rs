//! Cross-source fusion of extracted arguments.
//!
//! Groups arguments by clause, weights repeated argument texts by source
//! diversity, cross-validates them, and flags potential echo chambers.
//! All operations accept empty input and return empty results; none of
//! them fail.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use edict_core::Argument;

/// Distinct-source count above which an argument text is flagged as a
/// potential echo chamber.
pub const DEFAULT_ECHO_THRESHOLD: usize = 10;

/// Arguments grouped under one clause.
///
/// # Examples
///
/// ```
/// use edict_fusion::engine::ClauseGroup;
///
/// let group = ClauseGroup {
///     clause: "Section 7(a)".into(),
///     arguments: vec![],
/// };
/// assert!(group.arguments.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseGroup {
    /// The clause all grouped arguments attach to.
    pub clause: String,
    /// Arguments in insertion order.
    pub arguments: Vec<Argument>,
}

/// Group arguments by clause.
///
/// Clauses appear in first-seen order; arguments within a group keep their
/// input order.
///
/// # Examples
///
/// ```
/// use edict_fusion::engine::aggregate_by_clause;
///
/// let groups = aggregate_by_clause(&[]);
/// assert!(groups.is_empty());
/// ```
pub fn aggregate_by_clause(arguments: &[Argument]) -> Vec<ClauseGroup> {
    let mut groups: Vec<ClauseGroup> = Vec::new();

    for argument in arguments {
        match groups.iter_mut().find(|g| g.clause == argument.clause) {
            Some(group) => group.arguments.push(argument.clone()),
            None => groups.push(ClauseGroup {
                clause: argument.clause.clone(),
                arguments: vec![argument.clone()],
            }),
        }
    }

    groups
}

/// Compute a weight per argument id from confidence and source diversity.
///
/// Arguments sharing the exact same text are treated as one argument
/// repeated across sources. Each text group gets
/// `mean(confidence) * (1 + 0.1 * distinct_comment_ids)`, and every
/// member of the group receives that identical weight.
///
/// # Examples
///
/// ```
/// use edict_fusion::engine::argument_weights;
///
/// let weights = argument_weights(&[]);
/// assert!(weights.is_empty());
/// ```
pub fn argument_weights(arguments: &[Argument]) -> HashMap<String, f64> {
    let mut weights = HashMap::new();

    for group in group_by_text(arguments) {
        let total: f64 = group.iter().map(|a| a.confidence).sum();
        let mean_confidence = total / group.len() as f64;

        let distinct_sources: HashSet<&str> =
            group.iter().map(|a| a.comment_id.as_str()).collect();
        let weight = mean_confidence * (1.0 + 0.1 * distinct_sources.len() as f64);

        for argument in group {
            weights.insert(argument.id.clone(), weight);
        }
    }

    weights
}

/// Cross-validate arguments across sources.
///
/// An argument is validated when its exact text appears in more than one
/// argument, i.e. the same point was raised by more than one comment.
///
/// # Examples
///
/// ```
/// use edict_fusion::engine::cross_validate;
///
/// let validation = cross_validate(&[]);
/// assert!(validation.is_empty());
/// ```
pub fn cross_validate(arguments: &[Argument]) -> HashMap<String, bool> {
    let mut validation = HashMap::new();

    for group in group_by_text(arguments) {
        let validated = group.len() > 1;
        for argument in group {
            validation.insert(argument.id.clone(), validated);
        }
    }

    validation
}

/// Flag arguments whose text is repeated by too many distinct sources.
///
/// When more than `threshold` distinct comment ids produce the same text,
/// every argument with that text is returned as a potential echo chamber.
///
/// # Examples
///
/// ```
/// use edict_fusion::engine::{detect_echo_chambers, DEFAULT_ECHO_THRESHOLD};
///
/// let flagged = detect_echo_chambers(&[], DEFAULT_ECHO_THRESHOLD);
/// assert!(flagged.is_empty());
/// ```
pub fn detect_echo_chambers(arguments: &[Argument], threshold: usize) -> Vec<String> {
    let mut flagged = Vec::new();

    for group in group_by_text(arguments) {
        let distinct_sources: HashSet<&str> =
            group.iter().map(|a| a.comment_id.as_str()).collect();
        if distinct_sources.len() > threshold {
            for argument in group {
                flagged.push(argument.id.clone());
            }
        }
    }

    flagged
}

/// Group arguments by exact text equality, first-seen order.
fn group_by_text(arguments: &[Argument]) -> Vec<Vec<&Argument>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Argument>> = HashMap::new();

    for argument in arguments {
        let entry = groups.entry(argument.text.as_str()).or_default();
        if entry.is_empty() {
            order.push(argument.text.as_str());
        }
        entry.push(argument);
    }

    order
        .into_iter()
        .map(|text| groups.remove(text).unwrap_or_default())
        .collect()
}
