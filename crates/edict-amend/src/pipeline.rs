//! End-to-end analysis: extraction, citation attachment, fusion, and
//! amendment generation over one session store.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use edict_citation::{find_citations, validate_citation};
use edict_compute::{assess_requirements, route, ComputeRequirements, ComputeTarget, SystemLoad};
use edict_core::{
    AmendmentSuggestion, Argument, EdictConfig, EdictError, SessionStore, Stance,
};
use edict_fusion::{aggregate_by_clause, argument_weights, detect_echo_chambers, ClauseGroup};
use edict_mining::{extract_arguments, LlmExtractor};

use crate::generator::suggest_amendments;

/// Drives a full analysis run over a [`SessionStore`].
///
/// # Examples
///
/// ```
/// use edict_amend::pipeline::AnalysisPipeline;
/// use edict_core::EdictConfig;
///
/// let pipeline = AnalysisPipeline::new(EdictConfig::default());
/// ```
pub struct AnalysisPipeline {
    config: EdictConfig,
}

impl AnalysisPipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: EdictConfig) -> Self {
        Self { config }
    }

    /// Run the full analysis over the store's comments and policy.
    ///
    /// Replaces the store's arguments with freshly extracted ones, attaches
    /// citations, and returns the aggregated result. The compute assessment
    /// is advisory and never blocks the run.
    ///
    /// # Errors
    ///
    /// Returns [`EdictError::MissingInput`] when no comments have been
    /// ingested or no policy document has been loaded, and
    /// [`EdictError::Llm`] when the LLM path is enabled but the HTTP client
    /// cannot be built.
    pub async fn run(&self, store: &mut SessionStore) -> Result<AnalysisResult, EdictError> {
        if !store.has_comments() {
            return Err(EdictError::MissingInput(
                "no comments ingested; provide a comment file first".into(),
            ));
        }
        if !store.has_policy() {
            return Err(EdictError::MissingInput(
                "no policy document loaded; provide a policy file first".into(),
            ));
        }

        let requirements = assess_requirements(store.comments().len());
        let target = route(&requirements, &SystemLoad::sample());

        let arguments = if self.config.extraction.use_llm {
            let extractor = LlmExtractor::new(&self.config.llm)?;
            extractor.extract_arguments(store.comments()).await
        } else {
            extract_arguments(store.comments())
        };
        store.replace_arguments(arguments);

        self.attach_citations(store);

        let arguments = store.arguments();
        let weights = argument_weights(arguments);
        let echo_chambers =
            detect_echo_chambers(arguments, self.config.fusion.echo_threshold);
        let groups = aggregate_by_clause(arguments);
        let suggestions = suggest_amendments(&groups, &self.config.amendment);

        Ok(AnalysisResult {
            num_comments: store.comments().len(),
            num_arguments: arguments.len(),
            compute: ComputePlan {
                requirements,
                target,
            },
            clauses: groups.iter().map(summarize_group).collect(),
            suggestions,
            echo_chambers,
            weights,
        })
    }

    /// Analyze a single clause from the store's most recent run.
    ///
    /// # Errors
    ///
    /// Returns [`EdictError::ClauseNotFound`] when no argument attaches to
    /// `clause_id`.
    pub fn clause_analysis(
        &self,
        store: &SessionStore,
        clause_id: &str,
    ) -> Result<ClauseAnalysis, EdictError> {
        let arguments: Vec<Argument> = store
            .arguments()
            .iter()
            .filter(|a| a.clause == clause_id)
            .cloned()
            .collect();

        if arguments.is_empty() {
            return Err(EdictError::ClauseNotFound(clause_id.into()));
        }

        let group = ClauseGroup {
            clause: clause_id.into(),
            arguments,
        };
        let suggestion = suggest_amendments(std::slice::from_ref(&group), &self.config.amendment)
            .into_iter()
            .next();

        let summary = summarize_group(&group);
        Ok(ClauseAnalysis {
            summary,
            arguments: group.arguments,
            suggestion,
        })
    }

    /// Validate existing citation ids and attach oracle matches.
    ///
    /// LLM-supplied ids that fail validation are dropped with a warning;
    /// oracle matches are appended without duplicating ids, and the full
    /// citation records land in the store.
    fn attach_citations(&self, store: &mut SessionStore) {
        let mut matched = Vec::new();
        for argument in store.arguments_mut() {
            let before = argument.citations.len();
            argument.citations.retain(|id| validate_citation(id));
            let dropped = before - argument.citations.len();
            if dropped > 0 {
                eprintln!(
                    "warning: dropped {dropped} unknown citation id(s) from argument {}",
                    argument.id
                );
            }

            for citation in find_citations(argument) {
                if !argument.citations.contains(&citation.id) {
                    argument.citations.push(citation.id.clone());
                }
                matched.push(citation);
            }
        }
        store.add_citations(matched);
    }
}

/// Advisory compute assessment for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputePlan {
    /// Estimated resource needs.
    pub requirements: ComputeRequirements,
    /// Target picked from the estimate and current load.
    pub target: ComputeTarget,
}

/// Stance tallies and themes for one clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseSummary {
    /// Clause identifier.
    pub clause: String,
    /// Total arguments on the clause.
    pub total: usize,
    /// Arguments supporting the clause.
    pub support: usize,
    /// Arguments objecting to the clause.
    pub objection: usize,
    /// Arguments with no clear position.
    pub neutral: usize,
    /// Distinct themes raised, in first-seen order.
    pub themes: Vec<String>,
}

fn summarize_group(group: &ClauseGroup) -> ClauseSummary {
    let mut themes: Vec<String> = Vec::new();
    for argument in &group.arguments {
        for theme in &argument.themes {
            if !themes.contains(theme) {
                themes.push(theme.clone());
            }
        }
    }

    let count = |stance| {
        group
            .arguments
            .iter()
            .filter(|a| a.stance == stance)
            .count()
    };

    ClauseSummary {
        clause: group.clause.clone(),
        total: group.arguments.len(),
        support: count(Stance::Support),
        objection: count(Stance::Objection),
        neutral: count(Stance::Neutral),
        themes,
    }
}

/// Everything one analysis run produces.
///
/// Serializes to camelCase JSON; [`fmt::Display`] renders the plain-text
/// report and [`AnalysisResult::to_markdown`] the markdown one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Number of comments analyzed.
    pub num_comments: usize,
    /// Number of arguments extracted.
    pub num_arguments: usize,
    /// Advisory compute assessment.
    pub compute: ComputePlan,
    /// Per-clause stance tallies, in first-seen clause order.
    pub clauses: Vec<ClauseSummary>,
    /// One amendment suggestion per clause.
    pub suggestions: Vec<AmendmentSuggestion>,
    /// Ids of arguments flagged as potential echo chambers.
    pub echo_chambers: Vec<String>,
    /// Fusion weight per argument id.
    pub weights: HashMap<String, f64>,
}

/// Per-clause drill-down from the most recent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseAnalysis {
    /// Stance tallies and themes.
    pub summary: ClauseSummary,
    /// All arguments on the clause.
    pub arguments: Vec<Argument>,
    /// The suggestion the tallies produce, if any.
    pub suggestion: Option<AmendmentSuggestion>,
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis complete")?;
        writeln!(
            f,
            "  {} comments, {} arguments, {} clause(s)",
            self.num_comments,
            self.num_arguments,
            self.clauses.len()
        )?;
        writeln!(
            f,
            "  compute: {} ({}, {})",
            self.compute.target,
            self.compute.requirements.memory_required,
            self.compute.requirements.processing_time
        )?;

        for clause in &self.clauses {
            writeln!(f)?;
            writeln!(
                f,
                "{}: {} support / {} objection / {} neutral",
                clause.clause, clause.support, clause.objection, clause.neutral
            )?;
            writeln!(f, "  themes: {}", clause.themes.join(", "))?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Suggestions:")?;
            for suggestion in &self.suggestions {
                writeln!(
                    f,
                    "  [{}] {} ({:.0}%): {}",
                    suggestion.kind,
                    suggestion.clause,
                    suggestion.confidence * 100.0,
                    suggestion.summary
                )?;
            }
        }

        if !self.echo_chambers.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Potential echo chambers: {} argument(s) flagged",
                self.echo_chambers.len()
            )?;
        }

        Ok(())
    }
}

impl AnalysisResult {
    /// Render the result as a markdown report.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Analysis Report\n\n");
        out.push_str(&format!(
            "- Comments: {}\n- Arguments: {}\n- Compute: {} ({}, {})\n",
            self.num_comments,
            self.num_arguments,
            self.compute.target,
            self.compute.requirements.memory_required,
            self.compute.requirements.processing_time
        ));

        out.push_str("\n## Clauses\n\n");
        out.push_str("| Clause | Support | Objection | Neutral | Themes |\n");
        out.push_str("|--------|---------|-----------|---------|--------|\n");
        for clause in &self.clauses {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                clause.clause,
                clause.support,
                clause.objection,
                clause.neutral,
                clause.themes.join(", ")
            ));
        }

        if !self.suggestions.is_empty() {
            out.push_str("\n## Suggestions\n\n");
            for suggestion in &self.suggestions {
                out.push_str(&format!(
                    "### {} ({})\n\n{}\n\n**Suggested change:** {}\n\n",
                    suggestion.clause, suggestion.kind, suggestion.details,
                    suggestion.suggested_change
                ));
                for citation in &suggestion.citations {
                    out.push_str(&format!("- {} ({})\n", citation.title, citation.source));
                }
            }
        }

        if !self.echo_chambers.is_empty() {
            out.push_str("\n## Echo Chambers\n\n");
            for id in &self.echo_chambers {
                out.push_str(&format!("- {id}\n"));
            }
        }

        out
    }
}
