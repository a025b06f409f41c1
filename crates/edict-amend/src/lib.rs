//! Amendment generation and the end-to-end analysis pipeline: stance
//! tallies per clause, templated amendment suggestions, and the run
//! orchestration that ties extraction, citations, fusion, and compute
//! sizing together.

pub mod generator;
pub mod pipeline;

pub use generator::suggest_amendments;
pub use pipeline::{
    AnalysisPipeline, AnalysisResult, ClauseAnalysis, ClauseSummary, ComputePlan,
};
