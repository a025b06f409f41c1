//! Fusion engine: cross-source aggregation, weighting, validation, and
//! echo-chamber detection for extracted arguments.

pub mod engine;

pub use engine::{
    aggregate_by_clause, argument_weights, cross_validate, detect_echo_chambers, ClauseGroup,
    DEFAULT_ECHO_THRESHOLD,
};
