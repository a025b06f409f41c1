//! Core types, configuration, and error handling for the Edict platform.
//!
//! This crate provides the shared foundation used by all other Edict crates:
//! - [`EdictError`] — unified error type using `thiserror`
//! - [`EdictConfig`] — configuration loaded from `.edict.toml`
//! - [`SessionStore`] — owned per-run store for comments, arguments,
//!   policies, and citations
//! - Shared types: [`Comment`], [`Argument`], [`Stance`], [`Citation`],
//!   [`AmendmentSuggestion`], [`PolicyDocument`], [`OutputFormat`]

mod config;
mod error;
mod store;
mod types;

pub use config::{AmendmentConfig, EdictConfig, ExtractionConfig, FusionConfig, LlmConfig};
pub use error::EdictError;
pub use store::SessionStore;
pub use types::{
    AmendmentSuggestion, Argument, Citation, CitationKind, Comment, OutputFormat, PolicyClause,
    PolicyDocument, Stance, SuggestionKind,
};

/// A convenience `Result` type for Edict operations.
pub type Result<T> = std::result::Result<T, EdictError>;
