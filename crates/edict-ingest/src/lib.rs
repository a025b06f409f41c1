//! Comment and policy ingestion: CSV/JSON file parsers and the pluggable
//! ingestor registry that supplies uniform [`edict_core::Comment`] records
//! to the analysis pipeline.

pub mod parser;
pub mod registry;

pub use parser::{parse_csv_comments, parse_json_comments, parse_policy_document};
pub use registry::{FileIngestor, Ingestor, IngestorRegistry};
