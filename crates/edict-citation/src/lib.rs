//! Citation oracle: static legal/academic reference data and relevance
//! matching for extracted arguments.

pub mod oracle;

pub use oracle::{find_citations, reference_library, validate_citation};
