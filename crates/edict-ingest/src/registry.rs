//! Pluggable ingestor interface and registry.
//!
//! Ingestion collaborators supply uniform [`Comment`] records to the
//! pipeline. Implementations are registered by name at startup; there is
//! no runtime module discovery. A failing ingestor is logged and yields an
//! empty result set for that source instead of aborting the run.

use std::collections::HashMap;
use std::path::Path;

use edict_core::{Comment, EdictError};

use crate::parser::{parse_csv_comments, parse_json_comments};

/// A source-specific comment supplier.
///
/// # Examples
///
/// ```
/// use edict_ingest::registry::{FileIngestor, Ingestor};
///
/// let ingestor = FileIngestor;
/// assert!(ingestor.can_handle("csv"));
/// assert!(ingestor.can_handle("json"));
/// assert!(!ingestor.can_handle("youtube"));
/// ```
pub trait Ingestor {
    /// Registry name of this ingestor.
    fn name(&self) -> &str;

    /// Whether this ingestor handles the given source type.
    fn can_handle(&self, source_type: &str) -> bool;

    /// Ingest comments from a source (file path, URL, identifier).
    ///
    /// # Errors
    ///
    /// Returns [`EdictError::Ingest`] when the source cannot be read.
    fn ingest(&self, source: &str) -> Result<Vec<Comment>, EdictError>;
}

/// Ingestor for local CSV and JSON comment files.
pub struct FileIngestor;

impl Ingestor for FileIngestor {
    fn name(&self) -> &str {
        "file"
    }

    fn can_handle(&self, source_type: &str) -> bool {
        matches!(source_type, "csv" | "json")
    }

    fn ingest(&self, source: &str) -> Result<Vec<Comment>, EdictError> {
        let path = Path::new(source);
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => parse_csv_comments(path),
            Some("json") => parse_json_comments(path),
            other => Err(EdictError::Ingest(format!(
                "unsupported comment file type: {}",
                other.unwrap_or("none")
            ))),
        }
    }
}

/// Name-keyed registry of ingestors, populated at startup.
///
/// # Examples
///
/// ```
/// use edict_ingest::registry::IngestorRegistry;
///
/// let registry = IngestorRegistry::with_defaults();
/// assert!(registry.get("file").is_some());
/// assert!(registry.get("telegraph").is_none());
/// ```
#[derive(Default)]
pub struct IngestorRegistry {
    ingestors: HashMap<String, Box<dyn Ingestor>>,
    order: Vec<String>,
}

impl IngestorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in file ingestor registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FileIngestor));
        registry
    }

    /// Register an ingestor under its own name, replacing any previous one.
    pub fn register(&mut self, ingestor: Box<dyn Ingestor>) {
        let name = ingestor.name().to_string();
        if !self.ingestors.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.ingestors.insert(name, ingestor);
    }

    /// Look up an ingestor by registry name.
    pub fn get(&self, name: &str) -> Option<&dyn Ingestor> {
        self.ingestors.get(name).map(Box::as_ref)
    }

    /// First registered ingestor that can handle `source_type`.
    pub fn handler_for(&self, source_type: &str) -> Option<&dyn Ingestor> {
        self.order
            .iter()
            .filter_map(|name| self.ingestors.get(name))
            .find(|i| i.can_handle(source_type))
            .map(Box::as_ref)
    }

    /// Registered ingestor names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Ingest from a source, recovering from per-source failures.
    ///
    /// Unknown source types and ingestor errors are logged to stderr and
    /// produce an empty result set, so one bad source never takes down a
    /// multi-source run.
    pub fn ingest(&self, source_type: &str, source: &str) -> Vec<Comment> {
        let Some(ingestor) = self.handler_for(source_type) else {
            eprintln!("warning: no ingestor registered for source type '{source_type}'");
            return Vec::new();
        };
        match ingestor.ingest(source) {
            Ok(comments) => comments,
            Err(e) => {
                eprintln!(
                    "warning: ingestor '{}' failed for '{source}': {e}",
                    ingestor.name()
                );
                Vec::new()
            }
        }
    }
}
