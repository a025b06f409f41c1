/// Errors that can occur across the Edict platform.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; implementing [`miette::Diagnostic`] lets the binary propagate it
/// with `?` into `miette::Result`.
///
/// # Examples
///
/// ```
/// use edict_core::EdictError;
///
/// let err = EdictError::MissingInput("no comments uploaded".into());
/// assert!(err.to_string().contains("no comments uploaded"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum EdictError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Comment or policy ingestion failure.
    #[error("ingestion error: {0}")]
    Ingest(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Required input was not supplied before analysis.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// A clause id was not found among the extracted arguments.
    #[error("clause not found: {0}")]
    ClauseNotFound(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
