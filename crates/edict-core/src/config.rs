use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EdictError;

/// Top-level configuration loaded from `.edict.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use edict_core::EdictConfig;
///
/// let config = EdictConfig::default();
/// assert_eq!(config.fusion.echo_threshold, 10);
/// assert_eq!(config.amendment.max_citations, 3);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdictConfig {
    /// LLM provider settings for the extraction path.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Argument extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Fusion engine settings.
    #[serde(default)]
    pub fusion: FusionConfig,
    /// Amendment generator settings.
    #[serde(default)]
    pub amendment: AmendmentConfig,
}

impl EdictConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EdictError::Io`] if the file cannot be read, or
    /// [`EdictError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use edict_core::EdictConfig;
    /// use std::path::Path;
    ///
    /// let config = EdictConfig::from_file(Path::new(".edict.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, EdictError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`EdictError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use edict_core::EdictConfig;
    ///
    /// let toml = r#"
    /// [fusion]
    /// echo_threshold = 5
    /// "#;
    /// let config = EdictConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.fusion.echo_threshold, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, EdictError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// LLM provider configuration.
///
/// Any OpenAI-compatible chat completions endpoint works.
///
/// # Examples
///
/// ```
/// use edict_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"openai"`, `"gemini"`, `"ollama"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Argument extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Use the LLM extraction path with per-comment heuristic fallback
    /// (default: false, heuristic only).
    #[serde(default)]
    pub use_llm: bool,
}

/// Fusion engine configuration.
///
/// # Examples
///
/// ```
/// use edict_core::FusionConfig;
///
/// let config = FusionConfig::default();
/// assert_eq!(config.echo_threshold, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Distinct-source count above which an argument text is flagged as a
    /// potential echo chamber (default: 10).
    #[serde(default = "default_echo_threshold")]
    pub echo_threshold: usize,
}

fn default_echo_threshold() -> usize {
    10
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            echo_threshold: default_echo_threshold(),
        }
    }
}

/// Amendment generator configuration.
///
/// # Examples
///
/// ```
/// use edict_core::AmendmentConfig;
///
/// let config = AmendmentConfig::default();
/// assert_eq!(config.max_citations, 3);
/// assert_eq!(config.max_themes, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendmentConfig {
    /// Maximum citations attached to an objection response (default: 3).
    #[serde(default = "default_max_citations")]
    pub max_citations: usize,
    /// Maximum themes named in an objection response (default: 3).
    #[serde(default = "default_max_themes")]
    pub max_themes: usize,
}

fn default_max_citations() -> usize {
    3
}

fn default_max_themes() -> usize {
    3
}

impl Default for AmendmentConfig {
    fn default() -> Self {
        Self {
            max_citations: default_max_citations(),
            max_themes: default_max_themes(),
        }
    }
}
