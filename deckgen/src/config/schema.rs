//! Configuration schema definitions.
//!
//! Every section is optional in the file; missing keys take the defaults
//! below. Secrets never live here, see [`Credentials`](super::Credentials).

use std::net::SocketAddr;

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckgenConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Content generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Image source settings.
    #[serde(default)]
    pub images: ImagesConfig,
    /// Request limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path prefix for every route.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Presentation requests allowed per caller per minute (0 disables).
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
    /// Header set by the fronting proxy with the real client address.
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: String,
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_owned()
}

fn default_base_path() -> String {
    "/api".to_owned()
}

const fn default_rate_limit() -> u32 {
    4
}

fn default_client_ip_header() -> String {
    "x-real-ip".to_owned()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_path: default_base_path(),
            rate_limit_per_minute: default_rate_limit(),
            client_ip_header: default_client_ip_header(),
        }
    }
}

/// Content generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// OpenAI-compatible API base URL.
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    /// Chat model.
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Deadline for one complete generation run.
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    /// Maximum model turns per run.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Give the agent a web search tool.
    #[serde(default = "default_true")]
    pub web_search: bool,
    /// Results returned per web search.
    #[serde(default = "default_search_max_results")]
    pub search_max_results: usize,
    /// Tavily API base URL.
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,
}

fn default_generation_base_url() -> String {
    crate::llms::OpenAIConfig::DEFAULT_BASE_URL.to_owned()
}

fn default_generation_model() -> String {
    crate::llms::OpenAIConfig::DEFAULT_MODEL.to_owned()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_generation_timeout() -> u64 {
    120
}

const fn default_max_steps() -> usize {
    crate::agent::Agent::DEFAULT_MAX_STEPS
}

const fn default_true() -> bool {
    true
}

const fn default_search_max_results() -> usize {
    10
}

fn default_search_base_url() -> String {
    crate::tavily::DEFAULT_BASE_URL.to_owned()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_base_url(),
            model: default_generation_model(),
            temperature: default_temperature(),
            timeout_secs: default_generation_timeout(),
            max_steps: default_max_steps(),
            web_search: true,
            search_max_results: default_search_max_results(),
            search_base_url: default_search_base_url(),
        }
    }
}

/// Where slide illustrations come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Image results of a Tavily web search.
    WebSearch,
    /// Unsplash photo search.
    #[default]
    Unsplash,
    /// Gemini image generation.
    Generate,
    /// No images; every hint resolves to `null`.
    None,
}

impl ImageSource {
    /// Config file spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::Unsplash => "unsplash",
            Self::Generate => "generate",
            Self::None => "none",
        }
    }

    /// Whether hints are fed to an image model rather than a search index.
    #[must_use]
    pub const fn is_generative(&self) -> bool {
        matches!(self, Self::Generate)
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagesConfig {
    /// Provider used to resolve hints.
    #[serde(default)]
    pub source: ImageSource,
    /// Deadline for one lookup.
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
    /// Lookups in flight per request.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Model used when `source = "generate"`.
    #[serde(default = "default_image_model")]
    pub generate_model: String,
    /// Base URL override for the selected provider.
    #[serde(default)]
    pub base_url: Option<String>,
}

const fn default_image_timeout() -> u64 {
    30
}

const fn default_concurrency() -> usize {
    4
}

fn default_image_model() -> String {
    crate::images::GeminiImages::DEFAULT_MODEL.to_owned()
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            source: ImageSource::default(),
            timeout_secs: default_image_timeout(),
            concurrency: default_concurrency(),
            generate_model: default_image_model(),
            base_url: None,
        }
    }
}

/// Bounds applied to incoming requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest accepted `number_of_slides`.
    #[serde(default = "default_max_slides")]
    pub max_slides: u32,
    /// Largest accepted `number_of_bullet_points`.
    #[serde(default = "default_max_bullet_points")]
    pub max_bullet_points: u32,
}

const fn default_max_slides() -> u32 {
    20
}

const fn default_max_bullet_points() -> u32 {
    5
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_slides: default_max_slides(),
            max_bullet_points: default_max_bullet_points(),
        }
    }
}

impl DeckgenConfig {
    /// Validate the configuration and return any issues found.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.server.bind.parse::<SocketAddr>().is_err() {
            issues.push(ConfigIssue::error(
                "server.bind",
                format!("`{}` is not a socket address", self.server.bind),
            ));
        }

        let base = &self.server.base_path;
        if !base.starts_with('/') || (base.len() > 1 && base.ends_with('/')) {
            issues.push(ConfigIssue::error(
                "server.base_path",
                "Base path must start with '/' and must not end with '/'",
            ));
        }

        if HeaderName::from_bytes(self.server.client_ip_header.as_bytes()).is_err() {
            issues.push(ConfigIssue::error(
                "server.client_ip_header",
                "Not a valid HTTP header name",
            ));
        }

        if self.server.rate_limit_per_minute == 0 {
            issues.push(ConfigIssue::warning(
                "server.rate_limit_per_minute",
                "Rate limiting is disabled",
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            issues.push(ConfigIssue::error(
                "generation.temperature",
                "Temperature must be between 0 and 2",
            ));
        }

        if self.generation.max_steps == 0 {
            issues.push(ConfigIssue::error(
                "generation.max_steps",
                "Max steps must be at least 1",
            ));
        }

        if self.generation.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                "generation.timeout_secs",
                "Generation timeout must be at least 1 second",
            ));
        }

        if self.images.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                "images.timeout_secs",
                "Image timeout must be at least 1 second",
            ));
        }

        if self.images.concurrency == 0 {
            issues.push(ConfigIssue::error(
                "images.concurrency",
                "Concurrency must be at least 1",
            ));
        }

        if self.limits.max_slides == 0 || self.limits.max_bullet_points == 0 {
            issues.push(ConfigIssue::error(
                "limits",
                "Slide and bullet point limits must be at least 1",
            ));
        }

        issues
    }

    /// Check if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|issue| issue.level != IssueLevel::Error)
    }

    /// Environment variables holding the keys the configured providers need.
    #[must_use]
    pub fn required_credentials(&self) -> Vec<&'static str> {
        use super::credentials::{GOOGLE_API_KEY, TAVILY_API_KEY, UNSPLASH_API_KEY};

        let mut keys = vec![GOOGLE_API_KEY];
        if self.generation.web_search || self.images.source == ImageSource::WebSearch {
            keys.push(TAVILY_API_KEY);
        }
        if self.images.source == ImageSource::Unsplash {
            keys.push(UNSPLASH_API_KEY);
        }
        keys
    }
}

/// Configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    /// Issue severity level.
    pub level: IssueLevel,
    /// Configuration path (e.g., "server.bind").
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            IssueLevel::Error => "ERROR",
            IssueLevel::Warning => "WARN",
        };
        write!(f, "[{}] {}: {}", prefix, self.path, self.message)
    }
}

/// Severity level for configuration issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Error that prevents the server from starting.
    Error,
    /// Warning about potential issues.
    Warning,
}
