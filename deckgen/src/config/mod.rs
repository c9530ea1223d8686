//! Configuration management for deckgen.
//!
//! Settings are resolved from:
//! 1. an explicit file (`--config` or `DECKGEN_CONFIG`), which must exist
//! 2. otherwise `~/.deckgen/config.toml`, when present
//! 3. otherwise built-in defaults
//!
//! API keys are never read from the file, see [`Credentials`].

mod credentials;
mod schema;

pub use credentials::{Credentials, GOOGLE_API_KEY, TAVILY_API_KEY, UNSPLASH_API_KEY};
pub use schema::{
    ConfigIssue, DeckgenConfig, GenerationConfig, ImageSource, ImagesConfig, IssueLevel,
    LimitsConfig, ServerConfig,
};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// A provider key is not set.
    #[error("missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),
    /// Invalid value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".deckgen")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration, preferring `explicit` over the default location.
///
/// # Errors
///
/// Fails if an explicit file cannot be read, if any file fails to parse, or
/// if validation reports errors.
pub async fn load_config(explicit: Option<&Path>) -> ConfigResult<DeckgenConfig> {
    let config = match explicit {
        Some(path) => read_config(path).await?,
        None => load_config_from(&config_path()).await?,
    };
    check(&config)?;
    Ok(config)
}

/// Load configuration from `path`, falling back to defaults if it is absent.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub async fn load_config_from(path: &Path) -> ConfigResult<DeckgenConfig> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(DeckgenConfig::default());
    }
    read_config(path).await
}

async fn read_config(path: &Path) -> ConfigResult<DeckgenConfig> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: DeckgenConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Log warnings and fail on errors.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] listing every error-level issue.
pub fn check(config: &DeckgenConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();
    for issue in config.validate() {
        match issue.level {
            IssueLevel::Warning => warn!(path = %issue.path, "{}", issue.message),
            IssueLevel::Error => errors.push(issue.to_string()),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(errors.join("; ")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let cfg_dir = default_config_dir();
        assert!(cfg_dir.ends_with(".deckgen"));

        let cfg_path = config_path();
        assert!(cfg_path.ends_with("config.toml"));
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("deckgen-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_default_file_gives_defaults() {
        let path = std::env::temp_dir().join("deckgen-does-not-exist.toml");
        let config = load_config_from(&path).await.unwrap();
        assert_eq!(config.server.base_path, "/api");
    }

    #[tokio::test]
    async fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("deckgen-explicit-missing.toml");
        let err = load_config(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[tokio::test]
    async fn explicit_file_is_loaded_and_checked() {
        let ok = temp_file("ok.toml", "[images]\nsource = \"none\"\n");
        let config = load_config(Some(&ok)).await.unwrap();
        assert_eq!(config.images.source, ImageSource::None);

        let bad = temp_file("bad.toml", "[generation]\nmax_steps = 0\n");
        let err = load_config(Some(&bad)).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref m) if m.contains("max_steps")));

        let garbage = temp_file("garbage.toml", "[server\n");
        let err = load_config(Some(&garbage)).await.unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));

        for path in [ok, bad, garbage] {
            let _ = std::fs::remove_file(path);
        }
    }
}
