//! API keys for the configured providers.

use super::{ConfigError, ConfigResult, DeckgenConfig};

/// Environment variable holding the Google AI Studio key.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable holding the Tavily key.
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";
/// Environment variable holding the Unsplash access key.
pub const UNSPLASH_API_KEY: &str = "UNSPLASH_API_KEY";

/// Provider secrets, read from the environment only.
#[derive(Clone, Default)]
pub struct Credentials {
    google: Option<String>,
    tavily: Option<String>,
    unsplash: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("google", &mark(&self.google))
            .field("tavily", &mark(&self.tavily))
            .field("unsplash", &mark(&self.unsplash))
            .finish()
    }
}

impl Credentials {
    /// Read every known key through `lookup` and check that the keys the
    /// configuration needs are present.
    ///
    /// Blank values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] naming the first absent key.
    pub fn resolve(
        config: &DeckgenConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let credentials = Self {
            google: read(GOOGLE_API_KEY),
            tavily: read(TAVILY_API_KEY),
            unsplash: read(UNSPLASH_API_KEY),
        };

        for key in config.required_credentials() {
            credentials.require(key)?;
        }
        Ok(credentials)
    }

    /// Resolve from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Credentials::resolve`].
    pub fn from_env(config: &DeckgenConfig) -> ConfigResult<Self> {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    /// Build credentials directly, mainly for tests and embedding.
    #[must_use]
    pub fn new(
        google: Option<String>,
        tavily: Option<String>,
        unsplash: Option<String>,
    ) -> Self {
        Self {
            google,
            tavily,
            unsplash,
        }
    }

    /// The value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] if the key is unset or unknown.
    pub fn require(&self, key: &'static str) -> ConfigResult<&str> {
        let value = match key {
            GOOGLE_API_KEY => &self.google,
            TAVILY_API_KEY => &self.tavily,
            UNSPLASH_API_KEY => &self.unsplash,
            _ => &None,
        };
        value.as_deref().ok_or(ConfigError::MissingCredential(key))
    }
}
