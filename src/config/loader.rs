//! Configuration loading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde_saphyr::{DuplicateKeyPolicy, Options};

use crate::config::schema::{RedirectDocument, ServerSettings, VanityConfig};
use crate::config::source::ConfigSource;
use crate::config::validation::{validate_cache_max_age, validate_entry};

/// Error type for redirect document loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("vanity config source not defined")]
    MissingConfigSource,

    #[error("found empty config file")]
    EmptyConfig,

    #[error("could not parse config: {0}")]
    Parse(String),

    #[error("cache_max_age is negative: {0}")]
    NegativeCacheAge(i64),

    #[error("configuration for {path}: unknown VCS {vcs}")]
    InvalidVcs { path: String, vcs: String },

    #[error("configuration for {path}: cannot infer VCS from {repo}")]
    UnresolvableVcs { path: String, repo: String },

    #[error("configuration for {path}: missing repo")]
    MissingRepository { path: String },

    #[error("configuration for {path}: repo {repo} is not an absolute URL")]
    InvalidRepository { path: String, repo: String },

    #[error("could not read config file {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("could not fetch config file from {url}: {error}")]
    Fetch {
        url: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("could not fetch config file from {url}: status {status}")]
    FetchStatus { url: String, status: u16 },
}

/// Error type for the server settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Syntax of a redirect document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Toml,
}

/// Parse and validate a redirect document.
pub fn load(document: &[u8], format: DocumentFormat) -> Result<VanityConfig, ConfigError> {
    if document.is_empty() {
        return Err(ConfigError::EmptyConfig);
    }
    let text = std::str::from_utf8(document).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let raw: RedirectDocument = match format {
        DocumentFormat::Yaml => {
            let options = Options {
                duplicate_keys: DuplicateKeyPolicy::LastWins,
                ..Options::default()
            };
            serde_saphyr::from_str_with_options(text, options)
                .map_err(|e| ConfigError::Parse(e.to_string()))?
        }
        DocumentFormat::Toml => toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?,
    };

    let cache_max_age = validate_cache_max_age(raw.cache_max_age)?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(raw.paths.0.len());
    for (raw_path, raw_entry) in &raw.paths.0 {
        let entry = validate_entry(raw_path, raw_entry)?;
        if !seen.insert(entry.path().to_string()) {
            tracing::warn!(path = %entry.path(), "Duplicate import path, last declaration wins");
        }
        entries.push(entry);
    }

    Ok(VanityConfig {
        host: raw.host.filter(|h| !h.is_empty()),
        cache_max_age,
        entries,
    })
}

/// Fetch the redirect document from `source` and load it.
pub async fn load_from_source(source: &str, timeout: Duration) -> Result<VanityConfig, ConfigError> {
    let source = ConfigSource::classify(source)?;
    let document = source.fetch(timeout).await?;
    let config = load(&document, source.format())?;

    tracing::info!(
        source = %source,
        paths = config.entries.len(),
        cache_max_age = config.cache_max_age,
        "Redirect document loaded"
    );
    Ok(config)
}

/// Load server settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<ServerSettings, SettingsError> {
    let content = fs::read_to_string(path)?;
    let settings: ServerSettings = toml::from_str(&content)?;
    Ok(settings)
}
