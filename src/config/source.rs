//! Where the redirect document comes from.
//!
//! A source string that looks like an HTTP(S) endpoint is fetched remotely;
//! anything else is read from the local filesystem.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::StatusCode;

use crate::config::loader::{ConfigError, DocumentFormat};

static HTTP_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[A-Za-z\-.=?/0-9]+$").expect("endpoint pattern is valid")
});

/// Location of the redirect document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Remote(String),
    Local(PathBuf),
}

impl ConfigSource {
    /// Decide how `source` should be read.
    pub fn classify(source: &str) -> Result<Self, ConfigError> {
        if source.is_empty() {
            return Err(ConfigError::MissingConfigSource);
        }
        if HTTP_ENDPOINT.is_match(source) {
            Ok(ConfigSource::Remote(source.to_string()))
        } else {
            Ok(ConfigSource::Local(PathBuf::from(source)))
        }
    }

    /// TOML for `.toml` sources, YAML for everything else.
    pub fn format(&self) -> DocumentFormat {
        let is_toml = match self {
            ConfigSource::Remote(url) => url.ends_with(".toml"),
            ConfigSource::Local(path) => path.extension().is_some_and(|ext| ext == "toml"),
        };
        if is_toml {
            DocumentFormat::Toml
        } else {
            DocumentFormat::Yaml
        }
    }

    /// Read the raw document bytes.
    pub async fn fetch(&self, timeout: Duration) -> Result<Vec<u8>, ConfigError> {
        match self {
            ConfigSource::Remote(url) => {
                let fetch_error = |error| ConfigError::Fetch {
                    url: url.clone(),
                    error,
                };
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(fetch_error)?;

                tracing::debug!(url = %url, timeout = ?timeout, "Fetching redirect document");
                let response = client.get(url).send().await.map_err(fetch_error)?;
                if response.status() != StatusCode::OK {
                    return Err(ConfigError::FetchStatus {
                        url: url.clone(),
                        status: response.status().as_u16(),
                    });
                }
                let body = response.bytes().await.map_err(fetch_error)?;
                Ok(body.to_vec())
            }
            ConfigSource::Local(path) => {
                tracing::debug!(path = %path.display(), "Reading redirect document");
                tokio::fs::read(path).await.map_err(|error| ConfigError::Io {
                    source_name: path.display().to_string(),
                    error,
                })
            }
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Remote(url) => f.write_str(url),
            ConfigSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert!(matches!(
            ConfigSource::classify(""),
            Err(ConfigError::MissingConfigSource)
        ));
        assert_eq!(
            ConfigSource::classify("https://example.com/vanity.yml").unwrap(),
            ConfigSource::Remote("https://example.com/vanity.yml".to_string())
        );
        assert_eq!(
            ConfigSource::classify("http://config.local/get?name=vanity").unwrap(),
            ConfigSource::Remote("http://config.local/get?name=vanity".to_string())
        );
        // Characters outside the endpoint pattern fall back to a local path.
        assert_eq!(
            ConfigSource::classify("https://example.com/my_vanity.yml").unwrap(),
            ConfigSource::Local(PathBuf::from("https://example.com/my_vanity.yml"))
        );
        assert_eq!(
            ConfigSource::classify("./test.yml").unwrap(),
            ConfigSource::Local(PathBuf::from("./test.yml"))
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(
            ConfigSource::classify("./vanity.toml").unwrap().format(),
            DocumentFormat::Toml
        );
        assert_eq!(
            ConfigSource::classify("https://example.com/vanity.toml").unwrap().format(),
            DocumentFormat::Toml
        );
        assert_eq!(
            ConfigSource::classify("./vanity.yml").unwrap().format(),
            DocumentFormat::Yaml
        );
    }

    #[tokio::test]
    async fn test_fetch_local() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vanity.yml");
        std::fs::write(&path, "paths: {}\n").unwrap();

        let source = ConfigSource::Local(path);
        let bytes = source.fetch(Duration::from_secs(1)).await.unwrap();
        assert_eq!(bytes, b"paths: {}\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let source = ConfigSource::Local(PathBuf::from("/nonexistent/vanity.yml"));
        let err = source.fetch(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
