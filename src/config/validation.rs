//! Redirect document validation.
//!
//! # Responsibilities
//! - Normalize import path keys (single trailing slash removed)
//! - Infer the display template from well-known hosts
//! - Infer or check the VCS kind
//! - Check the repository is an absolute URL
//! - Fall back to a default listener address when the configured one is bogus
//!
//! # Design Decisions
//! - Pure functions: raw entry in, `PathEntry` or `ConfigError` out
//! - The first invalid entry aborts the whole load

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::{RawPathConfig, DEFAULT_CACHE_MAX_AGE};
use crate::routing::{PathEntry, VcsKind};

/// Listener address used when the configured one is empty or invalid.
pub const FALLBACK_BIND_ADDRESS: &str = "0.0.0.0:8080";

static BIND_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z\-.0-9]+)(:[0-9]+)?$").expect("address pattern is valid"));

const GITHUB_PREFIX: &str = "https://github.com/";
const BITBUCKET_PREFIX: &str = "https://bitbucket.org";

/// Display template for repositories hosted on a known forge.
pub fn infer_display(repo: &str) -> Option<String> {
    if repo.starts_with(GITHUB_PREFIX) {
        Some(format!(
            "{repo} {repo}/tree/master{{/dir}} {repo}/blob/master{{/dir}}/{{file}}#L{{line}}"
        ))
    } else if repo.starts_with(BITBUCKET_PREFIX) {
        Some(format!(
            "{repo} {repo}/src/default{{/dir}} {repo}/src/default{{/dir}}/{{file}}#{{file}}-{{line}}"
        ))
    } else {
        None
    }
}

/// Resolve the VCS for an entry, explicit value first.
pub fn infer_vcs(path: &str, raw: &RawPathConfig) -> Result<VcsKind, ConfigError> {
    if !raw.vcs.is_empty() {
        return raw.vcs.parse().map_err(|_| ConfigError::InvalidVcs {
            path: path.to_string(),
            vcs: raw.vcs.clone(),
        });
    }
    if raw.repo.starts_with(GITHUB_PREFIX) {
        return Ok(VcsKind::Git);
    }
    Err(ConfigError::UnresolvableVcs {
        path: path.to_string(),
        repo: raw.repo.clone(),
    })
}

/// Validate one `paths` entry.
pub fn validate_entry(raw_path: &str, raw: &RawPathConfig) -> Result<PathEntry, ConfigError> {
    let vcs = infer_vcs(raw_path, raw)?;
    if raw.repo.is_empty() {
        return Err(ConfigError::MissingRepository {
            path: raw_path.to_string(),
        });
    }
    if Url::parse(&raw.repo).is_err() {
        return Err(ConfigError::InvalidRepository {
            path: raw_path.to_string(),
            repo: raw.repo.clone(),
        });
    }

    let display = if raw.display.is_empty() {
        infer_display(&raw.repo).unwrap_or_default()
    } else {
        raw.display.clone()
    };

    Ok(PathEntry::new(raw_path, raw.repo.as_str(), vcs, display))
}

/// Apply the default and reject negative ages.
pub fn validate_cache_max_age(value: Option<i64>) -> Result<i64, ConfigError> {
    match value {
        None => Ok(DEFAULT_CACHE_MAX_AGE),
        Some(age) if age < 0 => Err(ConfigError::NegativeCacheAge(age)),
        Some(age) => Ok(age),
    }
}

/// The configured bind address, or the fallback when it does not look like
/// `host[:port]`.
pub fn validate_bind_address(address: &str) -> &str {
    if BIND_ADDRESS.is_match(address) {
        address
    } else {
        tracing::warn!(
            address = %address,
            fallback = FALLBACK_BIND_ADDRESS,
            "Invalid or empty server address, using fallback"
        );
        FALLBACK_BIND_ADDRESS
    }
}
