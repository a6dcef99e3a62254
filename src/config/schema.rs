//! Configuration schema definitions.
//!
//! Two documents are described here: the server settings (TOML, optional,
//! overridden by command-line flags) and the redirect document listing the
//! vanity import paths (YAML or TOML, fetched once at startup).

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::routing::PathEntry;

/// Default `Cache-Control` max-age: 24 hours.
pub const DEFAULT_CACHE_MAX_AGE: i64 = 86_400;

/// Root settings for the vanity server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerSettings {
    /// Remote URL or local path of the redirect document.
    pub redirects: String,

    /// Extra path segments accepted after the project segment.
    pub subpath_depth: usize,

    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// HTTP Basic credential gate.
    pub auth: AuthConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,

    /// Timeout for fetching a remote redirect document, in seconds.
    pub fetch_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 5,
            fetch_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// HTTP Basic authentication settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,

    /// Realm advertised in `WWW-Authenticate`.
    pub realm: String,

    /// Username to password.
    pub credentials: HashMap<String, String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            realm: "vanity".to_string(),
            credentials: HashMap::new(),
        }
    }
}

/// Redirect document as written by the operator, before validation.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RedirectDocument {
    /// Host used in import paths instead of the request's Host header.
    pub host: Option<String>,

    /// `Cache-Control` max-age in seconds.
    pub cache_max_age: Option<i64>,

    pub paths: PathTable,
}

/// One raw `paths` entry.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RawPathConfig {
    pub repo: String,
    pub display: String,
    pub vcs: String,
}

/// The `paths` mapping, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTable(pub Vec<(String, RawPathConfig)>);

impl<'de> Deserialize<'de> for PathTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PathTableVisitor;

        impl<'de> Visitor<'de> for PathTableVisitor {
            type Value = PathTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of import paths to repositories")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((path, raw)) = map.next_entry::<String, RawPathConfig>()? {
                    entries.push((path, raw));
                }
                Ok(PathTable(entries))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(PathTable::default())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(PathTable::default())
            }
        }

        deserializer.deserialize_map(PathTableVisitor)
    }
}

/// Validated redirect configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VanityConfig {
    pub host: Option<String>,
    pub cache_max_age: i64,
    /// Entries in document order, duplicates included.
    pub entries: Vec<PathEntry>,
}

impl VanityConfig {
    /// Value of the `Cache-Control` header for successful responses.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }
}
