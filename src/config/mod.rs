//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional) + CLI flags
//!     → ServerSettings
//!
//! redirect document source (URL or path)
//!     → source.rs (classify & fetch bytes)
//!     → loader.rs (parse YAML/TOML)
//!     → validation.rs (normalize keys, infer display & VCS)
//!     → VanityConfig (validated, immutable)
//!     → PathResolver
//! ```
//!
//! # Design Decisions
//! - Documents are loaded once at startup; there is no reload
//! - All settings fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod source;
pub mod validation;

pub use loader::{load, load_from_source, load_settings, ConfigError, DocumentFormat, SettingsError};
pub use schema::{
    AuthConfig, ListenerConfig, ObservabilityConfig, RedirectDocument, ServerSettings,
    TimeoutConfig, TlsConfig, VanityConfig,
};
pub use source::ConfigSource;
