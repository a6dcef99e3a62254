//! Vanity import path server library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::{ServerSettings, VanityConfig};
pub use http::VanityServer;
pub use lifecycle::Shutdown;
pub use routing::{PathEntry, PathResolver, ResolvedMatch, VcsKind};
