//! Import path resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → resolver.rs (binary search + longest prefix scan)
//!     → Return: matched PathEntry and subpath, or no match
//!
//! Index construction (at startup):
//!     validated PathEntry[]
//!     → Sort by path (byte-wise)
//!     → Drop duplicate keys, keeping the last one
//!     → Freeze as immutable PathResolver
//! ```
//!
//! # Design Decisions
//! - Index built at startup, immutable at runtime
//! - No regex or wildcard patterns, plain prefixes only
//! - Deterministic: same input always matches same entry

pub mod entry;
pub mod resolver;

pub use entry::{PathEntry, UnknownVcs, VcsKind};
pub use resolver::{PathResolver, ResolvedMatch};
