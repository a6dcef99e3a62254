//! Registered import paths.
//!
//! # Responsibilities
//! - Hold one validated import path and its repository metadata
//! - Enumerate the version control systems the `go-import` tag understands
//!
//! # Design Decisions
//! - Keys never carry a trailing slash; `/` normalizes to the empty key
//! - Entries are immutable once built

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Version control system backing a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    Bzr,
    Git,
    Hg,
    Svn,
}

impl VcsKind {
    /// Identifier written into the `go-import` meta tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            VcsKind::Bzr => "bzr",
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Svn => "svn",
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known VCS.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown VCS {0}")]
pub struct UnknownVcs(pub String);

impl FromStr for VcsKind {
    type Err = UnknownVcs;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bzr" => Ok(VcsKind::Bzr),
            "git" => Ok(VcsKind::Git),
            "hg" => Ok(VcsKind::Hg),
            "svn" => Ok(VcsKind::Svn),
            other => Err(UnknownVcs(other.to_string())),
        }
    }
}

/// One registered import path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    path: String,
    repository: String,
    vcs: VcsKind,
    display: String,
}

impl PathEntry {
    /// Create an entry, stripping a single trailing `/` from `path`.
    pub fn new(
        path: impl Into<String>,
        repository: impl Into<String>,
        vcs: VcsKind,
        display: impl Into<String>,
    ) -> Self {
        let mut path = path.into();
        if path.ends_with('/') {
            path.pop();
        }
        Self {
            path,
            repository: repository.into(),
            vcs,
            display: display.into(),
        }
    }

    /// Normalized key used for prefix matching.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn vcs(&self) -> VcsKind {
        self.vcs
    }

    /// Source browsing template (`{dir}`, `{file}`, `{line}`); may be empty.
    pub fn display(&self) -> &str {
        &self.display
    }
}
