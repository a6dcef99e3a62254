//! Import path lookup.
//!
//! # Responsibilities
//! - Store registered entries sorted by key
//! - Find the longest registered prefix of a request path
//! - Return the matched entry and the remaining subpath, or no match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Binary search bounds the candidate scan: O(log n + k)
//! - Duplicate keys keep the entry inserted last
//! - Explicit `None` rather than a silent default

use crate::routing::entry::PathEntry;

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMatch<'a> {
    pub entry: &'a PathEntry,
    /// Remainder of the request path after the matched prefix.
    pub subpath: &'a str,
}

/// Sorted, read-only index of import paths.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    entries: Vec<PathEntry>,
}

impl PathResolver {
    /// Build the index. Entries are ordered byte-wise by path.
    pub fn new(mut entries: Vec<PathEntry>) -> Self {
        // Stable sort over the reversed input puts the last-inserted duplicate
        // first in its run, and dedup keeps the first of each run.
        entries.reverse();
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        entries.dedup_by(|later, kept| later.path() == kept.path());
        Self { entries }
    }

    /// Entries in lookup order.
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `request_path` to the entry with the longest matching prefix.
    pub fn find<'a>(&'a self, request_path: &'a str) -> Option<ResolvedMatch<'a>> {
        // Everything at or after `cut` compares >= request_path.
        let cut = self
            .entries
            .partition_point(|entry| entry.path() < request_path);

        if let Some(entry) = self.entries.get(cut) {
            if entry.path() == request_path {
                return Some(ResolvedMatch { entry, subpath: "" });
            }
        }

        if let Some(entry) = cut.checked_sub(1).map(|i| &self.entries[i]) {
            let subpath = request_path
                .strip_prefix(entry.path())
                .and_then(|rest| rest.strip_prefix('/'));
            if let Some(subpath) = subpath {
                return Some(ResolvedMatch { entry, subpath });
            }
        }

        // Slow path: the longest prefix leaves the shortest subpath. This scan
        // does not require a `/` after the prefix, unlike the check above.
        let mut shortest = request_path.len();
        let mut best = None;
        for entry in &self.entries[..cut] {
            if entry.path().len() >= request_path.len() {
                continue;
            }
            let Some(subpath) = request_path.strip_prefix(entry.path()) else {
                continue;
            };
            if subpath.len() < shortest {
                shortest = subpath.len();
                best = Some(ResolvedMatch { entry, subpath });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::entry::VcsKind;

    fn entry(path: &str) -> PathEntry {
        PathEntry::new(path, format!("https://example.com{}", path), VcsKind::Git, "")
    }

    fn resolver(paths: &[&str]) -> PathResolver {
        PathResolver::new(paths.iter().map(|p| entry(p)).collect())
    }

    fn lookup<'a>(resolver: &'a PathResolver, path: &'a str) -> Option<(&'a str, &'a str)> {
        resolver.find(path).map(|m| (m.entry.path(), m.subpath))
    }

    #[test]
    fn test_entries_are_sorted() {
        let r = resolver(&["/xyz", "/abc/def", "/abc", "/"]);
        let paths: Vec<&str> = r.entries().iter().map(PathEntry::path).collect();
        assert_eq!(paths, vec!["", "/abc", "/abc/def", "/xyz"]);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn test_exact_match_has_empty_subpath() {
        let r = resolver(&["/abc", "/abc/def", "/xyz"]);
        for path in ["/abc", "/abc/def", "/xyz"] {
            assert_eq!(lookup(&r, path), Some((path, "")));
        }
    }

    #[test]
    fn test_adjacent_prefix() {
        let r = resolver(&["/abc", "/xyz"]);
        assert_eq!(lookup(&r, "/abc/pkg/sub"), Some(("/abc", "pkg/sub")));
        assert_eq!(lookup(&r, "/xyz/a"), Some(("/xyz", "a")));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let r = resolver(&["/a", "/a/b"]);
        assert_eq!(lookup(&r, "/a/b/c"), Some(("/a/b", "c")));
        // "/a/b" is adjacent but not a prefix; the slow path keeps the slash.
        assert_eq!(lookup(&r, "/a/c"), Some(("/a", "/c")));
    }

    #[test]
    fn test_longest_prefix_behind_a_sibling() {
        // "/abc/def" sorts between "/abc" and the request, so the adjacent
        // entry is not a prefix and the scan has to find "/abc".
        let r = resolver(&["/", "/abc", "/abc/def", "/abc/zzz", "/xyz"]);
        assert_eq!(lookup(&r, "/abc/foo"), Some(("/abc", "/foo")));
        assert_eq!(lookup(&r, "/abc/def/x"), Some(("/abc/def", "x")));
    }

    #[test]
    fn test_root_entry() {
        let r = resolver(&["/"]);
        assert_eq!(lookup(&r, "/x"), Some(("", "x")));
        assert_eq!(lookup(&r, "/"), Some(("", "")));

        // The empty key leaves the whole request as its subpath, which never
        // beats the initial bound of the slow path.
        let r = resolver(&["/", "/abc"]);
        assert_eq!(lookup(&r, "/x"), None);
    }

    #[test]
    fn test_no_match() {
        let r = resolver(&["/abc", "/xyz"]);
        assert_eq!(lookup(&r, "/def"), None);
        assert_eq!(lookup(&r, "/ab"), None);
        assert_eq!(lookup(&r, ""), None);
        assert_eq!(lookup(&PathResolver::default(), "/abc"), None);
    }

    #[test]
    fn test_fallback_matches_without_separator() {
        // The slow path accepts a prefix that ends mid-segment.
        let r = resolver(&["/foo"]);
        assert_eq!(lookup(&r, "/foobar"), Some(("/foo", "bar")));
        // While the adjacent fast path requires the separator.
        assert_eq!(lookup(&r, "/foo/bar"), Some(("/foo", "bar")));
    }

    #[test]
    fn test_fallback_prefers_longest_prefix() {
        let r = resolver(&["/a", "/ab", "/abc/q"]);
        assert_eq!(lookup(&r, "/abz"), Some(("/ab", "z")));
    }

    #[test]
    fn test_duplicate_keys_keep_last_inserted() {
        let r = PathResolver::new(vec![
            PathEntry::new("/dup", "https://example.com/first", VcsKind::Git, ""),
            PathEntry::new("/other", "https://example.com/other", VcsKind::Git, ""),
            PathEntry::new("/dup/", "https://example.com/second", VcsKind::Hg, ""),
        ]);
        assert_eq!(r.len(), 2);
        let m = r.find("/dup").unwrap();
        assert_eq!(m.entry.repository(), "https://example.com/second");
        assert_eq!(m.entry.vcs(), VcsKind::Hg);
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let r = resolver(&["/a", "/a/b", "/c"]);
        let first = r.find("/a/b/c/d");
        for _ in 0..10 {
            assert_eq!(r.find("/a/b/c/d"), first);
        }
    }

    #[test]
    fn test_every_entry_resolves_itself_and_children() {
        let paths = ["/mycoolproject", "/myothercoolproject", "/tools", "/tools/lint"];
        let r = resolver(&paths);
        for path in paths {
            assert_eq!(lookup(&r, path), Some((path, "")));
        }
        for path in ["/mycoolproject", "/myothercoolproject", "/tools/lint"] {
            let request = format!("{}/pkg", path);
            let m = r.find(&request).map(|m| (m.entry.path().to_string(), m.subpath.to_string()));
            assert_eq!(m, Some((path.to_string(), "pkg".to_string())));
        }
    }
}
