// src/listing/classify.rs
// =============================================================================
// Decides what to do with one href found on a directory listing page.
//
// Every anchor on a listing is one of three things:
// - navigation noise (parent directory, sort-order links, the listing's own
//   name) -> Skip
// - a sub-directory (ends with "/") -> Descend
// - a file -> Collect
//
// Which anchors count as noise depends on the listing server, so that part
// lives behind the SkipPolicy trait. ListingSkipPolicy::default() carries the
// rules for Apache-style "distfiles" mirrors; other servers get their own
// names through the config file.
// =============================================================================

use std::collections::HashSet;

use serde::Serialize;

/// What the crawler should do with a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Skip,
    Descend,
    Collect,
}

/// Decides whether a link is navigation noise.
///
/// `at_base` is true only while classifying links on the root page.
pub trait SkipPolicy: Send + Sync {
    fn should_skip(&self, link: &str, at_base: bool) -> bool;
}

/// Skip rules for HTML directory listings.
#[derive(Debug, Clone)]
pub struct ListingSkipPolicy {
    // Stored lower-cased and trimmed
    names: HashSet<String>,
    base_prefixes: Vec<String>,
}

/// Anchors that never point at new content on a distfiles mirror.
pub const DEFAULT_SKIP_NAMES: &[&str] = &[
    "parent directory",
    "../",
    "/",
    "distfiles/",
    "/distfiles/",
];

/// Prefixes skipped on the root page only: the root linking back to itself.
pub const DEFAULT_BASE_PREFIXES: &[&str] = &["distfiles"];

impl ListingSkipPolicy {
    pub fn new<N, P>(names: N, base_prefixes: P) -> Self
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| normalize(n.as_ref())).collect(),
            base_prefixes: base_prefixes
                .into_iter()
                .map(|p| normalize(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

impl Default for ListingSkipPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_NAMES, DEFAULT_BASE_PREFIXES)
    }
}

impl SkipPolicy for ListingSkipPolicy {
    fn should_skip(&self, link: &str, at_base: bool) -> bool {
        let normalized = normalize(link);

        if self.names.contains(&normalized) {
            return true;
        }

        // Sort/filter query links ("?C=N;O=D") list the same files again
        if link.starts_with('?') {
            return true;
        }

        at_base
            && self
                .base_prefixes
                .iter()
                .any(|prefix| normalized.starts_with(prefix.as_str()))
    }
}

/// Classifies a raw href.
///
/// Only the skip check is case/whitespace-insensitive; the directory check
/// looks at the link exactly as written.
pub fn classify(policy: &dyn SkipPolicy, link: &str, at_base: bool) -> Classification {
    if policy.should_skip(link, at_base) {
        Classification::Skip
    } else if link.ends_with('/') {
        Classification::Descend
    } else {
        Classification::Collect
    }
}

fn normalize(link: &str) -> String {
    link.trim().to_lowercase()
}
