// src/crawl/path.rs
// =============================================================================
// Relative path bookkeeping.
//
// Every file we report is named relative to the root URL, e.g. with the root
// https://example.org/files/ the file https://example.org/files/sub/a.zip is
// reported as "sub/a.zip". The path is built one segment per directory as
// the crawl descends.
// =============================================================================

use url::Url;

/// Joins a link onto the relative path of the page it was found on.
///
/// Behaves like a POSIX path join: a link starting with "/" replaces the
/// parent path, and a separator is only inserted when missing.
pub fn join_relative(parent: &str, link: &str) -> String {
    if parent.is_empty() || link.starts_with('/') {
        link.to_string()
    } else if parent.ends_with('/') {
        format!("{parent}{link}")
    } else {
        format!("{parent}/{link}")
    }
}

/// True when the href carries its own scheme ("https://...", "mailto:...").
///
/// A file name like "http-parser-2.9.4.tar.gz" has no ":" and stays
/// relative. One like "foo:bar.txt" parses as scheme "foo" (RFC 3986 reads
/// it the same way), so it counts as absolute and, being outside the root,
/// is dropped. Listings that mean it as a file write it "./foo:bar.txt".
pub fn is_absolute(link: &str) -> bool {
    Url::parse(link).is_ok()
}

/// Computes the relative path for a link found on a page at `parent`.
///
/// Returns `None` for absolute links outside the root, which are not part
/// of the listing tree.
pub fn relative_path(root: &Url, parent: &str, link: &str) -> Option<String> {
    if is_absolute(link) {
        link.strip_prefix(root.as_str()).map(str::to_string)
    } else {
        Some(join_relative(parent, link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("https://example.org/files/").unwrap()
    }

    #[test]
    fn test_join_at_base_is_the_link() {
        assert_eq!(join_relative("", "libs/"), "libs/");
        assert_eq!(join_relative("", "readme.txt"), "readme.txt");
    }

    #[test]
    fn test_join_nests() {
        let a = join_relative("", "a/");
        let b = join_relative(&a, "b/");
        assert_eq!(join_relative(&b, "c.txt"), "a/b/c.txt");
    }

    #[test]
    fn test_join_inserts_missing_separator() {
        assert_eq!(join_relative("a", "b.txt"), "a/b.txt");
    }

    #[test]
    fn test_join_rooted_link_replaces_parent() {
        assert_eq!(join_relative("a/b/", "/pub/x.zip"), "/pub/x.zip");
    }

    #[test]
    fn test_absolute_detection() {
        assert!(is_absolute("https://example.org/files/a.zip"));
        assert!(is_absolute("mailto:someone@example.org"));
        assert!(!is_absolute("a.zip"));
        assert!(!is_absolute("sub/"));
        assert!(!is_absolute("/files/a.zip"));
        // Looks like a scheme to a prefix check, but is a plain file name
        assert!(!is_absolute("http-parser-2.9.4.tar.gz"));
        assert!(is_absolute("foo:bar.txt"));
        assert!(!is_absolute("./foo:bar.txt"));
    }

    #[test]
    fn test_absolute_link_inside_root() {
        assert_eq!(
            relative_path(&root(), "", "https://example.org/files/sub/a.zip"),
            Some("sub/a.zip".to_string())
        );
        // The parent path plays no part for absolute links
        assert_eq!(
            relative_path(&root(), "deep/", "https://example.org/files/sub/"),
            Some("sub/".to_string())
        );
    }

    #[test]
    fn test_absolute_link_outside_root() {
        assert_eq!(relative_path(&root(), "", "https://mirror.example.com/a.zip"), None);
        assert_eq!(relative_path(&root(), "", "https://example.org/other/a.zip"), None);
    }

    #[test]
    fn test_relative_link() {
        assert_eq!(
            relative_path(&root(), "libs/", "zlib-1.3.tar.gz"),
            Some("libs/zlib-1.3.tar.gz".to_string())
        );
    }
}
