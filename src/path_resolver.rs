//! # Key Resolver
//!
//! Translation between store paths and backend object keys.
//!
//! ## Responsibility
//! - Normalize store-relative paths
//! - Derive object keys (no trailing separator) and listing prefixes
//!   (exactly one trailing separator) under an optional base prefix
//! - Map keys and prefixes returned by the backend back to store paths
//!
//! ## Key Encoding
//! A `%` in a path segment is stored as `%25`, so every name the store
//! writes decodes back to itself. Backend names are percent-decoded only when
//! the decoded segment maps back to the same key segment; anything else is
//! kept raw. A decoded segment therefore never contains a separator.
//! Foreign keys holding a `%` that is not an escape written here are
//! listed raw and cannot be addressed through a store path.
//!
//! ## Dependencies
//! - `urlencoding` for percent-decoding.
//!
//! ## Usage
//!
//! ```rust
//! use blobfs::KeyResolver;
//!
//! let keys = KeyResolver::new(Some("/tenant-a/"));
//! assert_eq!(keys.to_object_key("docs/a.txt"), "tenant-a/docs/a.txt");
//! assert_eq!(keys.to_prefix("docs"), "tenant-a/docs/");
//! assert_eq!(keys.to_store_path("tenant-a/docs/sub/"), "docs/sub");
//! assert_eq!(keys.to_object_key("docs/50%.txt"), "tenant-a/docs/50%25.txt");
//! assert_eq!(keys.to_store_path("tenant-a/docs/50%25.txt"), "docs/50%.txt");
//! ```

use std::borrow::Cow;

/// Separator between path segments, in store paths and object keys alike.
pub const SEPARATOR: char = '/';

/// Derives backend object keys from store paths.
///
/// The base prefix is normalized once at construction: surrounding
/// separators are trimmed and an empty prefix means "none".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyResolver {
    base: String,
}

impl KeyResolver {
    /// Create a resolver rooted at `base_path` (or at the container root).
    pub fn new(base_path: Option<&str>) -> Self {
        Self {
            base: base_path.map(normalize).unwrap_or_default(),
        }
    }

    /// The normalized base prefix (empty if unconfigured).
    #[inline]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Object key for a file at `path`. Never ends with a separator.
    pub fn to_object_key(&self, path: &str) -> String {
        let escaped = path
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(escape_segment)
            .collect::<Vec<_>>()
            .join("/");
        combine(&self.base, &escaped)
    }

    /// Listing prefix for the directory at `path`.
    ///
    /// Ends with exactly one separator and never begins with one. The only
    /// exception is the container root without a base prefix, whose prefix
    /// is empty.
    pub fn to_prefix(&self, path: &str) -> String {
        let key = self.to_object_key(path);
        let key = key.trim_matches(SEPARATOR);
        if key.is_empty() {
            String::new()
        } else {
            format!("{key}{SEPARATOR}")
        }
    }

    /// Map an object key or common prefix returned by the backend back to a
    /// store path, stripping the base prefix and any trailing separator and
    /// decoding each segment.
    pub fn to_store_path(&self, key: &str) -> String {
        let relative = if self.base.is_empty() {
            key
        } else {
            key.strip_prefix(self.base.as_str())
                .and_then(|rest| rest.strip_prefix(SEPARATOR))
                .unwrap_or(key)
        };
        relative
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(unescape_segment)
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Key form of a single path segment.
pub(crate) fn escape_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('%') {
        Cow::Owned(segment.replace('%', "%25"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Path form of a single key segment. Undecodable or non-canonical
/// segments stay raw.
pub(crate) fn unescape_segment(segment: &str) -> Cow<'_, str> {
    match urlencoding::decode(segment) {
        Ok(decoded) if escape_segment(&decoded) == segment => decoded,
        _ => Cow::Borrowed(segment),
    }
}

/// Join two path segments with a single separator.
///
/// An empty operand yields the other one unchanged.
///
/// ```rust
/// use blobfs::combine;
///
/// assert_eq!(combine("docs", "a.txt"), "docs/a.txt");
/// assert_eq!(combine("docs/", "/a.txt"), "docs/a.txt");
/// assert_eq!(combine("", "a.txt"), "a.txt");
/// assert_eq!(combine("docs", ""), "docs");
/// ```
pub fn combine(base: &str, relative: &str) -> String {
    if base.is_empty() {
        return relative.to_owned();
    }
    if relative.is_empty() {
        return base.to_owned();
    }
    format!(
        "{}{SEPARATOR}{}",
        base.trim_end_matches(SEPARATOR),
        relative.trim_start_matches(SEPARATOR)
    )
}

/// Normalize a store path: drop leading, trailing and repeated separators.
///
/// The empty string denotes the store root.
pub fn normalize(path: &str) -> String {
    path.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parent of a normalized store path. The root has no parent.
pub fn parent(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(path.rsplit_once(SEPARATOR).map(|(p, _)| p).unwrap_or(""))
}

/// Last segment of a normalized store path (empty for the root).
pub fn file_name(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_tolerates_empty_operands() {
        for p in ["", "a", "a/b", "dir/file.txt"] {
            assert_eq!(combine("", p), p);
            assert_eq!(combine(p, ""), p);
        }
    }

    #[test]
    fn combine_uses_single_separator() {
        assert_eq!(combine("a", "b"), "a/b");
        assert_eq!(combine("a/", "b"), "a/b");
        assert_eq!(combine("a", "/b"), "a/b");
        assert_eq!(combine("a//", "//b"), "a/b");
    }

    #[test]
    fn normalize_strips_separators() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("/"), "");
        assert_eq!(normalize("/a/b/"), "a/b");
        assert_eq!(normalize("a//b"), "a/b");
    }

    #[test]
    fn object_key_without_base() {
        let keys = KeyResolver::new(None);
        assert_eq!(keys.base(), "");
        assert_eq!(keys.to_object_key("a/b.txt"), "a/b.txt");
        assert_eq!(keys.to_object_key(""), "");
    }

    #[test]
    fn object_key_with_base() {
        let keys = KeyResolver::new(Some("//media/site//"));
        assert_eq!(keys.base(), "media/site");
        assert_eq!(keys.to_object_key("a.txt"), "media/site/a.txt");
        assert_eq!(keys.to_object_key("/a.txt"), "media/site/a.txt");
        assert_eq!(keys.to_object_key(""), "media/site");
    }

    #[test]
    fn empty_base_is_none() {
        assert_eq!(KeyResolver::new(Some("/")), KeyResolver::new(None));
        assert_eq!(KeyResolver::new(Some("")), KeyResolver::default());
    }

    #[test]
    fn prefix_has_exactly_one_trailing_separator() {
        for keys in [KeyResolver::new(None), KeyResolver::new(Some("base"))] {
            for p in ["a", "a/", "a//", "/a/b/", "x/y/z"] {
                let prefix = keys.to_prefix(p);
                assert!(prefix.ends_with('/'), "{prefix}");
                assert!(!prefix.ends_with("//"), "{prefix}");
                assert!(!prefix.starts_with('/'), "{prefix}");
            }
        }
    }

    #[test]
    fn prefix_of_root() {
        assert_eq!(KeyResolver::new(None).to_prefix(""), "");
        assert_eq!(KeyResolver::new(Some("base")).to_prefix(""), "base/");
    }

    #[test]
    fn store_path_from_key() {
        let keys = KeyResolver::new(Some("base"));
        assert_eq!(keys.to_store_path("base/a/b.txt"), "a/b.txt");
        assert_eq!(keys.to_store_path("base/a/sub/"), "a/sub");

        let keys = KeyResolver::new(None);
        assert_eq!(keys.to_store_path("a/sub/"), "a/sub");
    }

    #[test]
    fn percent_is_escaped_in_keys() {
        let keys = KeyResolver::new(Some("base"));
        assert_eq!(keys.to_object_key("docs/100%20.txt"), "base/docs/100%2520.txt");
        assert_eq!(keys.to_prefix("q%20x"), "base/q%2520x/");
        assert_eq!(keys.to_object_key("plain name.txt"), "base/plain name.txt");
    }

    #[test]
    fn store_paths_round_trip_through_keys() {
        let keys = KeyResolver::new(Some("base"));
        for path in ["docs/100%20.txt", "docs/a%2Fb.txt", "50%", "%%", "a b/c.txt", "x/y"] {
            assert_eq!(keys.to_store_path(&keys.to_object_key(path)), path);
            assert_eq!(keys.to_store_path(&keys.to_prefix(path)), path);
        }
    }

    #[test]
    fn unescape_keeps_foreign_encodings_raw() {
        assert_eq!(unescape_segment("50%25.txt"), "50%.txt");
        assert_eq!(unescape_segment("plain"), "plain");
        // Would decode to a separator, or to a name stored differently.
        assert_eq!(unescape_segment("a%2Fb.txt"), "a%2Fb.txt");
        assert_eq!(unescape_segment("a%20b"), "a%20b");
        assert_eq!(unescape_segment("bad%ff"), "bad%ff");
    }

    #[test]
    fn parent_and_file_name() {
        assert_eq!(parent("a/b/c"), Some("a/b"));
        assert_eq!(parent("a"), Some(""));
        assert_eq!(parent(""), None);
        assert_eq!(file_name("a/b/c.txt"), "c.txt");
        assert_eq!(file_name("c.txt"), "c.txt");
        assert_eq!(file_name(""), "");
    }
}
