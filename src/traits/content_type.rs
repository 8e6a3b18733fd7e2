//! Content-type inference for uploads.

use std::collections::HashMap;

/// Content type used when no provider recognizes a path.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Maps a store path to a MIME type.
///
/// Implemented for any `Fn(&str) -> Option<String>`, so a closure can be
/// injected directly.
///
/// # Example
///
/// ```rust
/// use blobfs::ContentTypeProvider;
///
/// let provider = |path: &str| path.ends_with(".md").then(|| "text/markdown".to_owned());
/// assert_eq!(provider.content_type("README.md").as_deref(), Some("text/markdown"));
/// assert_eq!(provider.content_type("a.bin"), None);
/// ```
pub trait ContentTypeProvider: Send + Sync {
    /// MIME type for `path`, or `None` if it cannot be inferred.
    fn content_type(&self, path: &str) -> Option<String>;
}

impl<F> ContentTypeProvider for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn content_type(&self, path: &str) -> Option<String> {
        self(path)
    }
}

const BUILTIN: &[(&str, &str)] = &[
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("gif", "image/gif"),
    ("gz", "application/gzip"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ico", "image/x-icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("tar", "application/x-tar"),
    ("txt", "text/plain"),
    ("wasm", "application/wasm"),
    ("webm", "video/webm"),
    ("webp", "image/webp"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
];

/// Extension-based provider with a built-in table of common types.
///
/// Extensions match case-insensitively. Entries added with
/// [`with_mapping`](Self::with_mapping) take precedence over the table.
#[derive(Debug, Clone, Default)]
pub struct ExtensionContentTypes {
    overrides: HashMap<String, String>,
}

impl ExtensionContentTypes {
    /// Provider backed by the built-in table only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `extension` (without the dot) to `content_type`.
    pub fn with_mapping(mut self, extension: &str, content_type: impl Into<String>) -> Self {
        self.overrides
            .insert(extension.to_ascii_lowercase(), content_type.into());
        self
    }
}

impl ContentTypeProvider for ExtensionContentTypes {
    fn content_type(&self, path: &str) -> Option<String> {
        let name = crate::file_name(path);
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        let ext = ext.to_ascii_lowercase();
        if let Some(ct) = self.overrides.get(&ext) {
            return Some(ct.clone());
        }
        BUILTIN
            .binary_search_by(|(e, _)| (*e).cmp(ext.as_str()))
            .ok()
            .map(|i| BUILTIN[i].1.to_owned())
    }
}
