//! Directory operations of the file store.

use async_trait::async_trait;

use crate::{DirectoryEntry, Entry, ListOptions, StoreError};

/// Directory operations for a hierarchical file store.
///
/// Directories are derived: one exists while any object lives under its
/// prefix. The root always exists.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FileDir`.
#[async_trait]
pub trait FileDir: Send + Sync {
    /// The directory at `path`, or `None` if nothing lives under it.
    async fn get_directory_info(&self, path: &str) -> Result<Option<DirectoryEntry>, StoreError>;

    /// List the directory at `path`.
    ///
    /// Directories come before files. Listing a missing directory yields
    /// an empty result.
    async fn list_directory(
        &self,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<Entry>, StoreError>;

    /// Create the directory at `path`. Idempotent.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Conflict`] if a file already occupies `path`
    async fn create_directory(&self, path: &str) -> Result<(), StoreError>;

    /// Delete the directory at `path` and everything under it.
    ///
    /// Returns whether anything was deleted. Objects are removed one by one
    /// with no rollback: a failure part way leaves earlier deletions in place.
    ///
    /// # Errors
    ///
    /// - [`StoreError::RootViolation`] if `path` is the root
    async fn delete_directory(&self, path: &str) -> Result<bool, StoreError>;
}
