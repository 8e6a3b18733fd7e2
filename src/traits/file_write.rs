//! Write operations of the file store.

use async_trait::async_trait;

use crate::{ByteStream, StoreError};

/// Write operations for a hierarchical file store.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FileWrite`.
#[async_trait]
pub trait FileWrite: Send + Sync {
    /// Upload `body` as the file at `path` and return the path.
    ///
    /// The content type is inferred from the path.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`] if `overwrite` is false and a file exists at `path`
    async fn create_file(
        &self,
        path: &str,
        body: ByteStream,
        overwrite: bool,
    ) -> Result<String, StoreError>;

    /// Delete the file at `path`.
    ///
    /// Idempotent: returns `false` if there was nothing to delete.
    async fn delete_file(&self, path: &str) -> Result<bool, StoreError>;

    /// Copy a file with a server-side copy and wait for it to finish.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] if `src` and `dst` are the same path
    /// - [`StoreError::NotFound`] if `src` does not exist
    /// - [`StoreError::AlreadyExists`] if `dst` already exists
    /// - [`StoreError::CopyFailed`] if the copy ends in a status other than success
    /// - [`StoreError::Timeout`] if the copy is still pending after the poll budget
    async fn copy_file(&self, src: &str, dst: &str) -> Result<(), StoreError>;

    /// Move a file: [`copy_file`](Self::copy_file), then delete `src`.
    ///
    /// This is **not atomic**. If the second step fails or the task is
    /// dropped between the two steps, both `src` and `dst` exist.
    ///
    /// # Errors
    ///
    /// Same as [`copy_file`](Self::copy_file), plus backend failures of the delete.
    async fn move_file(&self, src: &str, dst: &str) -> Result<(), StoreError>;
}
