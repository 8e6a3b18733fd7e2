//! Read operations of the file store.

use async_trait::async_trait;

use crate::{ByteStream, FileEntry, StoreError};

/// Read operations for a hierarchical file store.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` so one
/// store can serve concurrent callers.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FileRead`.
#[async_trait]
pub trait FileRead: Send + Sync {
    /// Metadata of the file at `path`, or `None` if no file exists there.
    ///
    /// The root path is never a file.
    async fn get_file(&self, path: &str) -> Result<Option<FileEntry>, StoreError>;

    /// Open the file at `path` for streaming.
    ///
    /// No existence check is made up front; the backend fails the open.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the file does not exist
    async fn open_read_stream(&self, path: &str) -> Result<ByteStream, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_read_is_object_safe() {
        fn _check(_: &dyn FileRead) {}
    }

    #[test]
    fn file_read_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FileRead>() {
            _assert_send_sync::<T>();
        }
    }
}
