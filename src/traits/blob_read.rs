//! Read side of the object-storage client contract.

use async_trait::async_trait;

use crate::{BackendError, ByteStream, ObjectProperties};

/// Read operations an object-storage client must provide.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. A single client is shared by
/// every concurrent store operation.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn BlobRead`.
#[async_trait]
pub trait BlobRead: Send + Sync {
    /// Check whether an object exists at exactly `key`.
    async fn exists(&self, key: &str) -> Result<bool, BackendError>;

    /// Fetch the properties of the object at `key`.
    ///
    /// Returns `Ok(None)` if no object exists there.
    async fn properties(&self, key: &str) -> Result<Option<ObjectProperties>, BackendError>;

    /// Open the content of the object at `key` as a stream.
    ///
    /// # Errors
    ///
    /// Fails with a 404 [`BackendError`] if the object does not exist.
    async fn download(&self, key: &str) -> Result<ByteStream, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_read_is_object_safe() {
        fn _check(_: &dyn BlobRead) {}
    }
}
