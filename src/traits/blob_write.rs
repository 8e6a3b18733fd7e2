//! Write side of the object-storage client contract.

use async_trait::async_trait;

use crate::{BackendError, ByteStream};

/// Write operations an object-storage client must provide.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn BlobWrite`.
#[async_trait]
pub trait BlobWrite: Send + Sync {
    /// Upload `body` to `key`, replacing any existing object.
    async fn upload(
        &self,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> Result<(), BackendError>;

    /// Delete the object at `key` if it exists.
    ///
    /// With `include_snapshots` set, snapshots of the object are removed too.
    /// Returns whether an object was deleted.
    async fn delete_if_exists(
        &self,
        key: &str,
        include_snapshots: bool,
    ) -> Result<bool, BackendError>;

    /// Start a server-side copy from `source_key` to `destination_key`.
    ///
    /// Returns once the copy is accepted. Progress is reported through
    /// [`ObjectProperties::copy`](crate::ObjectProperties::copy) on the
    /// destination.
    async fn start_copy(
        &self,
        source_key: &str,
        destination_key: &str,
    ) -> Result<(), BackendError>;
}
