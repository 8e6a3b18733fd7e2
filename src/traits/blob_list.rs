//! Listing side of the object-storage client contract.

use futures::stream::BoxStream;

use crate::{BackendError, ListItem};

/// Listing operations an object-storage client must provide.
///
/// Both listings are lazy cursors: the client fetches further pages only as
/// the stream is polled, so a caller that stops early pays for one page.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn BlobList`.
pub trait BlobList: Send + Sync {
    /// List under `prefix`, grouping keys that continue past the next
    /// `delimiter` into [`ListItem::Prefix`] results.
    fn list_hierarchical(
        &self,
        prefix: &str,
        delimiter: char,
    ) -> BoxStream<'_, Result<ListItem, BackendError>>;

    /// List every object under `prefix`, recursively.
    ///
    /// Only yields [`ListItem::Object`] results.
    fn list_flat(&self, prefix: &str) -> BoxStream<'_, Result<ListItem, BackendError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_list_is_object_safe() {
        fn _check(_: &dyn BlobList) {}
    }
}
