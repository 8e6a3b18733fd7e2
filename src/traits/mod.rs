//! # Traits
//!
//! The seams of the crate: what the store consumes, and what it offers.
//!
//! ## Consumed
//!
//! ```text
//! BlobRead + BlobWrite + BlobList = BlobClient   (object-storage client)
//! ContentTypeProvider                             (path -> MIME type)
//! Clock                                           (now, sleep)
//! ```
//!
//! ## Offered
//!
//! ```text
//! FileRead + FileWrite + FileDir = FileStore
//! ```
//!
//! Both composites have **blanket implementations**: implement the component
//! traits and the composite comes for free.
//!
//! ## Object Safety
//!
//! All traits are object-safe, so a store can hold `Arc<dyn BlobClient>` and
//! callers can take `&dyn FileStore`.

mod blob_list;
mod blob_read;
mod blob_write;
mod clock;
mod content_type;
mod file_dir;
mod file_read;
mod file_write;

pub use blob_list::BlobList;
pub use blob_read::BlobRead;
pub use blob_write::BlobWrite;
pub use clock::{Clock, SystemClock};
pub use content_type::{ContentTypeProvider, ExtensionContentTypes, FALLBACK_CONTENT_TYPE};
pub use file_dir::FileDir;
pub use file_read::FileRead;
pub use file_write::FileWrite;

/// The full object-storage client contract.
///
/// Blanket-implemented for anything implementing [`BlobRead`], [`BlobWrite`]
/// and [`BlobList`].
pub trait BlobClient: BlobRead + BlobWrite + BlobList {}

impl<T: BlobRead + BlobWrite + BlobList + ?Sized> BlobClient for T {}

/// The full hierarchical file-store API.
///
/// Blanket-implemented for anything implementing [`FileRead`], [`FileWrite`]
/// and [`FileDir`].
pub trait FileStore: FileRead + FileWrite + FileDir {}

impl<T: FileRead + FileWrite + FileDir + ?Sized> FileStore for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composites_are_object_safe() {
        fn _client(_: &dyn BlobClient) {}
        fn _store(_: &dyn FileStore) {}
    }
}
