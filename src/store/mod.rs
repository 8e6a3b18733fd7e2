//! # Blob File Store
//!
//! [`BlobFileStore`] presents directories on top of a flat object namespace.
//!
//! ## Responsibility
//! - Directory emulation through prefix existence and marker objects ([`directory`])
//! - Hierarchical listing with markers filtered out ([`listing`])
//! - File reads, uploads, deletes, copies and moves ([`transfer`])
//!
//! ## Dependencies
//! - [`BlobClient`] for every backend call
//! - [`KeyResolver`] for key derivation
//! - [`Clock`] and [`ContentTypeProvider`] as injected services
//!
//! Nothing is cached: every call re-reads backend state.

mod directory;
mod listing;
mod transfer;

use std::fmt;
use std::sync::Arc;

use crate::{
    BlobClient, Clock, ContentTypeProvider, CopyPollPolicy, DirectoryEntry,
    ExtensionContentTypes, FileEntry, KeyResolver, ObjectProperties, StoreConfig, SystemClock,
    combine, file_name,
};

/// A hierarchical file store backed by a single object-storage container.
///
/// # Example
///
/// ```rust
/// use blobfs::{BlobFileStore, FileDir, FileRead, ListOptions, MemoryBlobClient, StoreConfig};
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let store = BlobFileStore::new(
///     Arc::new(MemoryBlobClient::new()),
///     StoreConfig::new("devaccount", "media"),
/// );
///
/// store.create_directory("photos").await?;
/// let root = store.list_directory("", ListOptions::default()).await?;
/// assert_eq!(root.len(), 1);
/// assert!(root[0].is_dir());
/// assert!(store.get_file("photos").await?.is_none());
/// # Ok::<(), blobfs::StoreError>(())
/// # }).unwrap();
/// ```
pub struct BlobFileStore<C: ?Sized> {
    client: Arc<C>,
    keys: KeyResolver,
    container: String,
    marker_name: String,
    poll: CopyPollPolicy,
    clock: Arc<dyn Clock>,
    content_types: Arc<dyn ContentTypeProvider>,
}

impl<C: BlobClient + ?Sized> BlobFileStore<C> {
    /// Create a store over `client` with the system clock and the built-in
    /// content-type table.
    pub fn new(client: Arc<C>, config: StoreConfig) -> Self {
        Self {
            client,
            keys: KeyResolver::new(config.base_path.as_deref()),
            container: config.container,
            marker_name: config.marker_name,
            poll: config.copy_poll,
            clock: Arc::new(SystemClock),
            content_types: Arc::new(ExtensionContentTypes::new()),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the content-type provider.
    pub fn with_content_types(mut self, provider: impl ContentTypeProvider + 'static) -> Self {
        self.content_types = Arc::new(provider);
        self
    }

    /// The underlying client.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Key derivation in use.
    pub fn keys(&self) -> &KeyResolver {
        &self.keys
    }

    /// Leaf name of directory marker objects.
    pub fn marker_name(&self) -> &str {
        &self.marker_name
    }

    fn marker_path(&self, directory: &str) -> String {
        combine(directory, &self.marker_name)
    }

    fn directory_entry(&self, path: &str) -> DirectoryEntry {
        DirectoryEntry {
            path: path.to_owned(),
            name: file_name(path).to_owned(),
            observed: self.clock.now(),
        }
    }

    fn file_entry(path: String, properties: ObjectProperties) -> FileEntry {
        FileEntry {
            name: file_name(&path).to_owned(),
            path,
            size: properties.size,
            modified: properties.last_modified,
        }
    }
}

impl<C: ?Sized> fmt::Debug for BlobFileStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobFileStore")
            .field("container", &self.container)
            .field("base", &self.keys.base())
            .field("marker_name", &self.marker_name)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}
