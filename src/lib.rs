//! # blobfs
//!
//! A **hierarchical file store on top of flat object storage**.
//!
//! Object stores only know opaque keys. This crate layers paths and
//! directories over them: a path becomes a key under an optional base
//! prefix, a directory exists while objects live under its prefix, and empty
//! directories are kept alive by a small marker object that listings hide.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use blobfs::{
//!     BlobFileStore, FileDir, FileStoreExt, FileWrite, ListOptions, MemoryBlobClient, StoreConfig,
//! };
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let store = BlobFileStore::new(
//!     Arc::new(MemoryBlobClient::new()),
//!     StoreConfig::new("devaccount", "media").with_base_path("tenant-a"),
//! );
//!
//! store.create_directory("photos/2024").await?;
//! store.write("photos/2024/beach.jpg", Bytes::from("jpeg"), false).await?;
//! store.copy_file("photos/2024/beach.jpg", "photos/best.jpg").await?;
//!
//! let photos = store.list_directory("photos", ListOptions::default()).await?;
//! assert_eq!(photos.len(), 2);
//! assert!(photos[0].is_dir());
//! assert_eq!(photos[1].path(), "photos/best.jpg");
//! # Ok::<(), blobfs::StoreError>(())
//! # }).unwrap();
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`BlobFileStore`] | The adapter: files and directories over a [`BlobClient`] |
//! | [`FileStore`] | Public API: [`FileRead`] + [`FileWrite`] + [`FileDir`] |
//! | [`BlobClient`] | What a storage client provides: [`BlobRead`] + [`BlobWrite`] + [`BlobList`] |
//! | [`KeyResolver`] | Path to key translation under a base prefix |
//! | [`StoreConfig`] | Account, container, base path, marker name, copy polling |
//! | [`StoreError`] | Error type with path and operation context |
//! | [`MemoryBlobClient`] | In-process client for tests and demos |
//!
//! ---
//!
//! ## Trait Layout
//!
//! ```text
//! Consumed:  BlobRead + BlobWrite + BlobList = BlobClient
//!            Clock, ContentTypeProvider
//! Offered:   FileRead + FileWrite + FileDir  = FileStore
//!            FileStoreExt (blanket)
//! ```
//!
//! Both composites have **blanket implementations**.
//!
//! ---
//!
//! ## Error Handling
//!
//! All store operations return `Result<T, StoreError>`. Errors carry context:
//!
//! ```rust
//! use blobfs::StoreError;
//!
//! let err = StoreError::NotFound { path: "docs/a.txt".into() };
//! assert_eq!(err.to_string(), "not found: docs/a.txt");
//!
//! let err = StoreError::RootViolation { operation: "delete_directory" };
//! assert_eq!(err.to_string(), "delete_directory: the root directory cannot be deleted");
//! ```
//!
//! ---
//!
//! ## Consistency
//!
//! Nothing is cached and no operation is transactional. A move is a copy
//! followed by a delete; between the two, both paths exist.
//!
//! ---
//!
//! ## Logging
//!
//! Operations emit [`tracing`](https://docs.rs/tracing) events: `debug!` for
//! per-call detail, `info!` for completed destructive operations and `warn!`
//! for failed or abandoned copies. Install any subscriber to see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for entries and config, plus `FileStoreExtJson` |

// Private modules
mod config;
mod error;
mod ext;
mod memory;
mod path_resolver;
mod store;
mod traits;
mod types;

// Public re-exports - error types
pub use error::{BackendError, StoreError};

// Public re-exports - core types
pub use types::{
    ByteStream, CopyState, CopyStatus, DirectoryEntry, Entry, FileEntry, ListItem, ListOptions,
    ObjectProperties,
};

// Public re-exports - configuration
pub use config::{
    CopyPollPolicy, DEFAULT_MARKER_NAME, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
    StoreConfig,
};

// Public re-exports - backend traits
pub use traits::{BlobClient, BlobList, BlobRead, BlobWrite};

// Public re-exports - store traits
pub use traits::{FileDir, FileRead, FileStore, FileWrite};

// Public re-exports - injected services
pub use traits::{
    Clock, ContentTypeProvider, ExtensionContentTypes, FALLBACK_CONTENT_TYPE, SystemClock,
};

// Public re-exports - path translation
pub use path_resolver::{KeyResolver, SEPARATOR, combine, file_name, normalize, parent};

// Public re-exports - implementations
pub use memory::MemoryBlobClient;
pub use store::BlobFileStore;

// Public re-exports - infrastructure
pub use ext::FileStoreExt;

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::FileStoreExtJson;
