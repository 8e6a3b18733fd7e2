//! # Extension Traits
//!
//! Convenience methods for file stores.
//!
//! ## Overview
//!
//! [`FileStoreExt`] provides commonly-needed utility methods that aren't part
//! of the core traits. They are default methods with a blanket
//! implementation, so every [`FileStore`] gets them for free.
//!
//! ## Available Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`exists`](FileStoreExt::exists) | Check if a file or directory lives at a path |
//! | [`is_file`](FileStoreExt::is_file) | Check if path is a file |
//! | [`is_dir`](FileStoreExt::is_dir) | Check if path is a directory |
//! | [`file_size`](FileStoreExt::file_size) | Size of a file in bytes |
//! | [`read`](FileStoreExt::read) | Buffer a whole file |
//! | [`read_to_string`](FileStoreExt::read_to_string) | Buffer a whole file as UTF-8 |
//! | [`write`](FileStoreExt::write) | Upload a buffer |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, `read_json` and `write_json` are
//! available through `FileStoreExtJson`.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{StreamExt, TryStreamExt, stream};

use crate::{FileStore, StoreError};

/// Extension methods for any file store.
///
/// # Example
///
/// ```rust
/// use blobfs::{FileStore, FileStoreExt, StoreError};
///
/// async fn load_settings(store: &dyn FileStore) -> Result<Option<String>, StoreError> {
///     if !store.is_file("settings.toml").await? {
///         return Ok(None);
///     }
///     store.read_to_string("settings.toml").await.map(Some)
/// }
/// ```
#[async_trait]
pub trait FileStoreExt: FileStore {
    /// Check if a file or a directory lives at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.is_file(path).await? || self.is_dir(path).await?)
    }

    /// Check if the path points to a file.
    ///
    /// Returns `Ok(false)` if nothing is there.
    async fn is_file(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.get_file(path).await?.is_some())
    }

    /// Check if the path points to a directory.
    ///
    /// Returns `Ok(false)` if nothing is there.
    async fn is_dir(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.get_directory_info(path).await?.is_some())
    }

    /// Get the size of a file in bytes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no file exists at `path`.
    async fn file_size(&self, path: &str) -> Result<u64, StoreError> {
        match self.get_file(path).await? {
            Some(file) => Ok(file.size),
            None => Err(StoreError::NotFound {
                path: path.to_owned(),
            }),
        }
    }

    /// Read the whole file into memory.
    async fn read(&self, path: &str) -> Result<Bytes, StoreError> {
        let body = self.open_read_stream(path).await?;
        let data = body
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .map_err(|e| StoreError::backend("read", path, e))?;
        Ok(data.freeze())
    }

    /// Read the whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidData` if the content is not UTF-8.
    async fn read_to_string(&self, path: &str) -> Result<String, StoreError> {
        let data = self.read(path).await?;
        String::from_utf8(data.to_vec()).map_err(|e| StoreError::InvalidData {
            path: path.to_owned(),
            details: e.to_string(),
        })
    }

    /// Upload `data` as a single chunk.
    ///
    /// Returns the normalized path that was written.
    async fn write(&self, path: &str, data: Bytes, overwrite: bool) -> Result<String, StoreError> {
        let body = stream::once(async move { Ok(data) }).boxed();
        self.create_file(path, body, overwrite).await
    }
}

// Blanket implementation - any FileStore gets FileStoreExt for free
impl<S: FileStore + ?Sized> FileStoreExt for S {}

// =============================================================================
// JSON Support (Feature-Gated)
// =============================================================================

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON serialization extension methods.
    ///
    /// Available when the `serde` feature is enabled.
    #[async_trait]
    pub trait FileStoreExtJson: FileStore {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `StoreError::NotFound`: file doesn't exist
        /// - `StoreError::InvalidData`: file isn't valid UTF-8
        /// - `StoreError::Deserialization`: JSON parsing failed
        async fn read_json<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T, StoreError> {
            let data = self.read_to_string(path).await?;
            serde_json::from_str(&data).map_err(|e| StoreError::Deserialization(e.to_string()))
        }

        /// Serialize a value and write it as pretty-printed JSON, replacing
        /// any existing file.
        async fn write_json<T: Serialize + Sync>(
            &self,
            path: &str,
            value: &T,
        ) -> Result<String, StoreError> {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            self.write(path, Bytes::from(json), true).await
        }
    }

    impl<S: FileStore + ?Sized> FileStoreExtJson for S {}
}

#[cfg(feature = "serde")]
pub use json::FileStoreExtJson;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{BlobFileStore, FileDir, MemoryBlobClient, StoreConfig};

    fn store() -> BlobFileStore<MemoryBlobClient> {
        BlobFileStore::new(
            Arc::new(MemoryBlobClient::new()),
            StoreConfig::new("acct", "container"),
        )
    }

    #[tokio::test]
    async fn is_file_and_is_dir() {
        let store = store();
        store.client().insert("dir/test.txt", "hello");

        assert!(store.is_file("dir/test.txt").await.unwrap());
        assert!(!store.is_file("dir").await.unwrap());
        assert!(store.is_dir("dir").await.unwrap());
        assert!(!store.is_dir("dir/test.txt").await.unwrap());
        assert!(!store.is_file("missing").await.unwrap());
        assert!(!store.is_dir("missing").await.unwrap());
    }

    #[tokio::test]
    async fn exists_covers_files_and_directories() {
        let store = store();
        store.create_directory("empty").await.unwrap();
        store.client().insert("a.txt", "x");

        assert!(store.exists("empty").await.unwrap());
        assert!(store.exists("a.txt").await.unwrap());
        assert!(store.exists("").await.unwrap());
        assert!(!store.exists("b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn file_size_returns_size() {
        let store = store();
        store.client().insert("a.txt", "12345");
        assert_eq!(store.file_size("a.txt").await.unwrap(), 5);

        let err = store.file_size("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn write_then_read() {
        let store = store();
        let path = store
            .write("/notes/today.txt", Bytes::from("remember"), false)
            .await
            .unwrap();
        assert_eq!(path, "notes/today.txt");
        assert_eq!(store.read("notes/today.txt").await.unwrap(), "remember");
        assert_eq!(store.read_to_string("notes/today.txt").await.unwrap(), "remember");
    }

    #[tokio::test]
    async fn read_to_string_rejects_invalid_utf8() {
        let store = store();
        store.client().insert("bin", vec![0xffu8, 0xfe]);
        let err = store.read_to_string("bin").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData { ref path, .. } if path == "bin"));
    }

    #[tokio::test]
    async fn ext_available_on_dyn_store() {
        let store = store();
        store.client().insert("a.txt", "x");
        let store: &dyn FileStore = &store;
        assert!(store.is_file("a.txt").await.unwrap());
    }

    #[cfg(feature = "serde")]
    #[tokio::test]
    async fn json_round_trip() {
        let store = store();
        let value = serde_json::json!({ "name": "blobfs", "tags": ["a", "b"] });
        store.write_json("config.json", &value).await.unwrap();

        let back: serde_json::Value = store.read_json("config.json").await.unwrap();
        assert_eq!(back, value);
        assert_eq!(
            store.client().content_type("config.json").as_deref(),
            Some("application/json")
        );
    }

    #[cfg(feature = "serde")]
    #[tokio::test]
    async fn read_json_reports_parse_errors() {
        let store = store();
        store.client().insert("bad.json", "{ nope");
        let err = store
            .read_json::<serde_json::Value>("bad.json")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }
}
