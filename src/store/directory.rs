//! Directory emulation.
//!
//! A directory exists while at least one object lives under its prefix.
//! Empty directories are kept alive by a marker object.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use super::BlobFileStore;
use crate::path_resolver::SEPARATOR;
use crate::{
    BlobClient, DirectoryEntry, Entry, FALLBACK_CONTENT_TYPE, FileDir, ListItem, ListOptions,
    StoreError, normalize,
};

#[async_trait]
impl<C: BlobClient + ?Sized> FileDir for BlobFileStore<C> {
    async fn get_directory_info(&self, path: &str) -> Result<Option<DirectoryEntry>, StoreError> {
        let path = normalize(path);
        if path.is_empty() {
            return Ok(Some(self.directory_entry(&path)));
        }

        let prefix = self.keys.to_prefix(&path);
        debug!(%path, %prefix, "probing directory");
        let first = self
            .client
            .list_hierarchical(&prefix, SEPARATOR)
            .try_next()
            .await
            .map_err(|e| StoreError::backend("get_directory_info", &path, e))?;

        Ok(first.map(|_| self.directory_entry(&path)))
    }

    async fn list_directory(
        &self,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<Entry>, StoreError> {
        self.list_entries(path, options).await
    }

    async fn create_directory(&self, path: &str) -> Result<(), StoreError> {
        let path = normalize(path);
        if path.is_empty() {
            return Ok(());
        }

        let key = self.keys.to_object_key(&path);
        let occupied = self
            .client
            .exists(&key)
            .await
            .map_err(|e| StoreError::backend("create_directory", &path, e))?;
        if occupied {
            return Err(StoreError::Conflict { path });
        }

        let marker_key = self.keys.to_object_key(&self.marker_path(&path));
        debug!(%path, key = %marker_key, "writing directory marker");
        let body = stream::once(async { Ok(Bytes::new()) }).boxed();
        self.client
            .upload(&marker_key, body, FALLBACK_CONTENT_TYPE)
            .await
            .map_err(|e| StoreError::backend("create_directory", &path, e))
    }

    async fn delete_directory(&self, path: &str) -> Result<bool, StoreError> {
        let path = normalize(path);
        if path.is_empty() {
            return Err(StoreError::RootViolation {
                operation: "delete_directory",
            });
        }

        let prefix = self.keys.to_prefix(&path);
        let mut listing = self.client.list_flat(&prefix);
        let mut deleted = 0usize;
        while let Some(item) = listing
            .try_next()
            .await
            .map_err(|e| StoreError::backend("delete_directory", &path, e))?
        {
            let ListItem::Object { key, .. } = item else {
                continue;
            };
            if self
                .client
                .delete_if_exists(&key, true)
                .await
                .map_err(|e| StoreError::backend("delete_directory", &key, e))?
            {
                deleted += 1;
            }
        }

        info!(%path, deleted, "deleted directory");
        Ok(deleted > 0)
    }
}
