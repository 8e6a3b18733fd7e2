//! Transfer engine: single-file reads, uploads, deletes, copies and moves.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::BlobFileStore;
use crate::{
    BlobClient, ByteStream, CopyState, CopyStatus, FALLBACK_CONTENT_TYPE, FileEntry, FileRead,
    FileWrite, StoreError, normalize,
};

#[async_trait]
impl<C: BlobClient + ?Sized> FileRead for BlobFileStore<C> {
    async fn get_file(&self, path: &str) -> Result<Option<FileEntry>, StoreError> {
        let path = normalize(path);
        if path.is_empty() {
            return Ok(None);
        }

        let key = self.keys.to_object_key(&path);
        let exists = self
            .client
            .exists(&key)
            .await
            .map_err(|e| StoreError::backend("get_file", &path, e))?;
        if !exists {
            return Ok(None);
        }

        let properties = self
            .client
            .properties(&key)
            .await
            .map_err(|e| StoreError::backend("get_file", &path, e))?;
        Ok(properties.map(|p| Self::file_entry(path, p)))
    }

    async fn open_read_stream(&self, path: &str) -> Result<ByteStream, StoreError> {
        let path = normalize(path);
        if path.is_empty() {
            return Err(StoreError::NotFound { path });
        }

        let key = self.keys.to_object_key(&path);
        debug!(%path, %key, "opening read stream");
        match self.client.download(&key).await {
            Ok(stream) => Ok(stream),
            Err(e) if e.is_not_found() => Err(StoreError::NotFound { path }),
            Err(e) => Err(StoreError::backend("open_read_stream", &path, e)),
        }
    }
}

#[async_trait]
impl<C: BlobClient + ?Sized> FileWrite for BlobFileStore<C> {
    async fn create_file(
        &self,
        path: &str,
        body: ByteStream,
        overwrite: bool,
    ) -> Result<String, StoreError> {
        let path = normalize(path);
        if path.is_empty() {
            return Err(StoreError::InvalidArgument {
                operation: "create_file",
                reason: "the root path is a directory".into(),
            });
        }

        let key = self.keys.to_object_key(&path);
        if !overwrite {
            let exists = self
                .client
                .exists(&key)
                .await
                .map_err(|e| StoreError::backend("create_file", &path, e))?;
            if exists {
                return Err(StoreError::AlreadyExists {
                    path,
                    operation: "create_file",
                });
            }
        }

        let content_type = self
            .content_types
            .content_type(&path)
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_owned());
        debug!(%path, %key, %content_type, overwrite, "uploading file");
        self.client
            .upload(&key, body, &content_type)
            .await
            .map_err(|e| StoreError::backend("create_file", &path, e))?;
        Ok(path)
    }

    async fn delete_file(&self, path: &str) -> Result<bool, StoreError> {
        let path = normalize(path);
        if path.is_empty() {
            return Ok(false);
        }

        let key = self.keys.to_object_key(&path);
        debug!(%path, %key, "deleting file");
        self.client
            .delete_if_exists(&key, true)
            .await
            .map_err(|e| StoreError::backend("delete_file", &path, e))
    }

    async fn copy_file(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        let (src, dst) = (normalize(src), normalize(dst));
        if src == dst {
            return Err(StoreError::InvalidArgument {
                operation: "copy_file",
                reason: format!("source and destination are both '{src}'"),
            });
        }
        if src.is_empty() || dst.is_empty() {
            return Err(StoreError::InvalidArgument {
                operation: "copy_file",
                reason: "the root path is a directory".into(),
            });
        }

        let src_key = self.keys.to_object_key(&src);
        let dst_key = self.keys.to_object_key(&dst);

        let src_exists = self
            .client
            .exists(&src_key)
            .await
            .map_err(|e| StoreError::backend("copy_file", &src, e))?;
        if !src_exists {
            return Err(StoreError::NotFound { path: src });
        }
        let dst_exists = self
            .client
            .exists(&dst_key)
            .await
            .map_err(|e| StoreError::backend("copy_file", &dst, e))?;
        if dst_exists {
            return Err(StoreError::AlreadyExists {
                path: dst,
                operation: "copy_file",
            });
        }

        debug!(%src, %dst, "starting server-side copy");
        self.client
            .start_copy(&src_key, &dst_key)
            .await
            .map_err(|e| StoreError::backend("copy_file", &dst, e))?;
        self.wait_for_copy(&dst, &dst_key).await
    }

    async fn move_file(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        self.copy_file(src, dst).await?;
        // From here until the delete lands, both paths exist.
        self.delete_file(src).await?;
        info!(src = %normalize(src), dst = %normalize(dst), "moved file");
        Ok(())
    }
}

impl<C: BlobClient + ?Sized> BlobFileStore<C> {
    /// Poll the destination until its copy leaves the pending state, at most
    /// `max_attempts` times with `interval` between checks.
    async fn wait_for_copy(&self, path: &str, key: &str) -> Result<(), StoreError> {
        let max_attempts = self.poll.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let properties = self
                .client
                .properties(key)
                .await
                .map_err(|e| StoreError::backend("copy_file", path, e))?;
            let Some(properties) = properties else {
                warn!(%path, "copy destination disappeared");
                return Err(StoreError::CopyFailed {
                    path: path.to_owned(),
                    status: CopyStatus::Failed,
                    description: "destination disappeared while copying".into(),
                });
            };

            match properties.copy {
                // Backends that copy synchronously leave no copy state behind.
                None
                | Some(CopyState {
                    status: CopyStatus::Success,
                    ..
                }) => return Ok(()),
                Some(CopyState {
                    status: CopyStatus::Pending,
                    ..
                }) => {
                    debug!(%path, attempt, max_attempts, "copy pending");
                    if attempt < max_attempts {
                        self.clock.sleep(self.poll.interval).await;
                    }
                }
                Some(CopyState {
                    status,
                    description,
                }) => {
                    warn!(%path, %status, %description, "copy did not succeed");
                    return Err(StoreError::CopyFailed {
                        path: path.to_owned(),
                        status,
                        description,
                    });
                }
            }
        }

        warn!(
            %path,
            attempts = max_attempts,
            waited = ?self.poll.max_wait(),
            "copy still pending, giving up"
        );
        Err(StoreError::Timeout {
            path: path.to_owned(),
            attempts: max_attempts,
        })
    }
}
