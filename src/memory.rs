//! # In-Memory Client
//!
//! [`MemoryBlobClient`] keeps objects in a sorted map and implements the
//! whole [`BlobClient`](crate::BlobClient) contract, including the parts a
//! real service makes awkward to test: asynchronous copies that stay pending
//! for a while, copies that end in failure, snapshots, and failing deletes.

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use parking_lot::RwLock;

use crate::{
    BackendError, BlobList, BlobRead, BlobWrite, ByteStream, CopyState, CopyStatus, ListItem,
    ObjectProperties,
};

#[derive(Debug, Clone)]
struct StoredBlob {
    data: Bytes,
    properties: ObjectProperties,
    snapshots: usize,
    /// Property reads left before a pending copy settles.
    pending_reads: u32,
    /// Where a pending copy settles.
    outcome: CopyState,
}

#[derive(Debug, Default)]
struct CopyBehavior {
    latency: u32,
    next_failure: Option<CopyState>,
}

/// An object-storage client that lives entirely in process memory.
///
/// Keys are opaque strings; nothing here knows about directories.
///
/// # Thread Safety
///
/// State sits behind `parking_lot` locks that are never held across an
/// `.await`, so one client can be shared by concurrent tasks.
///
/// # Example
///
/// ```rust
/// use blobfs::{BlobRead, MemoryBlobClient};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let client = MemoryBlobClient::new();
/// client.insert("docs/a.txt", "hello");
/// assert!(client.exists("docs/a.txt").await.unwrap());
/// assert!(!client.exists("docs").await.unwrap());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryBlobClient {
    blobs: RwLock<BTreeMap<String, StoredBlob>>,
    copies: RwLock<CopyBehavior>,
    failing_deletes: RwLock<HashSet<String>>,
    calls: AtomicUsize,
}

impl MemoryBlobClient {
    /// Create an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` at `key` directly, bypassing the call counter.
    pub fn insert(&self, key: &str, data: impl Into<Bytes>) {
        let data = data.into();
        self.blobs
            .write()
            .insert(key.to_owned(), blob(data, "application/octet-stream".into()));
    }

    /// Content of the object at `key`.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.blobs.read().get(key).map(|b| b.data.clone())
    }

    /// Content type recorded for the object at `key`.
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.blobs
            .read()
            .get(key)
            .map(|b| b.properties.content_type.clone())
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.blobs.read().keys().cloned().collect()
    }

    /// Take a snapshot of the object at `key`. Returns `false` if it does not exist.
    ///
    /// Objects with snapshots can only be deleted with `include_snapshots`.
    pub fn create_snapshot(&self, key: &str) -> bool {
        match self.blobs.write().get_mut(key) {
            Some(blob) => {
                blob.snapshots += 1;
                true
            }
            None => false,
        }
    }

    /// Number of snapshots of the object at `key`.
    pub fn snapshot_count(&self, key: &str) -> usize {
        self.blobs.read().get(key).map_or(0, |b| b.snapshots)
    }

    /// Make subsequent copies report `pending` for `reads` property reads of
    /// the destination before settling.
    pub fn set_copy_latency(&self, reads: u32) {
        self.copies.write().latency = reads;
    }

    /// Make the next copy settle in `status` instead of success.
    pub fn fail_next_copy(&self, status: CopyStatus, description: impl Into<String>) {
        self.copies.write().next_failure = Some(CopyState {
            status,
            description: description.into(),
        });
    }

    /// Make every delete of `key` fail with a server error.
    pub fn fail_delete_of(&self, key: &str) {
        self.failing_deletes.write().insert(key.to_owned());
    }

    /// Number of client calls made through the backend traits.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn scan(&self, prefix: &str, delimiter: Option<char>) -> Vec<Result<ListItem, BackendError>> {
        let blobs = self.blobs.read();
        let mut items = Vec::new();
        let mut last_prefix: Option<String> = None;

        for (key, blob) in blobs.range::<str, _>((Bound::Included(prefix), Bound::Unbounded)) {
            let Some(rest) = key.strip_prefix(prefix) else {
                break;
            };
            let split = delimiter.and_then(|d| rest.find(d).map(|i| i + d.len_utf8()));
            match split {
                Some(end) => {
                    let common = format!("{prefix}{}", &rest[..end]);
                    if last_prefix.as_deref() != Some(common.as_str()) {
                        items.push(Ok(ListItem::Prefix(common.clone())));
                        last_prefix = Some(common);
                    }
                }
                None => items.push(Ok(ListItem::Object {
                    key: key.clone(),
                    properties: blob.properties.clone(),
                })),
            }
        }
        items
    }
}

fn blob(data: Bytes, content_type: String) -> StoredBlob {
    StoredBlob {
        properties: ObjectProperties {
            size: data.len() as u64,
            last_modified: SystemTime::now(),
            content_type,
            copy: None,
        },
        data,
        snapshots: 0,
        pending_reads: 0,
        outcome: CopyState {
            status: CopyStatus::Success,
            description: String::new(),
        },
    }
}

#[async_trait]
impl BlobRead for MemoryBlobClient {
    async fn exists(&self, key: &str) -> Result<bool, BackendError> {
        self.record_call();
        Ok(self.blobs.read().contains_key(key))
    }

    async fn properties(&self, key: &str) -> Result<Option<ObjectProperties>, BackendError> {
        self.record_call();
        let mut blobs = self.blobs.write();
        let Some(blob) = blobs.get_mut(key) else {
            return Ok(None);
        };
        if blob.pending_reads > 0 {
            blob.pending_reads -= 1;
        } else if matches!(&blob.properties.copy, Some(c) if c.status == CopyStatus::Pending) {
            blob.properties.copy = Some(blob.outcome.clone());
        }
        Ok(Some(blob.properties.clone()))
    }

    async fn download(&self, key: &str) -> Result<ByteStream, BackendError> {
        self.record_call();
        let data = self
            .get(key)
            .ok_or_else(|| BackendError::not_found(key))?;
        Ok(stream::once(async move { Ok(data) }).boxed())
    }
}

#[async_trait]
impl BlobWrite for MemoryBlobClient {
    async fn upload(
        &self,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> Result<(), BackendError> {
        self.record_call();
        let data = body
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?
            .freeze();

        let mut blobs = self.blobs.write();
        let snapshots = blobs.get(key).map_or(0, |b| b.snapshots);
        let mut stored = blob(data, content_type.to_owned());
        stored.snapshots = snapshots;
        blobs.insert(key.to_owned(), stored);
        Ok(())
    }

    async fn delete_if_exists(
        &self,
        key: &str,
        include_snapshots: bool,
    ) -> Result<bool, BackendError> {
        self.record_call();
        if self.failing_deletes.read().contains(key) {
            return Err(BackendError::new(500, format!("injected delete failure: {key}")));
        }

        let mut blobs = self.blobs.write();
        match blobs.get(key) {
            None => Ok(false),
            Some(b) if b.snapshots > 0 && !include_snapshots => Err(BackendError::conflict(
                format!("{key} has snapshots; include them to delete"),
            )),
            Some(_) => {
                blobs.remove(key);
                Ok(true)
            }
        }
    }

    async fn start_copy(
        &self,
        source_key: &str,
        destination_key: &str,
    ) -> Result<(), BackendError> {
        self.record_call();
        let (latency, failure) = {
            let mut copies = self.copies.write();
            (copies.latency, copies.next_failure.take())
        };

        let mut blobs = self.blobs.write();
        let source = blobs
            .get(source_key)
            .ok_or_else(|| BackendError::not_found(source_key))?;

        let mut copy = blob(source.data.clone(), source.properties.content_type.clone());
        if let Some(failure) = failure {
            copy.outcome = failure;
        }
        copy.pending_reads = latency;
        copy.properties.copy = Some(if latency > 0 {
            CopyState {
                status: CopyStatus::Pending,
                description: String::new(),
            }
        } else {
            copy.outcome.clone()
        });
        blobs.insert(destination_key.to_owned(), copy);
        Ok(())
    }
}

impl BlobList for MemoryBlobClient {
    fn list_hierarchical(
        &self,
        prefix: &str,
        delimiter: char,
    ) -> BoxStream<'_, Result<ListItem, BackendError>> {
        self.record_call();
        stream::iter(self.scan(prefix, Some(delimiter))).boxed()
    }

    fn list_flat(&self, prefix: &str) -> BoxStream<'_, Result<ListItem, BackendError>> {
        self.record_call();
        stream::iter(self.scan(prefix, None)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(stream: BoxStream<'_, Result<ListItem, BackendError>>) -> Vec<ListItem> {
        stream.try_collect().await.unwrap()
    }

    fn keys_of(items: &[ListItem]) -> Vec<String> {
        items
            .iter()
            .map(|i| match i {
                ListItem::Prefix(p) => format!("P:{p}"),
                ListItem::Object { key, .. } => format!("O:{key}"),
            })
            .collect()
    }

    fn seeded() -> MemoryBlobClient {
        let client = MemoryBlobClient::new();
        for key in ["a.txt", "b/1.txt", "b/2.txt", "b/c/3.txt", "b.txt", "bz/4.txt"] {
            client.insert(key, "x");
        }
        client
    }

    #[tokio::test]
    async fn hierarchical_listing_groups_common_prefixes() {
        let client = seeded();
        let root = collect(client.list_hierarchical("", '/')).await;
        assert_eq!(keys_of(&root), vec!["O:a.txt", "P:b/", "O:b.txt", "P:bz/"]);

        let b = collect(client.list_hierarchical("b/", '/')).await;
        assert_eq!(keys_of(&b), vec!["O:b/1.txt", "O:b/2.txt", "P:b/c/"]);
    }

    #[tokio::test]
    async fn flat_listing_is_recursive() {
        let client = seeded();
        let b = collect(client.list_flat("b/")).await;
        assert_eq!(keys_of(&b), vec!["O:b/1.txt", "O:b/2.txt", "O:b/c/3.txt"]);
    }

    #[tokio::test]
    async fn upload_and_download() {
        let client = MemoryBlobClient::new();
        let body = stream::iter(vec![Ok(Bytes::from("he")), Ok(Bytes::from("llo"))]).boxed();
        client.upload("k", body, "text/plain").await.unwrap();

        let props = client.properties("k").await.unwrap().unwrap();
        assert_eq!(props.size, 5);
        assert_eq!(props.content_type, "text/plain");

        let chunks: Vec<Bytes> = client.download("k").await.unwrap().try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"hello");
    }

    #[tokio::test]
    async fn download_missing_is_404() {
        let client = MemoryBlobClient::new();
        let err = client.download("missing").await.err().unwrap();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn snapshots_block_plain_delete() {
        let client = seeded();
        assert!(client.create_snapshot("a.txt"));
        assert_eq!(client.snapshot_count("a.txt"), 1);

        let err = client.delete_if_exists("a.txt", false).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(client.delete_if_exists("a.txt", true).await.unwrap());
        assert!(!client.delete_if_exists("a.txt", true).await.unwrap());
    }

    #[tokio::test]
    async fn pending_copy_settles_after_latency() {
        let client = seeded();
        client.set_copy_latency(2);
        client.start_copy("a.txt", "copy.txt").await.unwrap();

        let status = |p: Option<ObjectProperties>| p.unwrap().copy.unwrap().status;
        assert_eq!(status(client.properties("copy.txt").await.unwrap()), CopyStatus::Pending);
        assert_eq!(status(client.properties("copy.txt").await.unwrap()), CopyStatus::Pending);
        assert_eq!(status(client.properties("copy.txt").await.unwrap()), CopyStatus::Success);
        assert_eq!(client.get("copy.txt").unwrap(), "x");
    }

    #[tokio::test]
    async fn injected_copy_failure_applies_once() {
        let client = seeded();
        client.fail_next_copy(CopyStatus::Failed, "quota");
        client.start_copy("a.txt", "c1").await.unwrap();
        client.start_copy("a.txt", "c2").await.unwrap();

        let c1 = client.properties("c1").await.unwrap().unwrap().copy.unwrap();
        assert_eq!(c1.status, CopyStatus::Failed);
        assert_eq!(c1.description, "quota");
        let c2 = client.properties("c2").await.unwrap().unwrap().copy.unwrap();
        assert_eq!(c2.status, CopyStatus::Success);
    }

    #[tokio::test]
    async fn copy_of_missing_source_fails() {
        let client = MemoryBlobClient::new();
        let err = client.start_copy("nope", "dst").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn calls_are_counted() {
        let client = MemoryBlobClient::new();
        client.insert("k", "v");
        assert_eq!(client.calls(), 0);
        client.exists("k").await.unwrap();
        let _ = client.list_flat("");
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryBlobClient>();
    }
}
