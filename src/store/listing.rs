//! Listing engine.

use std::collections::BTreeSet;

use futures::TryStreamExt;
use tracing::debug;

use super::BlobFileStore;
use crate::path_resolver::{SEPARATOR, unescape_segment};
use crate::{
    BlobClient, Entry, ListItem, ListOptions, StoreError, combine, file_name, normalize, parent,
};

impl<C: BlobClient + ?Sized> BlobFileStore<C> {
    /// Directories first, then files, each group in backend order.
    pub(super) async fn list_entries(
        &self,
        path: &str,
        options: ListOptions,
    ) -> Result<Vec<Entry>, StoreError> {
        let path = normalize(path);
        let prefix = self.keys.to_prefix(&path);
        debug!(%path, %prefix, recursive = options.recursive, "listing directory");

        let (mut entries, files) = if options.recursive {
            self.list_subtree(&path, &prefix, options).await?
        } else {
            self.list_children(&path, &prefix, options).await?
        };
        entries.extend(files);
        Ok(entries)
    }

    async fn list_children(
        &self,
        path: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<(Vec<Entry>, Vec<Entry>), StoreError> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        let mut listing = self.client.list_hierarchical(prefix, SEPARATOR);

        while let Some(item) = listing
            .try_next()
            .await
            .map_err(|e| StoreError::backend("list_directory", path, e))?
        {
            match item {
                ListItem::Prefix(sub) => {
                    let sub = self.keys.to_store_path(&sub);
                    dirs.push(Entry::Directory(self.directory_entry(&sub)));
                }
                ListItem::Object { key, properties } => {
                    let leaf = unescape_segment(key.strip_prefix(prefix).unwrap_or(&key));
                    if leaf.is_empty() || self.hides(&leaf, options) {
                        continue;
                    }
                    files.push(Entry::File(Self::file_entry(
                        combine(path, &leaf),
                        properties,
                    )));
                }
            }
        }
        Ok((dirs, files))
    }

    /// Walks the flat listing; every intermediate prefix becomes a directory.
    async fn list_subtree(
        &self,
        path: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<(Vec<Entry>, Vec<Entry>), StoreError> {
        let mut seen = BTreeSet::new();
        let mut files = Vec::new();
        let mut listing = self.client.list_flat(prefix);

        while let Some(item) = listing
            .try_next()
            .await
            .map_err(|e| StoreError::backend("list_directory", path, e))?
        {
            let ListItem::Object { key, properties } = item else {
                continue;
            };
            let relative = key
                .strip_prefix(prefix)
                .unwrap_or(&key)
                .split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(unescape_segment)
                .collect::<Vec<_>>()
                .join("/");
            if relative.is_empty() {
                continue;
            }

            let mut dir = relative.as_str();
            while let Some(up) = parent(dir).filter(|p| !p.is_empty()) {
                seen.insert(up.to_owned());
                dir = up;
            }

            if self.hides(file_name(&relative), options) {
                continue;
            }
            files.push(Entry::File(Self::file_entry(
                combine(path, &relative),
                properties,
            )));
        }

        let dirs = seen
            .iter()
            .map(|d| Entry::Directory(self.directory_entry(&combine(path, d))))
            .collect();
        Ok((dirs, files))
    }

    fn hides(&self, leaf: &str, options: ListOptions) -> bool {
        !options.include_markers && leaf == self.marker_name
    }
}
