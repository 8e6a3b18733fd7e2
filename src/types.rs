//! Core types for the blob-backed file store.

use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::BackendError;

/// A stream of payload chunks, used for uploads and downloads.
pub type ByteStream = BoxStream<'static, Result<Bytes, BackendError>>;

/// An existing object, as observed from the backend.
///
/// Produced only by querying the backend; never persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileEntry {
    /// Store-relative path of the file.
    pub path: String,
    /// Leaf name of the file.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time reported by the backend.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub modified: SystemTime,
}

/// A directory view, synthesized on every query.
///
/// Blob storage keeps no directory metadata, so `observed` comes from the
/// store's clock at the time of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectoryEntry {
    /// Store-relative path of the directory (empty for the root).
    pub path: String,
    /// Leaf name of the directory (empty for the root).
    pub name: String,
    /// When the directory was observed.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub observed: SystemTime,
}

/// A single listing result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Entry {
    /// A sub-directory.
    Directory(DirectoryEntry),
    /// A file.
    File(FileEntry),
}

impl Entry {
    /// Store-relative path of the entry.
    pub fn path(&self) -> &str {
        match self {
            Entry::Directory(d) => &d.path,
            Entry::File(f) => &f.path,
        }
    }

    /// Leaf name of the entry.
    pub fn name(&self) -> &str {
        match self {
            Entry::Directory(d) => &d.name,
            Entry::File(f) => &f.name,
        }
    }

    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    /// Returns `true` if this is a file.
    #[inline]
    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }
}

/// Options for [`FileDir::list_directory`](crate::FileDir::list_directory).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListOptions {
    /// Expose directory marker objects as files.
    ///
    /// Markers are backend plumbing; with the default (`false`) they never
    /// appear in a listing.
    pub include_markers: bool,
    /// Descend into sub-directories.
    ///
    /// Off by default: each sub-directory is reported once and never expanded.
    pub recursive: bool,
}

impl ListOptions {
    /// Immediate children only, markers hidden.
    pub const SHALLOW: Self = Self {
        include_markers: false,
        recursive: false,
    };

    /// Whole subtree, markers hidden.
    pub const RECURSIVE: Self = Self {
        include_markers: false,
        recursive: true,
    };
}

/// State of a server-side copy, as exposed on the destination object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CopyStatus {
    /// The copy is still in flight.
    Pending,
    /// The copy completed.
    Success,
    /// The copy failed.
    Failed,
    /// The copy was aborted.
    Aborted,
}

impl CopyStatus {
    /// Returns `true` for every status except [`CopyStatus::Pending`].
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CopyStatus::Pending)
    }
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CopyStatus::Pending => "pending",
            CopyStatus::Success => "success",
            CopyStatus::Failed => "failed",
            CopyStatus::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Copy-status fields of an object that was the target of a server-side copy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyState {
    /// Current status.
    pub status: CopyStatus,
    /// Backend-provided description of the status (may be empty).
    pub description: String,
}

/// Properties of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectProperties {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub last_modified: SystemTime,
    /// MIME type recorded at upload.
    pub content_type: String,
    /// Copy state, if the object was produced by a server-side copy.
    pub copy: Option<CopyState>,
}

impl Default for ObjectProperties {
    fn default() -> Self {
        Self {
            size: 0,
            last_modified: SystemTime::UNIX_EPOCH,
            content_type: String::new(),
            copy: None,
        }
    }
}

/// A single result of a backend listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// A common prefix (hierarchical listings only). Includes the trailing delimiter.
    Prefix(String),
    /// An object stored at `key`.
    Object {
        /// Full object key.
        key: String,
        /// Object properties.
        properties: ObjectProperties,
    },
}

/// Serde support for SystemTime (when serde feature is enabled).
#[cfg(feature = "serde")]
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        (duration.as_secs(), duration.subsec_nanos()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos): (u64, u32) = Deserialize::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::new(secs, nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> Entry {
        Entry::File(FileEntry {
            path: path.into(),
            name: path.rsplit('/').next().unwrap_or(path).into(),
            size: 3,
            modified: SystemTime::UNIX_EPOCH,
        })
    }

    #[test]
    fn entry_accessors() {
        let e = file("docs/a.txt");
        assert!(e.is_file());
        assert!(!e.is_dir());
        assert_eq!(e.path(), "docs/a.txt");
        assert_eq!(e.name(), "a.txt");

        let d = Entry::Directory(DirectoryEntry {
            path: "docs/sub".into(),
            name: "sub".into(),
            observed: SystemTime::UNIX_EPOCH,
        });
        assert!(d.is_dir());
        assert_eq!(d.name(), "sub");
    }

    #[test]
    fn list_options_default_is_shallow() {
        assert_eq!(ListOptions::default(), ListOptions::SHALLOW);
        assert!(!ListOptions::default().include_markers);
        assert!(ListOptions::RECURSIVE.recursive);
    }

    #[test]
    fn copy_status_terminal() {
        assert!(!CopyStatus::Pending.is_terminal());
        assert!(CopyStatus::Success.is_terminal());
        assert!(CopyStatus::Failed.is_terminal());
        assert!(CopyStatus::Aborted.is_terminal());
    }

    #[test]
    fn copy_status_display() {
        assert_eq!(CopyStatus::Pending.to_string(), "pending");
        assert_eq!(CopyStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FileEntry>();
        assert_send_sync::<DirectoryEntry>();
        assert_send_sync::<Entry>();
        assert_send_sync::<ListOptions>();
        assert_send_sync::<ObjectProperties>();
        assert_send_sync::<ListItem>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn file_entry_serde_roundtrip() {
        let entry = FileEntry {
            path: "a/b.txt".into(),
            name: "b.txt".into(),
            size: 10,
            modified: SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(42),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: FileEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
