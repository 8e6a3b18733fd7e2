//! Store configuration.

use std::time::Duration;

/// Default name of the placeholder object that keeps an empty directory enumerable.
pub const DEFAULT_MARKER_NAME: &str = ".blobfs-dir";

/// Default delay between two copy-status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default number of copy-status checks before giving up (about a minute).
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 240;

/// Bounds for waiting on a server-side copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CopyPollPolicy {
    /// Delay between two status checks.
    #[cfg_attr(feature = "serde", serde(with = "duration_millis"))]
    pub interval: Duration,
    /// Maximum number of status checks. Zero is treated as one.
    pub max_attempts: u32,
}

impl Default for CopyPollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

impl CopyPollPolicy {
    /// Total time spent sleeping before a copy is given up, or `None` if
    /// that does not fit in a [`Duration`].
    ///
    /// No sleep follows the last check.
    pub fn max_wait(&self) -> Option<Duration> {
        self.interval.checked_mul(self.max_attempts.max(1) - 1)
    }
}

/// Connection and layout settings for a [`BlobFileStore`](crate::BlobFileStore).
///
/// Account and container identify where the client connects; the store only
/// carries them for diagnostics. `base_path` is applied to every key.
///
/// # Example
///
/// ```rust
/// use blobfs::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::new("devaccount", "media")
///     .with_base_path("sites/default")
///     .with_poll_interval(Duration::from_millis(100));
/// assert_eq!(config.base_path.as_deref(), Some("sites/default"));
/// assert_eq!(config.marker_name, blobfs::DEFAULT_MARKER_NAME);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreConfig {
    /// Storage account (or endpoint) identity.
    pub account: String,
    /// Container or bucket name.
    pub container: String,
    /// Optional prefix prepended to every object key.
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_path: Option<String>,
    /// Leaf name of directory marker objects.
    #[cfg_attr(feature = "serde", serde(default = "default_marker_name"))]
    pub marker_name: String,
    /// Copy-status polling bounds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub copy_poll: CopyPollPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            container: String::new(),
            base_path: None,
            marker_name: default_marker_name(),
            copy_poll: CopyPollPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Configuration for `container` in `account` with default settings.
    pub fn new(account: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
            ..Self::default()
        }
    }

    /// Set the prefix applied to every object key.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Override the directory marker name.
    pub fn with_marker_name(mut self, marker_name: impl Into<String>) -> Self {
        self.marker_name = marker_name.into();
        self
    }

    /// Override the delay between copy-status checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.copy_poll.interval = interval;
        self
    }

    /// Override the maximum number of copy-status checks.
    pub fn with_max_poll_attempts(mut self, max_attempts: u32) -> Self {
        self.copy_poll.max_attempts = max_attempts;
        self
    }
}

fn default_marker_name() -> String {
    DEFAULT_MARKER_NAME.to_owned()
}

#[cfg(feature = "serde")]
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
