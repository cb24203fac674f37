//! Download request and calling session.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ports::{ChatNotifier, DownloadListener};

/// Identity of the chat session that asked for a download.
///
/// The status registry is keyed by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the downloaded content will be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    /// Deliver directly to the chat instead of mirroring to cloud storage.
    pub is_leech: bool,
    /// Archive the download before delivery.
    pub is_zip: bool,
    /// Extract the downloaded archive before delivery.
    pub should_extract: bool,
}

impl SessionFlags {
    /// Whether the post-download step rewrites the content as an archive op.
    #[must_use]
    pub const fn is_archive_op(self) -> bool {
        self.is_zip || self.should_extract
    }
}

/// The calling session: its identity, flags and callbacks.
#[derive(Clone)]
pub struct DownloadSession {
    pub id: SessionId,
    pub flags: SessionFlags,
    /// Task callbacks (start, completion, error).
    pub listener: Arc<dyn DownloadListener>,
    /// Chat messaging for this session.
    pub notifier: Arc<dyn ChatNotifier>,
}

impl fmt::Debug for DownloadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadSession")
            .field("id", &self.id)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// One download invocation.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Public file link or folder/shared link.
    pub link: String,
    /// Target directory on the local filesystem.
    pub path: PathBuf,
    /// Caller-supplied display name; the remote node name is used otherwise.
    pub name: Option<String>,
    pub session: DownloadSession,
}
