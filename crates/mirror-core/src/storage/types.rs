//! Plain data types mirrored from the remote-storage SDK.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a remote file or folder in the provider's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteNode {
    /// Opaque provider handle.
    pub handle: u64,
    /// Display name of the node.
    pub name: String,
    /// Whether this node is a folder.
    pub is_folder: bool,
}

impl RemoteNode {
    /// Create a file node.
    pub fn file(handle: u64, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            is_folder: false,
        }
    }

    /// Create a folder node.
    pub fn folder(handle: u64, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            is_folder: true,
        }
    }
}

/// Kind of request a `RequestFinished` event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Account or folder login.
    Login,
    /// Node tree fetch, chained after a successful login.
    FetchNodes,
    /// Public (single file) link resolution.
    GetPublicNode,
    /// Any other request the SDK reports.
    Other,
}

impl RequestKind {
    /// Whether a successful request of this kind is an intermediate step.
    ///
    /// Login only starts the chain; the step terminates when the chained
    /// node fetch finishes, so a bare login success must not release the
    /// waiting caller.
    #[must_use]
    pub const fn is_chained(self) -> bool {
        matches!(self, Self::Login)
    }
}

/// Transfer state codes reported by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferState {
    None,
    Queued,
    Active,
    Paused,
    Retrying,
    Completing,
    Completed,
    Cancelled,
    Failed,
    /// A code this crate does not know about.
    Unknown(i32),
}

impl TransferState {
    /// Map a raw SDK state code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Queued,
            2 => Self::Active,
            3 => Self::Paused,
            4 => Self::Retrying,
            5 => Self::Completing,
            6 => Self::Completed,
            7 => Self::Cancelled,
            8 => Self::Failed,
            other => Self::Unknown(other),
        }
    }

    /// Raw SDK state code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Queued => 1,
            Self::Active => 2,
            Self::Paused => 3,
            Self::Retrying => 4,
            Self::Completing => 5,
            Self::Completed => 6,
            Self::Cancelled => 7,
            Self::Failed => 8,
            Self::Unknown(code) => code,
        }
    }

    /// Temporary errors in these states must not break the transfer queue.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Queued | Self::Retrying)
    }
}

/// Snapshot of a transfer as reported alongside transfer events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInfo {
    /// SDK transfer tag, used to cancel this transfer.
    pub tag: u64,
    /// File name of the transfer (folder name for folder transfers).
    pub file_name: String,
    /// Whether this is the top-level folder transfer.
    pub is_folder: bool,
    /// Whether the SDK considers the transfer finished.
    pub is_finished: bool,
    /// Current state of the transfer.
    pub state: TransferState,
    /// Bytes transferred so far.
    pub transferred_bytes: u64,
    /// Current speed in bytes per second.
    pub speed: u64,
}

impl TransferInfo {
    /// Create an active transfer snapshot with no progress.
    pub fn new(tag: u64, file_name: impl Into<String>) -> Self {
        Self {
            tag,
            file_name: file_name.into(),
            is_folder: false,
            is_finished: false,
            state: TransferState::Active,
            transferred_bytes: 0,
            speed: 0,
        }
    }

    /// Mark this snapshot as the folder transfer.
    #[must_use]
    pub const fn folder(mut self) -> Self {
        self.is_folder = true;
        self
    }

    /// Set the progress counters.
    #[must_use]
    pub const fn with_progress(mut self, transferred_bytes: u64, speed: u64) -> Self {
        self.transferred_bytes = transferred_bytes;
        self.speed = speed;
        self
    }

    /// Set the transfer state.
    #[must_use]
    pub const fn with_state(mut self, state: TransferState) -> Self {
        self.state = state;
        self
    }

    /// Mark the transfer as finished.
    #[must_use]
    pub const fn finished(mut self) -> Self {
        self.is_finished = true;
        self.state = TransferState::Completed;
        self
    }
}

/// Error value reported by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Provider error code.
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}
