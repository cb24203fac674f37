//! Download error types.
//!
//! Every fatal path of a download attempt ends in one of these variants.
//! They are serializable and hold no foreign error types; SDK errors are
//! captured as their message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal error for a download attempt.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// Login or credential failure.
    #[error("Authentication failed: {message}")]
    Auth {
        /// Detailed error message.
        message: String,
    },

    /// Bad or expired link, or permission denied.
    #[error("Could not resolve link: {message}")]
    Resolve {
        /// Detailed error message.
        message: String,
    },

    /// The transfer failed after it started.
    #[error("Transfer failed: {message}")]
    TransferFailed {
        /// Detailed error message.
        message: String,
    },

    /// The attempt was cancelled by the user.
    #[error("Download cancelled")]
    Cancelled,

    /// A single-flight step did not finish within the configured bound.
    #[error("No response from storage after {after_secs}s")]
    Timeout {
        /// The bound that elapsed, in seconds.
        after_secs: u64,
    },

    /// I/O error preparing the target directory.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error.
        kind: String,
        /// Detailed error message.
        message: String,
    },
}

impl DownloadError {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a resolution error.
    pub fn resolve(message: impl Into<String>) -> Self {
        Self::Resolve {
            message: message.into(),
        }
    }

    /// Create a transfer failure.
    pub fn transfer_failed(message: impl Into<String>) -> Self {
        Self::TransferFailed {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub const fn timeout(after_secs: u64) -> Self {
        Self::Timeout { after_secs }
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Text sent to the chat when this error ends an attempt.
    ///
    /// SDK errors are shown as the SDK worded them.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth { message }
            | Self::Resolve { message }
            | Self::TransferFailed { message } => message.clone(),
            Self::Cancelled => "Download Canceled by user".to_string(),
            Self::Timeout { after_secs } => {
                format!("Storage did not respond within {after_secs}s, try again later.")
            }
            Self::Io { message, .. } => format!("Could not prepare download directory: {message}"),
        }
    }
}
