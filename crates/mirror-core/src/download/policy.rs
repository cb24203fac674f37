//! Policy declines.
//!
//! A decline is not a failure: the user asked for something the bot is
//! configured not to do, so the attempt ends with an explanation and nothing
//! is logged as an error.

use serde::{Deserialize, Serialize};

use crate::utils::readable_file_size;

/// Summary of an existing copy found by the duplicate search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Search result text (one line per hit).
    pub summary: String,
    /// Links to the existing copies.
    pub links: Vec<String>,
}

/// Reason an attempt was declined before any transfer started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolicyAbort {
    /// The same file or folder already exists in the mirror destination.
    DuplicateFound {
        /// Name that was searched for.
        name: String,
        /// What the search returned.
        matches: DuplicateMatch,
    },

    /// Downloading would leave less free space than the configured threshold.
    StorageThreshold {
        /// Configured threshold in GB.
        threshold_gb: f64,
        /// Size of the remote object in bytes.
        size: u64,
    },

    /// The remote object exceeds the global size limit.
    SizeLimit {
        /// Limit in bytes.
        limit: u64,
        /// Size of the remote object in bytes.
        size: u64,
    },

    /// The remote object exceeds the leech-mode size limit.
    LeechLimit {
        /// Limit in bytes.
        limit: u64,
        /// Size of the remote object in bytes.
        size: u64,
    },
}

impl PolicyAbort {
    /// Text sent to the chat for this decline.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateFound { .. } => {
                "File/Folder is already available in Drive.\nHere are the search results:"
                    .to_string()
            }
            Self::StorageThreshold { threshold_gb, size } => format!(
                "You must leave {threshold_gb}GB free storage.\nYour File/Folder size is {}",
                readable_file_size(*size)
            ),
            Self::SizeLimit { limit, size } => format!(
                "Failed, Mega limit is {}.\nYour File/Folder size is {}.",
                readable_file_size(*limit),
                readable_file_size(*size)
            ),
            Self::LeechLimit { limit, size } => format!(
                "Leech limit is {}.\nYour File/Folder size is {}.",
                readable_file_size(*limit),
                readable_file_size(*size)
            ),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DuplicateFound { .. } => "duplicate",
            Self::StorageThreshold { .. } => "storage_threshold",
            Self::SizeLimit { .. } => "size_limit",
            Self::LeechLimit { .. } => "leech_limit",
        }
    }
}
