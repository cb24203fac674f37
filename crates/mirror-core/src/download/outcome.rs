//! Result of a download attempt.

use super::{DownloadError, PolicyAbort};

/// How an attempt ended.
///
/// The chat side effects are the real contract; this value only tells the
/// caller which of them happened.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// The transfer finished and the completion callback ran.
    Completed,
    /// The attempt failed and the user was told why.
    Failed(DownloadError),
    /// A policy check declined the download.
    Declined(PolicyAbort),
    /// The user cancelled the attempt.
    Cancelled,
}

impl DownloadOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
            Self::Declined(_) => "declined",
            Self::Cancelled => "cancelled",
        }
    }
}
