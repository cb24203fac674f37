//! Ports toward the calling chat session.

use crate::download::DuplicateMatch;

/// Task-level callbacks of the session that requested a download.
pub trait DownloadListener: Send + Sync {
    /// The transfer is registered and about to start.
    fn on_download_start(&self);

    /// The transfer finished. Called from the SDK callback context.
    ///
    /// Errors are logged by the caller and never reach the SDK.
    fn on_download_complete(&self) -> anyhow::Result<()>;

    /// The attempt failed or was cancelled. Fired at most once per attempt.
    fn on_download_error(&self, reason: &str);
}

/// Chat messaging for a session. All methods are fire-and-forget.
pub trait ChatNotifier: Send + Sync {
    /// Send a plain error or decline message.
    fn report_error(&self, text: &str);

    /// Send the duplicate-search results.
    fn report_duplicate_match(&self, text: &str, matches: &DuplicateMatch);

    /// Post (or refresh) the status message.
    fn report_status(&self);

    /// Delete the pending placeholder message shown while the link resolves.
    fn discard_placeholder(&self);
}
