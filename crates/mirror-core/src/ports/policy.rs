//! Policy collaborators consulted before a transfer starts.

use crate::download::DuplicateMatch;

/// Searches the mirror destination for an existing copy.
pub trait DuplicateSearch: Send + Sync {
    fn find_duplicate(&self, name: &str, is_folder: bool) -> Option<DuplicateMatch>;
}

/// Decides whether there is room for a download.
pub trait QuotaChecker: Send + Sync {
    /// `true` when downloading `size` bytes keeps the configured free space.
    ///
    /// Archive operations need room for the archive as well as the content.
    fn check_storage_threshold(&self, size: u64, is_archive_op: bool) -> bool;
}
