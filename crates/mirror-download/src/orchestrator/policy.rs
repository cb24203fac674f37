//! Pre-transfer policy checks.
//!
//! Evaluated in a fixed order and short-circuiting on the first decline:
//! duplicate search, storage threshold, global size limit, leech limit.

use mirror_core::{
    DuplicateSearch, MirrorSettings, PolicyAbort, QuotaChecker, RemoteNode, SessionFlags,
    duplicate_candidate_name,
};

/// Look for an existing copy of what this download will produce.
///
/// Only runs when dedup is enabled and the content is mirrored (leech
/// downloads go to the chat, so there is nothing to compare against).
pub fn check_duplicate(
    settings: &MirrorSettings,
    search: &dyn DuplicateSearch,
    name: &str,
    node: &RemoteNode,
    flags: SessionFlags,
) -> Option<PolicyAbort> {
    if !settings.is_dedup_enabled() || flags.is_leech {
        return None;
    }

    tracing::info!(name = %name, "Checking if File/Folder is already in Drive");
    let Some(candidate) = duplicate_candidate_name(name, flags) else {
        tracing::debug!(name = %name, "Not an extractable archive, skipping duplicate check");
        return None;
    };

    search
        .find_duplicate(&candidate, node.is_folder)
        .map(|matches| PolicyAbort::DuplicateFound {
            name: candidate,
            matches,
        })
}

/// Apply the storage threshold and size limits to a download of `size` bytes.
pub fn check_limits(
    settings: &MirrorSettings,
    quota: &dyn QuotaChecker,
    size: u64,
    flags: SessionFlags,
) -> Option<PolicyAbort> {
    if let Some(threshold_gb) = settings.storage_threshold() {
        if !quota.check_storage_threshold(size, flags.is_archive_op()) {
            return Some(PolicyAbort::StorageThreshold { threshold_gb, size });
        }
    }

    if let Some(limit) = settings.global_size_limit_bytes() {
        if size > limit {
            return Some(PolicyAbort::SizeLimit { limit, size });
        }
    }

    if flags.is_leech {
        if let Some(limit) = settings.leech_size_limit_bytes() {
            if size > limit {
                return Some(PolicyAbort::LeechLimit { limit, size });
            }
        }
    }

    None
}
