//! Disk-backed storage threshold check.

use std::path::{Path, PathBuf};

use sysinfo::Disks;

use mirror_core::QuotaChecker;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Whether `free` bytes leave at least `threshold` bytes after the download.
///
/// Archive operations write the archive next to the content, so they need
/// twice the download size.
pub const fn has_headroom(free: u64, size: u64, is_archive_op: bool, threshold: u64) -> bool {
    let required = if is_archive_op {
        size.saturating_mul(2)
    } else {
        size
    };
    match free.checked_sub(required) {
        Some(left) => left >= threshold,
        None => false,
    }
}

/// [`QuotaChecker`] that measures the disk holding the download directory.
#[derive(Debug, Clone)]
pub struct DiskQuotaChecker {
    download_dir: PathBuf,
    threshold_bytes: u64,
}

impl DiskQuotaChecker {
    /// Keep `threshold_gb` free on the disk of `download_dir`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(download_dir: impl Into<PathBuf>, threshold_gb: f64) -> Self {
        Self {
            download_dir: download_dir.into(),
            threshold_bytes: (threshold_gb.max(0.0) * BYTES_PER_GB) as u64,
        }
    }

    pub const fn threshold_bytes(&self) -> u64 {
        self.threshold_bytes
    }

    /// Free bytes on the disk whose mount point holds the download directory.
    pub fn free_space(&self) -> Option<u64> {
        let dir = std::fs::canonicalize(&self.download_dir)
            .unwrap_or_else(|_| self.download_dir.clone());
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .filter(|disk| dir.starts_with(disk.mount_point()))
            .max_by_key(|disk| mount_depth(disk.mount_point()))
            .map(sysinfo::Disk::available_space)
    }
}

fn mount_depth(mount_point: &Path) -> usize {
    mount_point.components().count()
}

impl QuotaChecker for DiskQuotaChecker {
    fn check_storage_threshold(&self, size: u64, is_archive_op: bool) -> bool {
        let Some(free) = self.free_space() else {
            tracing::warn!(
                dir = %self.download_dir.display(),
                "No disk found for download directory, skipping storage threshold"
            );
            return true;
        };

        let accepted = has_headroom(free, size, is_archive_op, self.threshold_bytes);
        tracing::debug!(free, size, is_archive_op, accepted, "Storage threshold check");
        accepted
    }
}
