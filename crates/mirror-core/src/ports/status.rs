//! Status entries polled by the status reporter.

use serde::{Deserialize, Serialize};

/// Lifecycle phase shown for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPhase {
    Downloading,
    Complete,
    Cancelled,
    Failed,
}

/// Serializable point-in-time view of a status entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub gid: String,
    pub name: String,
    pub size: u64,
    pub processed_bytes: u64,
    /// Bytes per second.
    pub speed: u64,
    pub phase: TransferPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusSnapshot {
    /// Completion percentage in `0.0..=100.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        (self.processed_bytes as f64 / self.size as f64 * 100.0).min(100.0)
    }
}

/// An entry of the shared status registry.
///
/// Reads are best-effort snapshots; staleness is acceptable for display.
pub trait TransferStatus: Send + Sync {
    fn gid(&self) -> String;
    fn name(&self) -> String;
    fn size(&self) -> u64;
    fn processed_bytes(&self) -> u64;
    fn speed(&self) -> u64;
    fn phase(&self) -> TransferPhase;
    fn error(&self) -> Option<String>;

    /// Ask the transfer to stop. Takes effect on the next SDK callback.
    fn cancel(&self);

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            gid: self.gid(),
            name: self.name(),
            size: self.size(),
            processed_bytes: self.processed_bytes(),
            speed: self.speed(),
            phase: self.phase(),
            error: self.error(),
        }
    }
}
