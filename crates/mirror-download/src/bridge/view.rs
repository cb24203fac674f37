//! Read-only live view of a transfer for the status reporter.

use std::sync::Arc;
use std::time::Duration;

use mirror_core::{TransferPhase, TransferStatus, readable_file_size, readable_time};

use super::EventBridge;

/// Live view backed by an attempt's [`EventBridge`].
///
/// This is what the status registry holds while a transfer is in flight.
#[derive(Clone)]
pub struct TransferStateView {
    bridge: Arc<EventBridge>,
}

impl TransferStateView {
    pub const fn new(bridge: Arc<EventBridge>) -> Self {
        Self { bridge }
    }

    pub const fn bridge(&self) -> &Arc<EventBridge> {
        &self.bridge
    }

    /// Estimated time left at the current speed.
    pub fn eta(&self) -> Option<Duration> {
        let speed = self.bridge.speed();
        if speed == 0 {
            return None;
        }
        let remaining = self
            .bridge
            .size()
            .saturating_sub(self.bridge.bytes_transferred());
        Some(Duration::from_secs(remaining / speed))
    }

    /// ETA formatted for chat, e.g. `1m30s`; `-` while the speed is unknown.
    pub fn eta_text(&self) -> String {
        self.eta().map_or_else(|| "-".to_string(), readable_time)
    }

    /// Speed formatted for chat, e.g. `1.5MB/s`.
    pub fn speed_text(&self) -> String {
        format!("{}/s", readable_file_size(self.bridge.speed()))
    }
}

impl TransferStatus for TransferStateView {
    fn gid(&self) -> String {
        self.bridge.gid().to_string()
    }

    fn name(&self) -> String {
        self.bridge.name().to_string()
    }

    fn size(&self) -> u64 {
        self.bridge.size()
    }

    fn processed_bytes(&self) -> u64 {
        self.bridge.bytes_transferred()
    }

    fn speed(&self) -> u64 {
        self.bridge.speed()
    }

    fn phase(&self) -> TransferPhase {
        if self.bridge.error().is_some() {
            TransferPhase::Failed
        } else if self.bridge.is_cancelled() {
            TransferPhase::Cancelled
        } else if self.bridge.is_completed() {
            TransferPhase::Complete
        } else {
            TransferPhase::Downloading
        }
    }

    fn error(&self) -> Option<String> {
        self.bridge.error().map(|e| e.message)
    }

    fn cancel(&self) {
        self.bridge.cancel();
    }
}
