//! Event bridge between the SDK callback context and the blocking workflow.
//!
//! [`EventBridge`] is the only writer of an attempt's transfer state and the
//! only producer of gate signals. It records what each callback reports and
//! opens the gate when the awaited operation reaches a terminal state.
//!
//! # Concurrency Model
//!
//! - State that must change together (`cancelled`, `error`, notification
//!   flags, resolved nodes) lives under one mutex
//! - Progress counters are atomics so the status reporter reads them without
//!   locking
//! - Name, size and group id are set once before the transfer starts
//! - Listener callbacks and SDK calls are made with no lock held

mod view;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use mirror_core::{
    ApiError, DownloadListener, RemoteNode, RemoteStorageApi, RequestKind, StorageListener,
    TransferEvent, TransferInfo,
};

use crate::executor::CompletionGate;

pub use view::TransferStateView;

/// Reason sent to the listener when the user cancels.
pub const CANCELLED_BY_USER: &str = "Download Canceled by user";

/// Values fixed before the transfer starts.
#[derive(Debug)]
struct TransferMeta {
    /// Display name; also the file name a single-file transfer must match.
    pub name: String,
    /// Total size in bytes.
    pub size: u64,
    /// Opaque correlation id for logs and status.
    pub gid: String,
}

#[derive(Debug, Default)]
struct BridgeState {
    resolved_node: Option<RemoteNode>,
    public_node: Option<RemoteNode>,
    /// First error wins.
    error: Option<ApiError>,
    /// Monotonic false -> true.
    cancelled: bool,
    /// The listener's error callback already fired.
    error_notified: bool,
    /// The SDK was already asked to cancel the transfer.
    abort_sent: bool,
    completed: bool,
}

impl BridgeState {
    fn record_error(&mut self, error: ApiError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Mark the attempt cancelled; `true` if the caller must notify the listener.
    fn begin_abort(&mut self) -> bool {
        self.cancelled = true;
        !std::mem::replace(&mut self.error_notified, true)
    }

    const fn is_terminated(&self) -> bool {
        self.cancelled || self.error.is_some()
    }
}

/// Listener attached to every SDK client of one download attempt.
pub struct EventBridge {
    gate: Arc<CompletionGate>,
    listener: Arc<dyn DownloadListener>,
    state: Mutex<BridgeState>,
    meta: OnceLock<TransferMeta>,
    bytes_transferred: AtomicU64,
    speed: AtomicU64,
}

impl EventBridge {
    /// Create a bridge that signals `gate` and reports to `listener`.
    pub fn new(gate: Arc<CompletionGate>, listener: Arc<dyn DownloadListener>) -> Self {
        Self {
            gate,
            listener,
            state: Mutex::new(BridgeState::default()),
            meta: OnceLock::new(),
            bytes_transferred: AtomicU64::new(0),
            speed: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fix name, size and group id for the transfer.
    ///
    /// Returns `false` (and keeps the first values) if already set.
    pub fn set_values(&self, name: impl Into<String>, size: u64, gid: impl Into<String>) -> bool {
        let meta = TransferMeta {
            name: name.into(),
            size,
            gid: gid.into(),
        };
        match self.meta.set(meta) {
            Ok(()) => true,
            Err(rejected) => {
                tracing::warn!(gid = %rejected.gid, "Transfer values already set, ignoring");
                false
            }
        }
    }

    pub fn name(&self) -> &str {
        self.meta.get().map_or("", |m| m.name.as_str())
    }

    pub fn size(&self) -> u64 {
        self.meta.get().map_or(0, |m| m.size)
    }

    pub fn gid(&self) -> &str {
        self.meta.get().map_or("", |m| m.gid.as_str())
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred.load(Ordering::Relaxed)
    }

    /// Last reported speed in bytes per second.
    pub fn speed(&self) -> u64 {
        self.speed.load(Ordering::Relaxed)
    }

    /// Root node fetched by the last completed node fetch.
    pub fn resolved_node(&self) -> Option<RemoteNode> {
        self.lock().resolved_node.clone()
    }

    /// Node resolved from a public file link.
    pub fn public_node(&self) -> Option<RemoteNode> {
        self.lock().public_node.clone()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.lock().error.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    pub fn is_completed(&self) -> bool {
        self.lock().completed
    }

    /// Whether the listener's error callback has fired for this attempt.
    pub fn error_notified(&self) -> bool {
        self.lock().error_notified
    }

    /// Cancel the attempt on behalf of the user.
    ///
    /// Safe from any thread. The SDK-level abort happens on the next
    /// transfer callback. Only the first cancel or fatal error notifies the
    /// listener; cancelling a completed transfer does nothing.
    pub fn cancel(&self) {
        let notify = {
            let mut state = self.lock();
            if state.completed {
                tracing::debug!(gid = %self.gid(), "Ignoring cancel of completed transfer");
                return;
            }
            state.begin_abort()
        };

        if notify {
            tracing::info!(gid = %self.gid(), name = %self.name(), "Download cancelled by user");
            self.listener.on_download_error(CANCELLED_BY_USER);
        }
    }

    /// Fail the attempt from the orchestrator side, e.g. after a timeout.
    ///
    /// Like [`cancel`](Self::cancel), the SDK-level abort and the gate
    /// signal happen on the next transfer callback.
    pub fn abort(&self, reason: &str) {
        let notify = {
            let mut state = self.lock();
            if state.completed {
                return;
            }
            state.record_error(ApiError::new(0, reason));
            state.begin_abort()
        };

        if notify {
            self.listener.on_download_error(reason);
        }
    }

    fn on_request_finished(
        &self,
        api: &dyn RemoteStorageApi,
        kind: RequestKind,
        public_node: Option<RemoteNode>,
        error: Option<ApiError>,
    ) {
        if let Some(error) = error {
            tracing::error!(kind = ?kind, code = error.code, error = %error, "Storage request failed");
            self.lock().record_error(error);
            self.gate.signal();
            return;
        }

        if self.lock().is_terminated() {
            self.gate.signal();
            return;
        }

        match kind {
            _ if kind.is_chained() => {
                tracing::debug!("Login finished, fetching nodes");
                api.fetch_nodes();
                return;
            }
            RequestKind::FetchNodes => {
                let root = api.root_node();
                match &root {
                    Some(node) => tracing::info!(node = %node.name, "Fetched root node"),
                    None => tracing::warn!("Node fetch finished without a root node"),
                }
                self.lock().resolved_node = root;
            }
            RequestKind::GetPublicNode => {
                self.lock().public_node = public_node;
            }
            _ => {}
        }

        self.gate.signal();
    }

    fn on_request_temporary_error(&self, error: ApiError) {
        tracing::error!(code = error.code, error = %error, "Storage request temporary error");

        let notify = {
            let mut state = self.lock();
            state.record_error(error.clone());
            state.begin_abort()
        };

        if notify {
            self.listener
                .on_download_error(&format!("RequestTempError: {error}"));
        }
        self.gate.signal();
    }

    fn on_transfer_progress(&self, api: &dyn RemoteStorageApi, transfer: &TransferInfo) {
        let abort = {
            let mut state = self.lock();
            if state.cancelled {
                Some(!std::mem::replace(&mut state.abort_sent, true))
            } else {
                None
            }
        };

        match abort {
            Some(first) => {
                if first {
                    tracing::info!(
                        gid = %self.gid(),
                        tag = transfer.tag,
                        "Aborting cancelled transfer"
                    );
                    api.cancel_transfer(transfer);
                }
                self.gate.signal();
            }
            None => {
                self.speed.store(transfer.speed, Ordering::Relaxed);
                self.bytes_transferred
                    .store(transfer.transferred_bytes, Ordering::Relaxed);
                tracing::trace!(
                    gid = %self.gid(),
                    bytes = transfer.transferred_bytes,
                    speed = transfer.speed,
                    "Transfer progress"
                );
            }
        }
    }

    fn is_awaited_transfer(&self, transfer: &TransferInfo) -> bool {
        transfer.is_finished && (transfer.is_folder || transfer.file_name == self.name())
    }

    fn on_transfer_finished(&self, transfer: &TransferInfo, error: Option<ApiError>) {
        let awaited = self.is_awaited_transfer(transfer);
        {
            let mut state = self.lock();
            if state.cancelled {
                drop(state);
                self.gate.signal();
                return;
            }
            if !awaited {
                tracing::trace!(file = %transfer.file_name, "Nested transfer finished");
                return;
            }
            // Completion and cancellation are decided under the same lock.
            if error.is_none() {
                state.completed = true;
            }
        }

        if let Some(error) = error {
            self.fail_transfer(transfer, error, "TransferError");
            return;
        }
        self.bytes_transferred
            .fetch_max(transfer.transferred_bytes, Ordering::Relaxed);

        tracing::info!(gid = %self.gid(), name = %self.name(), "Transfer finished");
        match catch_unwind(AssertUnwindSafe(|| self.listener.on_download_complete())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(
                    gid = %self.gid(),
                    error = %e,
                    "Download completion callback failed"
                );
            }
            Err(_) => {
                tracing::error!(gid = %self.gid(), "Download completion callback panicked");
            }
        }
        self.gate.signal();
    }

    fn on_transfer_temporary_error(&self, transfer: &TransferInfo, error: ApiError) {
        tracing::error!(
            file = %transfer.file_name,
            state = transfer.state.code(),
            error = %error,
            "Transfer temporary error"
        );

        if transfer.state.is_transient() {
            return;
        }
        self.fail_transfer(transfer, error, "TransferTempError");
    }

    fn fail_transfer(&self, transfer: &TransferInfo, error: ApiError, label: &str) {
        let notify = {
            let mut state = self.lock();
            state.record_error(error.clone());
            state.begin_abort()
        };

        if notify {
            self.listener
                .on_download_error(&format!("{label}: {error} ({})", transfer.file_name));
        }
        self.gate.signal();
    }
}

impl StorageListener for EventBridge {
    fn on_event(&self, api: &dyn RemoteStorageApi, event: TransferEvent) {
        match event {
            TransferEvent::RequestFinished {
                kind,
                public_node,
                error,
            } => self.on_request_finished(api, kind, public_node, error),
            TransferEvent::RequestTemporaryError { error } => {
                self.on_request_temporary_error(error);
            }
            TransferEvent::TransferProgress { transfer } => {
                self.on_transfer_progress(api, &transfer);
            }
            TransferEvent::TransferFinished { transfer, error } => {
                self.on_transfer_finished(&transfer, error);
            }
            TransferEvent::TransferTemporaryError { transfer, error } => {
                self.on_transfer_temporary_error(&transfer, error);
            }
        }
    }
}
