//! Remote-storage download engine.
//!
//! Bridges a callback-driven storage SDK into a blocking, sequential
//! download workflow:
//!
//! - `executor` - `CompletionGate` and `SingleFlightExecutor` (one async SDK call, one blocking wait)
//! - `bridge` - `EventBridge` (SDK listener, sole writer of transfer state) and `TransferStateView`
//! - `registry` - `StatusRegistry` polled by the status reporter
//! - `orchestrator` - `DownloadOrchestrator` (auth, resolve, policy checks, register, transfer)
//! - `quota` - `DiskQuotaChecker`, a disk-backed storage threshold check

// Re-export core types for convenience
pub use mirror_core::{
    DownloadError, DownloadOutcome, DownloadRequest, DownloadSession, MirrorSettings, PolicyAbort,
    SessionFlags, SessionId,
};

pub mod bridge;
pub mod executor;
pub mod orchestrator;
pub mod quota;
pub mod registry;

pub use bridge::{CANCELLED_BY_USER, EventBridge, TransferStateView};
pub use executor::{CompletionGate, SingleFlightExecutor};
pub use orchestrator::{
    ACCOUNT_USER_AGENT, DownloadOrchestrator, FOLDER_USER_AGENT, GROUP_ID_LEN, OrchestratorDeps,
    check_duplicate, check_limits, new_group_id,
};
pub use quota::{DiskQuotaChecker, has_headroom};
pub use registry::StatusRegistry;
