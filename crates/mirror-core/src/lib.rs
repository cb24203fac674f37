//! Core domain types and port definitions for the mirror download engine.
//!
//! This crate holds no I/O: it describes what the remote-storage SDK
//! reports, what a download attempt can end in, and the traits every
//! external collaborator implements.

pub mod download;
pub mod ports;
pub mod settings;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use download::{
    DownloadError, DownloadOutcome, DownloadRequest, DownloadSession, DuplicateMatch, PolicyAbort,
    SessionFlags, SessionId,
};
pub use ports::{
    ChatNotifier, DownloadListener, DuplicateSearch, QuotaChecker, RemoteStorageApi,
    StatusSnapshot, StorageClientFactory, StorageListener, TransferPhase, TransferStatus,
};
pub use settings::{MirrorSettings, SettingsError, validate_settings};
pub use storage::{
    ApiError, LinkType, RemoteNode, RequestKind, TransferEvent, TransferInfo, TransferState,
    link_type,
};
pub use utils::{archive_base_name, duplicate_candidate_name, readable_file_size, readable_time};
