//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the download engine expects from its
//! collaborators. They use only domain types.
//!
//! # Design Rules
//!
//! - SDK calls return immediately; their results arrive as `TransferEvent`s
//! - Chat-side ports are fire-and-forget and must not block on transfers
//! - Everything is `Send + Sync`: callbacks arrive on SDK threads

pub mod policy;
pub mod session;
pub mod status;
pub mod storage_api;

pub use policy::{DuplicateSearch, QuotaChecker};
pub use session::{ChatNotifier, DownloadListener};
pub use status::{StatusSnapshot, TransferPhase, TransferStatus};
pub use storage_api::{RemoteStorageApi, StorageClientFactory, StorageListener};
