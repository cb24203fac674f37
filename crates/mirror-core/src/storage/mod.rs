//! Remote-storage domain types.
//!
//! These types describe what the remote-storage SDK reports through its
//! listener callbacks. They carry no SDK handles, only plain data, so the
//! engine and its tests can construct them freely.
//!
//! # Structure
//!
//! - `types` - Nodes, request kinds, transfer snapshots, SDK error values
//! - `events` - The tagged `TransferEvent` delivered to listeners
//! - `links` - Link-shape detection (single file vs. folder)

pub mod events;
pub mod links;
pub mod types;

pub use events::TransferEvent;
pub use links::{LinkType, link_type};
pub use types::{ApiError, RemoteNode, RequestKind, TransferInfo, TransferState};
