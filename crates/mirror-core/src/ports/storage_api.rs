//! Remote-storage SDK port.
//!
//! The SDK is callback driven: each request method returns at once and the
//! outcome is reported later, from the SDK's own threads, to every listener
//! attached to the client that issued it.

use std::path::Path;
use std::sync::Arc;

use crate::storage::{RemoteNode, TransferEvent, TransferInfo};

/// Sink for SDK events.
///
/// Implementations must tolerate concurrent calls: progress, error and
/// finish events for the same transfer may race each other.
pub trait StorageListener: Send + Sync {
    /// Handle one event. `api` is the client that produced it.
    fn on_event(&self, api: &dyn RemoteStorageApi, event: TransferEvent);
}

/// A client handle of the remote-storage SDK.
pub trait RemoteStorageApi: Send + Sync {
    /// Start an account login. Reports `RequestFinished { kind: Login }`.
    fn login(&self, email: &str, password: &str);

    /// Fetch the node tree. Reports `RequestFinished { kind: FetchNodes }`.
    fn fetch_nodes(&self);

    /// Root node of the fetched tree, if nodes were fetched.
    fn root_node(&self) -> Option<RemoteNode>;

    /// Resolve a public file link. Reports `RequestFinished { kind: GetPublicNode }`.
    fn get_public_node(&self, link: &str);

    /// Log into a folder link. Reports `RequestFinished { kind: Login }`.
    fn login_to_folder(&self, link: &str);

    /// Authorize a node from a folder context so another client can download it.
    fn authorize_node(&self, node: &RemoteNode) -> Option<RemoteNode>;

    /// Total size of a node in bytes (recursive for folders).
    fn size_of(&self, node: &RemoteNode) -> u64;

    /// Start downloading `node` into `target_dir`.
    ///
    /// Reports transfer progress and finish events until the transfer ends.
    fn start_download(&self, node: &RemoteNode, target_dir: &Path, custom_name: Option<&str>);

    /// Abort a running transfer.
    fn cancel_transfer(&self, transfer: &TransferInfo);

    fn add_listener(&self, listener: Arc<dyn StorageListener>);

    fn remove_listener(&self, listener: &Arc<dyn StorageListener>);
}

/// Creates SDK client handles.
pub trait StorageClientFactory: Send + Sync {
    /// Create a client with the given application key and user agent.
    fn create(&self, app_key: &str, user_agent: &str) -> Arc<dyn RemoteStorageApi>;
}
