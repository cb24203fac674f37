//! Per-attempt resources.
//!
//! An [`Attempt`] owns everything one invocation creates: the bridge, its
//! executor, the SDK client handles and the registry entry. Dropping it
//! detaches the bridge from every client and removes the registry entry if
//! it is still ours, so every exit path cleans up the same way.

use std::sync::Arc;
use std::time::Duration;

use mirror_core::{
    ChatNotifier, DownloadSession, RemoteStorageApi, SessionId, StorageListener, TransferStatus,
};

use crate::bridge::EventBridge;
use crate::executor::SingleFlightExecutor;
use crate::registry::StatusRegistry;

pub struct Attempt {
    pub bridge: Arc<EventBridge>,
    /// The bridge as handed to the SDK; identity used to detach it.
    sink: Arc<dyn StorageListener>,
    pub executor: SingleFlightExecutor,
    pub api: Arc<dyn RemoteStorageApi>,
    folder_api: Option<Arc<dyn RemoteStorageApi>>,
    registry: Arc<StatusRegistry>,
    registered: Option<(SessionId, Arc<dyn TransferStatus>)>,
    notifier: Arc<dyn ChatNotifier>,
    placeholder_discarded: bool,
}

impl Attempt {
    /// Build the bridge and executor and attach the bridge to `api`.
    pub fn init(
        api: Arc<dyn RemoteStorageApi>,
        session: &DownloadSession,
        registry: Arc<StatusRegistry>,
        timeout: Option<Duration>,
    ) -> Self {
        let executor = SingleFlightExecutor::new(timeout);
        let bridge = Arc::new(EventBridge::new(
            executor.gate(),
            Arc::clone(&session.listener),
        ));
        let sink: Arc<dyn StorageListener> = Arc::clone(&bridge) as Arc<dyn StorageListener>;
        api.add_listener(Arc::clone(&sink));

        Self {
            bridge,
            sink,
            executor,
            api,
            folder_api: None,
            registry,
            registered: None,
            notifier: Arc::clone(&session.notifier),
            placeholder_discarded: false,
        }
    }

    /// Attach the bridge to a folder client and keep it for cleanup.
    pub fn attach_folder_client(&mut self, folder_api: Arc<dyn RemoteStorageApi>) {
        folder_api.add_listener(Arc::clone(&self.sink));
        self.folder_api = Some(folder_api);
    }

    /// Make the transfer visible to the status reporter.
    pub fn register(&mut self, id: SessionId, entry: Arc<dyn TransferStatus>) {
        if self.registry.insert(id, Arc::clone(&entry)).is_some() {
            tracing::warn!(session = %id, "Replaced existing status entry");
        }
        self.registered = Some((id, entry));
    }

    /// Delete the "resolving link" placeholder, once.
    pub fn discard_placeholder(&mut self) {
        if !std::mem::replace(&mut self.placeholder_discarded, true) {
            self.notifier.discard_placeholder();
        }
    }
}

impl Drop for Attempt {
    fn drop(&mut self) {
        if let Some((id, entry)) = self.registered.take() {
            if self.registry.remove_if_same(id, &entry) {
                tracing::debug!(session = %id, "Deregistered transfer status");
            }
        }

        self.api.remove_listener(&self.sink);
        if let Some(folder_api) = &self.folder_api {
            folder_api.remove_listener(&self.sink);
        }
    }
}
