//! Download orchestration.
//!
//! [`DownloadOrchestrator::start_download`] runs one attempt as a linear
//! state machine with early exits:
//!
//! 1. Init - bridge, executor, account client
//! 2. Authenticate - only when credentials are configured
//! 3. Resolve node - public file link, or folder login + authorize
//! 4. Duplicate check - dedup enabled and mirroring only
//! 5. Quota checks - storage threshold, global limit, leech limit
//! 6. Register - status entry becomes visible to the reporter
//! 7. Start transfer - blocks until the transfer ends
//! 8. Cleanup - always; see [`attempt::Attempt`]
//!
//! Failures and declines are turned into chat messages here; nothing
//! propagates to the caller as an error.

mod attempt;
mod policy;

use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::task::JoinHandle;

use mirror_core::{
    DownloadError, DownloadOutcome, DownloadRequest, DownloadSession, DuplicateSearch, LinkType,
    MirrorSettings, PolicyAbort, QuotaChecker, RemoteNode, StorageClientFactory, TransferStatus,
    link_type,
};

use crate::bridge::TransferStateView;
use crate::registry::StatusRegistry;

use attempt::Attempt;

pub use policy::{check_duplicate, check_limits};

/// User agent of the account client.
pub const ACCOUNT_USER_AGENT: &str = "mirror-leech-bot";

/// User agent of the per-attempt folder client.
pub const FOLDER_USER_AGENT: &str = "mirror-leech-bot-folder";

/// Length of the per-transfer group id.
pub const GROUP_ID_LEN: usize = 8;

/// Random alphanumeric correlation id for one transfer.
pub fn new_group_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GROUP_ID_LEN)
        .map(char::from)
        .collect()
}

/// Dependencies of the orchestrator.
#[derive(Clone)]
pub struct OrchestratorDeps {
    pub settings: MirrorSettings,
    pub clients: Arc<dyn StorageClientFactory>,
    pub duplicates: Arc<dyn DuplicateSearch>,
    pub quota: Arc<dyn QuotaChecker>,
    pub registry: Arc<StatusRegistry>,
}

/// Runs download attempts against the remote-storage SDK.
pub struct DownloadOrchestrator {
    deps: OrchestratorDeps,
}

impl DownloadOrchestrator {
    pub const fn new(deps: OrchestratorDeps) -> Self {
        Self { deps }
    }

    pub const fn registry(&self) -> &Arc<StatusRegistry> {
        &self.deps.registry
    }

    pub const fn settings(&self) -> &MirrorSettings {
        &self.deps.settings
    }

    /// Run one attempt on a blocking worker thread.
    ///
    /// The workflow parks its thread at every step, so it must never run on
    /// an async worker or on the SDK's callback thread.
    pub fn spawn(self: &Arc<Self>, request: DownloadRequest) -> JoinHandle<DownloadOutcome> {
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || this.start_download(request))
    }

    /// Run one attempt to its end on the calling thread.
    pub fn start_download(&self, request: DownloadRequest) -> DownloadOutcome {
        let session = &request.session;
        tracing::info!(
            target: "mirror.download",
            session = %session.id,
            link = %request.link,
            "Download attempt STARTED"
        );

        let api = self
            .deps
            .clients
            .create(self.deps.settings.effective_api_key(), ACCOUNT_USER_AGENT);
        let mut attempt = Attempt::init(
            api,
            session,
            Arc::clone(&self.deps.registry),
            self.deps.settings.transfer_timeout(),
        );

        let outcome = self.drive(&mut attempt, &request);
        drop(attempt);

        tracing::info!(
            target: "mirror.download",
            session = %session.id,
            outcome = outcome.label(),
            "Download attempt ENDED"
        );
        outcome
    }

    fn drive(&self, attempt: &mut Attempt, request: &DownloadRequest) -> DownloadOutcome {
        let session = &request.session;

        if let Err(e) = self.authenticate(attempt) {
            return Self::fail(attempt, session, e);
        }

        let node = match self.resolve_node(attempt, &request.link) {
            Ok(node) => node,
            Err(e) => return Self::fail(attempt, session, e),
        };

        let name = request.name.clone().unwrap_or_else(|| node.name.clone());
        if let Some(abort) = check_duplicate(
            &self.deps.settings,
            self.deps.duplicates.as_ref(),
            &name,
            &node,
            session.flags,
        ) {
            return Self::decline(attempt, session, abort);
        }

        let size = attempt.api.size_of(&node);
        if let Some(abort) = check_limits(
            &self.deps.settings,
            self.deps.quota.as_ref(),
            size,
            session.flags,
        ) {
            return Self::decline(attempt, session, abort);
        }

        let view: Arc<dyn TransferStatus> =
            Arc::new(TransferStateView::new(Arc::clone(&attempt.bridge)));
        attempt.register(session.id, view);

        Self::transfer(attempt, request, &node, name, size)
    }

    fn authenticate(&self, attempt: &Attempt) -> Result<(), DownloadError> {
        let Some((email, password)) = self.deps.settings.credentials() else {
            return Ok(());
        };

        tracing::info!("Logging into storage account");
        Self::run_step(attempt, || attempt.api.login(email, password))?;
        Self::checkpoint(attempt, DownloadError::auth)
    }

    fn resolve_node(
        &self,
        attempt: &mut Attempt,
        link: &str,
    ) -> Result<RemoteNode, DownloadError> {
        match link_type(link) {
            LinkType::File => {
                Self::run_step(attempt, || attempt.api.get_public_node(link))?;
                Self::checkpoint(attempt, DownloadError::resolve)?;
                attempt
                    .bridge
                    .public_node()
                    .ok_or_else(|| DownloadError::resolve("Link did not resolve to a file"))
            }
            LinkType::Folder => {
                let folder_api = self
                    .deps
                    .clients
                    .create(self.deps.settings.effective_api_key(), FOLDER_USER_AGENT);
                attempt.attach_folder_client(Arc::clone(&folder_api));

                Self::run_step(attempt, || folder_api.login_to_folder(link))?;
                Self::checkpoint(attempt, DownloadError::resolve)?;

                let root = attempt
                    .bridge
                    .resolved_node()
                    .ok_or_else(|| DownloadError::resolve("Folder link has no root node"))?;
                folder_api
                    .authorize_node(&root)
                    .ok_or_else(|| DownloadError::resolve("Could not authorize folder node"))
            }
        }
    }

    /// Run one SDK call through the executor.
    ///
    /// A timeout fails the attempt on the bridge, so the user is told once
    /// and a late transfer callback still aborts the SDK transfer.
    fn run_step(attempt: &Attempt, operation: impl FnOnce()) -> Result<(), DownloadError> {
        attempt.executor.run(operation).inspect_err(|e| {
            tracing::warn!(error = %e, "Storage step timed out, aborting");
            attempt.bridge.abort(&e.user_message());
        })
    }

    /// Turn the bridge's terminal state after a step into an error.
    fn checkpoint(
        attempt: &Attempt,
        classify: fn(String) -> DownloadError,
    ) -> Result<(), DownloadError> {
        if let Some(error) = attempt.bridge.error() {
            return Err(classify(error.message));
        }
        if attempt.bridge.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }
        Ok(())
    }

    fn transfer(
        attempt: &mut Attempt,
        request: &DownloadRequest,
        node: &RemoteNode,
        name: String,
        size: u64,
    ) -> DownloadOutcome {
        let session = &request.session;

        if let Err(e) = std::fs::create_dir_all(&request.path) {
            return Self::fail(attempt, session, DownloadError::from_io_error(&e));
        }

        let gid = new_group_id();
        attempt.bridge.set_values(name.as_str(), size, gid.as_str());
        session.listener.on_download_start();
        attempt.discard_placeholder();
        session.notifier.report_status();

        tracing::info!(
            target: "mirror.download",
            gid = %gid,
            name = %name,
            size,
            dir = %request.path.display(),
            "Transfer STARTED"
        );
        let started = Self::run_step(attempt, || {
            attempt
                .api
                .start_download(node, &request.path, request.name.as_deref());
        });

        if let Err(e) = started {
            // Stay attached for one more round so the next callback cancels the SDK transfer.
            if attempt.executor.wait().is_err() {
                tracing::warn!(gid = %gid, "No callback after abort, detaching anyway");
            }
            return Self::fail(attempt, session, e);
        }

        if attempt.bridge.is_completed() {
            DownloadOutcome::Completed
        } else if let Some(error) = attempt.bridge.error() {
            Self::fail(attempt, session, DownloadError::transfer_failed(error.message))
        } else if attempt.bridge.is_cancelled() {
            Self::fail(attempt, session, DownloadError::Cancelled)
        } else {
            Self::fail(
                attempt,
                session,
                DownloadError::transfer_failed("Transfer ended without completing"),
            )
        }
    }

    /// Error exit: tell the user once, drop the placeholder.
    fn fail(
        attempt: &mut Attempt,
        session: &DownloadSession,
        error: DownloadError,
    ) -> DownloadOutcome {
        attempt.discard_placeholder();

        if error.is_cancelled() {
            tracing::info!(session = %session.id, "Download cancelled");
            return DownloadOutcome::Cancelled;
        }

        tracing::error!(session = %session.id, error = %error, "Download failed");
        // The listener's error callback already told the user.
        if !attempt.bridge.error_notified() {
            session.notifier.report_error(&error.user_message());
        }
        DownloadOutcome::Failed(error)
    }

    /// Policy exit: a normal decline, not logged as an error.
    fn decline(
        attempt: &mut Attempt,
        session: &DownloadSession,
        abort: PolicyAbort,
    ) -> DownloadOutcome {
        tracing::info!(session = %session.id, reason = abort.label(), "Download declined");
        attempt.discard_placeholder();

        let text = abort.user_message();
        match &abort {
            PolicyAbort::DuplicateFound { matches, .. } => {
                session.notifier.report_duplicate_match(&text, matches);
            }
            _ => session.notifier.report_error(&text),
        }
        DownloadOutcome::Declined(abort)
    }
}
