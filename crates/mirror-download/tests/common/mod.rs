//! Shared fixtures for orchestrator integration tests.
//!
//! `FakeStorage` plays the SDK: every request returns at once and its events
//! are delivered later from a separate thread, like the real callback
//! context.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex, Weak};
use std::thread;

use mockall::mock;
use tempfile::TempDir;

use mirror_core::{
    ApiError, ChatNotifier, DownloadListener, DownloadRequest, DownloadSession, DuplicateMatch,
    DuplicateSearch, MirrorSettings, QuotaChecker, RemoteNode, RemoteStorageApi, RequestKind,
    SessionFlags, SessionId, StorageClientFactory, StorageListener, TransferEvent, TransferInfo,
    TransferState,
};
use mirror_download::{ACCOUNT_USER_AGENT, DownloadOrchestrator, OrchestratorDeps, StatusRegistry};

pub const SESSION: SessionId = SessionId(42);
pub const FILE_LINK: &str = "https://mega.nz/file/AbCdEf#key";
pub const FOLDER_LINK: &str = "https://mega.nz/folder/AbCdEf#key";
pub const GB: u64 = 1024 * 1024 * 1024;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// =============================================================================
// Fake SDK
// =============================================================================

/// One step of a scripted event stream.
#[derive(Clone)]
pub enum Step {
    Event(TransferEvent),
    /// Block the callback thread until the test reaches the same barrier.
    Rendezvous(Arc<Barrier>),
}

/// How a fake client answers each request.
#[derive(Clone, Default)]
pub struct Script {
    pub login_error: Option<ApiError>,
    pub root: Option<RemoteNode>,
    pub public_node: Option<RemoteNode>,
    pub public_node_error: Option<ApiError>,
    pub public_node_temp_error: Option<ApiError>,
    /// Never answer `get_public_node`.
    pub public_node_silent: bool,
    pub refuse_authorize: bool,
    pub size: u64,
    /// Emitted after `start_download`; empty means the SDK goes silent.
    pub transfer: Vec<Step>,
}

impl Script {
    pub fn public_file(node: RemoteNode, size: u64) -> Self {
        Self {
            public_node: Some(node),
            size,
            ..Self::default()
        }
    }

    pub fn folder(root: RemoteNode) -> Self {
        Self {
            root: Some(root),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_transfer(mut self, steps: Vec<Step>) -> Self {
        self.transfer = steps;
        self
    }
}

pub fn progress(name: &str, bytes: u64) -> Step {
    Step::Event(TransferEvent::TransferProgress {
        transfer: TransferInfo::new(7, name).with_progress(bytes, 100),
    })
}

pub fn finished(transfer: TransferInfo) -> Step {
    Step::Event(TransferEvent::TransferFinished {
        transfer: transfer.finished(),
        error: None,
    })
}

pub fn temp_error(name: &str, state: TransferState, message: &str) -> Step {
    Step::Event(TransferEvent::TransferTemporaryError {
        transfer: TransferInfo::new(7, name).with_state(state),
        error: ApiError::new(-3, message),
    })
}

/// Progress to completion, then finish, for a single file.
pub fn file_transfer(name: &str, size: u64) -> Vec<Step> {
    vec![
        progress(name, size / 2),
        progress(name, size),
        finished(TransferInfo::new(7, name).with_progress(size, 0)),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCall {
    pub node: RemoteNode,
    pub dir: PathBuf,
    pub custom_name: Option<String>,
}

pub struct FakeStorage {
    pub user_agent: String,
    script: Script,
    this: Weak<FakeStorage>,
    listeners: Mutex<Vec<Arc<dyn StorageListener>>>,
    calls: Mutex<Vec<String>>,
    starts: Mutex<Vec<StartCall>>,
    cancels: Mutex<Vec<u64>>,
    listeners_added: AtomicUsize,
}

impl FakeStorage {
    pub fn new(user_agent: &str, script: Script) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            user_agent: user_agent.to_string(),
            script,
            this: this.clone(),
            listeners: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            starts: Mutex::new(Vec::new()),
            cancels: Mutex::new(Vec::new()),
            listeners_added: AtomicUsize::new(0),
        })
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    /// Deliver `steps` from a callback thread.
    fn emit(&self, steps: Vec<Step>) {
        let Some(this) = self.this.upgrade() else {
            return;
        };
        thread::spawn(move || {
            for step in steps {
                match step {
                    Step::Event(event) => {
                        let listeners = this.listeners.lock().unwrap().clone();
                        for listener in listeners {
                            listener.on_event(&*this, event.clone());
                        }
                    }
                    Step::Rendezvous(barrier) => {
                        barrier.wait();
                    }
                }
            }
        });
    }

    fn request_result(kind: RequestKind, error: Option<&ApiError>) -> Step {
        Step::Event(match error {
            Some(error) => TransferEvent::request_failed(kind, error.clone()),
            None => TransferEvent::request_ok(kind),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn starts(&self) -> Vec<StartCall> {
        self.starts.lock().unwrap().clone()
    }

    pub fn cancels(&self) -> Vec<u64> {
        self.cancels.lock().unwrap().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn listeners_added(&self) -> usize {
        self.listeners_added.load(Ordering::SeqCst)
    }
}

impl RemoteStorageApi for FakeStorage {
    fn login(&self, _email: &str, _password: &str) {
        self.record("login");
        self.emit(vec![Self::request_result(
            RequestKind::Login,
            self.script.login_error.as_ref(),
        )]);
    }

    fn fetch_nodes(&self) {
        self.record("fetch_nodes");
        self.emit(vec![Self::request_result(RequestKind::FetchNodes, None)]);
    }

    fn root_node(&self) -> Option<RemoteNode> {
        self.script.root.clone()
    }

    fn get_public_node(&self, _link: &str) {
        self.record("get_public_node");
        if self.script.public_node_silent {
            return;
        }
        let event = if let Some(error) = &self.script.public_node_temp_error {
            TransferEvent::RequestTemporaryError {
                error: error.clone(),
            }
        } else if let Some(error) = &self.script.public_node_error {
            TransferEvent::request_failed(RequestKind::GetPublicNode, error.clone())
        } else {
            TransferEvent::RequestFinished {
                kind: RequestKind::GetPublicNode,
                public_node: self.script.public_node.clone(),
                error: None,
            }
        };
        self.emit(vec![Step::Event(event)]);
    }

    fn login_to_folder(&self, _link: &str) {
        self.record("login_to_folder");
        self.emit(vec![Self::request_result(
            RequestKind::Login,
            self.script.login_error.as_ref(),
        )]);
    }

    fn authorize_node(&self, node: &RemoteNode) -> Option<RemoteNode> {
        self.record("authorize_node");
        (!self.script.refuse_authorize).then(|| node.clone())
    }

    fn size_of(&self, _node: &RemoteNode) -> u64 {
        self.script.size
    }

    fn start_download(&self, node: &RemoteNode, target_dir: &Path, custom_name: Option<&str>) {
        self.record("start_download");
        self.starts.lock().unwrap().push(StartCall {
            node: node.clone(),
            dir: target_dir.to_path_buf(),
            custom_name: custom_name.map(str::to_string),
        });
        self.emit(self.script.transfer.clone());
    }

    fn cancel_transfer(&self, transfer: &TransferInfo) {
        self.record("cancel_transfer");
        self.cancels.lock().unwrap().push(transfer.tag);
        self.emit(vec![Step::Event(TransferEvent::TransferFinished {
            transfer: transfer.clone().with_state(TransferState::Cancelled),
            error: Some(ApiError::new(-8, "Transfer cancelled")),
        })]);
    }

    fn add_listener(&self, listener: Arc<dyn StorageListener>) {
        self.listeners_added.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_listener(&self, listener: &Arc<dyn StorageListener>) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)));
    }
}

/// Hands out one fake per user agent and remembers them.
pub struct FakeFactory {
    account: Script,
    folder: Script,
    created: Mutex<Vec<Arc<FakeStorage>>>,
}

impl FakeFactory {
    pub fn new(account: Script, folder: Script) -> Self {
        Self {
            account,
            folder,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> Vec<Arc<FakeStorage>> {
        self.created.lock().unwrap().clone()
    }

    pub fn account(&self) -> Arc<FakeStorage> {
        self.created()
            .into_iter()
            .find(|c| c.user_agent == ACCOUNT_USER_AGENT)
            .expect("account client created")
    }

    pub fn folder(&self) -> Option<Arc<FakeStorage>> {
        self.created()
            .into_iter()
            .find(|c| c.user_agent != ACCOUNT_USER_AGENT)
    }
}

impl StorageClientFactory for FakeFactory {
    fn create(&self, _app_key: &str, user_agent: &str) -> Arc<dyn RemoteStorageApi> {
        let script = if user_agent == ACCOUNT_USER_AGENT {
            self.account.clone()
        } else {
            self.folder.clone()
        };
        let client = FakeStorage::new(user_agent, script);
        self.created.lock().unwrap().push(Arc::clone(&client));
        client
    }
}

// =============================================================================
// Chat-side fakes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Duplicate(String, DuplicateMatch),
    Status,
    PlaceholderDiscarded,
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, notice: &Notice) -> usize {
        self.notices().iter().filter(|n| *n == notice).count()
    }
}

impl ChatNotifier for RecordingNotifier {
    fn report_error(&self, text: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Error(text.to_string()));
    }

    fn report_duplicate_match(&self, text: &str, matches: &DuplicateMatch) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Duplicate(text.to_string(), matches.clone()));
    }

    fn report_status(&self) {
        self.notices.lock().unwrap().push(Notice::Status);
    }

    fn discard_placeholder(&self) {
        self.notices.lock().unwrap().push(Notice::PlaceholderDiscarded);
    }
}

#[derive(Default)]
pub struct RecordingListener {
    pub starts: AtomicUsize,
    pub completes: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn completes(&self) -> usize {
        self.completes.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl DownloadListener for RecordingListener {
    fn on_download_start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_download_complete(&self) -> anyhow::Result<()> {
        self.completes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn on_download_error(&self, reason: &str) {
        self.errors.lock().unwrap().push(reason.to_string());
    }
}

mock! {
    pub Duplicates {}
    impl DuplicateSearch for Duplicates {
        fn find_duplicate(&self, name: &str, is_folder: bool) -> Option<DuplicateMatch>;
    }
}

mock! {
    pub Quota {}
    impl QuotaChecker for Quota {
        fn check_storage_threshold(&self, size: u64, is_archive_op: bool) -> bool;
    }
}

pub fn no_duplicates() -> MockDuplicates {
    let mut duplicates = MockDuplicates::new();
    duplicates.expect_find_duplicate().return_const(None);
    duplicates
}

pub fn roomy_disk() -> MockQuota {
    let mut quota = MockQuota::new();
    quota.expect_check_storage_threshold().return_const(true);
    quota
}

// =============================================================================
// Fixture
// =============================================================================

pub struct Fixture {
    pub factory: Arc<FakeFactory>,
    pub listener: Arc<RecordingListener>,
    pub notifier: Arc<RecordingNotifier>,
    pub registry: Arc<StatusRegistry>,
    pub orchestrator: Arc<DownloadOrchestrator>,
    pub flags: SessionFlags,
    pub dir: TempDir,
}

pub struct FixtureBuilder {
    settings: MirrorSettings,
    account: Script,
    folder: Script,
    duplicates: MockDuplicates,
    quota: MockQuota,
    flags: SessionFlags,
}

impl FixtureBuilder {
    pub fn settings(mut self, settings: MirrorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn account(mut self, script: Script) -> Self {
        self.account = script;
        self
    }

    pub fn folder(mut self, script: Script) -> Self {
        self.folder = script;
        self
    }

    pub fn duplicates(mut self, duplicates: MockDuplicates) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn quota(mut self, quota: MockQuota) -> Self {
        self.quota = quota;
        self
    }

    pub const fn flags(mut self, flags: SessionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> Fixture {
        init_tracing();
        let factory = Arc::new(FakeFactory::new(self.account, self.folder));
        let registry = Arc::new(StatusRegistry::new());
        let orchestrator = Arc::new(DownloadOrchestrator::new(OrchestratorDeps {
            settings: self.settings,
            clients: Arc::clone(&factory) as Arc<dyn StorageClientFactory>,
            duplicates: Arc::new(self.duplicates),
            quota: Arc::new(self.quota),
            registry: Arc::clone(&registry),
        }));

        Fixture {
            factory,
            listener: Arc::new(RecordingListener::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            registry,
            orchestrator,
            flags: self.flags,
            dir: tempfile::tempdir().unwrap(),
        }
    }
}

impl Fixture {
    pub fn builder() -> FixtureBuilder {
        FixtureBuilder {
            settings: MirrorSettings::default(),
            account: Script::default(),
            folder: Script::default(),
            duplicates: no_duplicates(),
            quota: roomy_disk(),
            flags: SessionFlags::default(),
        }
    }

    pub fn target_dir(&self) -> PathBuf {
        self.dir.path().join("downloads").join(SESSION.to_string())
    }

    pub fn request(&self, link: &str) -> DownloadRequest {
        DownloadRequest {
            link: link.to_string(),
            path: self.target_dir(),
            name: None,
            session: DownloadSession {
                id: SESSION,
                flags: self.flags,
                listener: Arc::clone(&self.listener) as Arc<dyn DownloadListener>,
                notifier: Arc::clone(&self.notifier) as Arc<dyn ChatNotifier>,
            },
        }
    }

    /// Every client created for the attempt has its listener detached.
    pub fn assert_detached(&self) {
        for client in self.factory.created() {
            assert_eq!(client.listeners_added(), 1, "{} attached once", client.user_agent);
            assert_eq!(client.listener_count(), 0, "{} detached", client.user_agent);
        }
    }
}
