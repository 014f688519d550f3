use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use teamlink_domain::{ProvisioningSettings, Result, TeamLinkError};
use teamlink_infra::config::EnvFileStore;
use teamlink_infra::teams::cards::OutgoingActivity;
use teamlink_infra::{ChannelNotifier, ChannelSlot, GraphClient, HttpClient, ProvisioningWorkflow};
use tempfile::TempDir;
use wiremock::MockServer;

pub const TEAM_NAME: &str = "Blue Team";
pub const CHANNEL_NAME: &str = "Reports";
pub const APP_NAME: &str = "Blue Bot";

/// Notifier that records every activity instead of calling the connector.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, OutgoingActivity)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn sent(&self) -> Vec<(String, OutgoingActivity)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ChannelNotifier for RecordingNotifier {
    async fn send_activity(&self, conversation_id: &str, activity: &OutgoingActivity) -> Result<()> {
        self.sent.lock().push((conversation_id.to_string(), activity.clone()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(TeamLinkError::remote("send message", 502, "connector unavailable"));
        }
        Ok(())
    }
}

/// Workflow wired to a wiremock Graph server and a temp env file.
pub struct Harness {
    pub server: MockServer,
    pub workflow: ProvisioningWorkflow,
    pub notifier: Arc<RecordingNotifier>,
    pub slot: Arc<ChannelSlot>,
    pub env_path: PathBuf,
    _dir: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_notifier(RecordingNotifier::default()).await
    }

    pub async fn with_notifier(notifier: RecordingNotifier) -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("temp dir should be created");

        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "# service settings\nCLIENT_ID=abc\nTEAM_ID=stale\n").expect("env file written");
        let app_package = dir.path().join("app.zip");
        std::fs::write(&app_package, b"PK\x03\x04fake-zip").expect("package written");

        let settings = ProvisioningSettings {
            team_name: TEAM_NAME.to_string(),
            channel_name: CHANNEL_NAME.to_string(),
            app_name: APP_NAME.to_string(),
            app_package,
            env_file: env_path.clone(),
            poll_interval: Duration::from_millis(1),
            ..ProvisioningSettings::default()
        };

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .base_backoff(Duration::from_millis(1))
            .build()
            .expect("http client should build");
        let graph = GraphClient::new(http, server.uri());
        let notifier = Arc::new(notifier);
        let slot = Arc::new(ChannelSlot::default());
        let workflow = ProvisioningWorkflow::new(
            graph,
            Arc::clone(&notifier) as Arc<dyn ChannelNotifier>,
            Arc::new(EnvFileStore::new(&env_path)),
            Arc::clone(&slot),
            settings,
        );

        Self { server, workflow, notifier, slot, env_path, _dir: dir }
    }

    pub fn env_contents(&self) -> String {
        std::fs::read_to_string(&self.env_path).expect("env file readable")
    }
}
