//! Team provisioning workflow
//!
//! A run walks a fixed sequence of remote steps for the signed-in user:
//!
//! 1. remove stale copies of the bot app from the org catalog (best effort)
//! 2. stop early when the user already belongs to a team with the target name
//! 3. create the team, polling the async operation when Graph defers it
//! 4. create the reports channel
//! 5. persist the team and channel IDs to the env file
//! 6. upload and install the bot app
//! 7. post a welcome message to the channel (best effort)
//!
//! Nothing is rolled back when a step fails; the failing state is logged and
//! the error returned. Concurrent runs for the same team name are serialized
//! so the second one sees the first one's team in step 2.

use std::collections::HashMap;
use std::sync::Arc;

use teamlink_domain::constants::{ENV_KEY_CHANNEL_ID, ENV_KEY_TEAM_ID, TEAM_VISIBILITY};
use teamlink_domain::{Credential, OperationStatus, ProvisioningSettings, ProvisioningState, Result, TeamLinkError};
use tracing::{info, instrument, warn};

use super::bot::ChannelNotifier;
use super::cards::{welcome_card, welcome_channel_text, OutgoingActivity};
use super::channel_slot::ChannelSlot;
use super::graph::GraphClient;
use super::types::{CreateChannelRequest, CreateTeamOutcome, CreateTeamRequest};
use crate::config::EnvFileStore;

/// Team and channel chosen by [`ProvisioningWorkflow::select_existing`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSelection {
    pub team_id: String,
    pub channel_id: String,
}

pub struct ProvisioningWorkflow {
    graph: GraphClient,
    notifier: Arc<dyn ChannelNotifier>,
    env_file: Arc<EnvFileStore>,
    channel_slot: Arc<ChannelSlot>,
    settings: ProvisioningSettings,
    name_locks: parking_lot::Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProvisioningWorkflow {
    pub fn new(
        graph: GraphClient,
        notifier: Arc<dyn ChannelNotifier>,
        env_file: Arc<EnvFileStore>,
        channel_slot: Arc<ChannelSlot>,
        settings: ProvisioningSettings,
    ) -> Self {
        Self { graph, notifier, env_file, channel_slot, settings, name_locks: parking_lot::Mutex::new(HashMap::new()) }
    }

    pub fn settings(&self) -> &ProvisioningSettings {
        &self.settings
    }

    fn name_lock(&self, team_name: &str) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.name_locks.lock().entry(team_name.to_string()).or_default())
    }

    fn transition(&self, state: &ProvisioningState) {
        info!(team = %self.settings.team_name, %state, "provisioning state");
    }

    /// Make sure the configured team exists for the user behind `credential`
    ///
    /// Returns a human-readable outcome: either the existing team's ID or
    /// the newly created team and channel IDs.
    ///
    /// # Errors
    /// Any failure in steps 3 to 6, including [`TeamLinkError::Conflict`]
    /// when Graph reports the team name as taken and
    /// [`TeamLinkError::Timeout`] when async creation never settles.
    #[instrument(skip_all, fields(team = %self.settings.team_name))]
    pub async fn ensure_workspace(&self, credential: &Credential) -> Result<String> {
        let lock = self.name_lock(&self.settings.team_name);
        let _guard = lock.lock().await;

        match self.run(credential.token()).await {
            Ok(message) => {
                self.transition(&ProvisioningState::Done);
                Ok(message)
            }
            Err(err) => {
                self.transition(&ProvisioningState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    async fn run(&self, token: &str) -> Result<String> {
        let team_name = self.settings.team_name.as_str();

        self.transition(&ProvisioningState::CleaningUp);
        self.remove_stale_apps(token).await;

        self.transition(&ProvisioningState::CheckingExisting);
        let teams = self.graph.list_joined_teams(token).await?;
        if let Some(existing) = teams.iter().find(|team| team.display_name == team_name) {
            info!(team_id = %existing.id, "team already exists");
            return Ok(format!(
                "Team '{team_name}' already exists. Please use the existing team. Team ID: {}",
                existing.id
            ));
        }

        self.transition(&ProvisioningState::CreatingWorkspace);
        let team_id = self.create_team(token).await?;
        info!(%team_id, "team created");

        self.transition(&ProvisioningState::CreatingChannel);
        let channel = CreateChannelRequest {
            display_name: self.settings.channel_name.clone(),
            description: self.settings.channel_description.clone(),
        };
        let channel_id = self.graph.create_channel(token, &team_id, &channel).await?;
        info!(%channel_id, "channel created");

        self.transition(&ProvisioningState::PersistingIds);
        self.persist(&team_id, &channel_id).await?;

        self.transition(&ProvisioningState::UploadingApp);
        let package = tokio::fs::read(&self.settings.app_package).await.map_err(|e| {
            TeamLinkError::Io(format!("failed to read app package {}: {e}", self.settings.app_package.display()))
        })?;
        let app_id = self.graph.upload_app_package(token, package).await?;
        info!(%app_id, "app uploaded");

        self.transition(&ProvisioningState::InstallingApp);
        self.graph.install_app(token, &team_id, &app_id).await?;

        self.transition(&ProvisioningState::NotifyingChannel);
        self.notify_channel(&channel_id).await;

        Ok(format!("New team created successfully. Team ID: {team_id}, Channel ID: {channel_id}"))
    }

    async fn remove_stale_apps(&self, token: &str) {
        let apps = match self.graph.list_catalog_apps(token).await {
            Ok(apps) => apps,
            Err(err) => {
                warn!(error = %err, "could not list app catalog, skipping cleanup");
                return;
            }
        };

        for app in apps.iter().filter(|app| app.display_name == self.settings.app_name) {
            match self.graph.delete_catalog_app(token, &app.id).await {
                Ok(()) => info!(app_id = %app.id, "stale app removed from catalog"),
                Err(err) => warn!(app_id = %app.id, error = %err, "failed to remove stale app"),
            }
        }
    }

    async fn create_team(&self, token: &str) -> Result<String> {
        let request = CreateTeamRequest {
            template: self.graph.standard_template(),
            display_name: self.settings.team_name.clone(),
            description: self.settings.team_description.clone(),
            visibility: TEAM_VISIBILITY.to_string(),
            picture: self.settings.team_picture.clone(),
        };

        match self.graph.create_team(token, &request).await? {
            CreateTeamOutcome::Created { team_id } => Ok(team_id),
            CreateTeamOutcome::Accepted { operation_url } => self.await_team_creation(token, &operation_url).await,
        }
    }

    /// Poll a deferred team creation until it settles or the budget runs out
    async fn await_team_creation(&self, token: &str, operation_url: &str) -> Result<String> {
        let attempts = self.settings.poll_max_attempts;

        for poll in 1..=attempts {
            self.transition(&ProvisioningState::AwaitingWorkspaceAsync { poll });
            tokio::time::sleep(self.settings.poll_interval).await;

            let operation = self.graph.get_operation(token, operation_url).await?;
            match operation.status.parse::<OperationStatus>() {
                Ok(OperationStatus::Succeeded) => {
                    return operation.target_resource_id.filter(|id| !id.is_empty()).ok_or_else(|| {
                        TeamLinkError::remote("team creation", 200, "operation succeeded without targetResourceId")
                    });
                }
                Ok(OperationStatus::Failed) => {
                    let detail = operation.error.map_or_else(|| "no error details".to_string(), |e| e.to_string());
                    return Err(TeamLinkError::remote("team creation", 200, detail));
                }
                Ok(status) if status.is_pending() => {}
                _ => {
                    return Err(TeamLinkError::remote(
                        "team creation",
                        200,
                        format!("unknown operation status: {}", operation.status),
                    ));
                }
            }
        }

        Err(TeamLinkError::Timeout { operation: "team creation".to_string(), attempts })
    }

    async fn persist(&self, team_id: &str, channel_id: &str) -> Result<()> {
        self.env_file.merge(&[(ENV_KEY_TEAM_ID, team_id), (ENV_KEY_CHANNEL_ID, channel_id)]).await?;
        self.channel_slot.set(channel_id);
        info!(path = %self.env_file.path().display(), "team and channel IDs saved");
        Ok(())
    }

    async fn notify_channel(&self, channel_id: &str) {
        let text = welcome_channel_text(&self.settings.team_name, &self.settings.channel_name);
        for activity in [OutgoingActivity::text(text), OutgoingActivity::card(welcome_card())] {
            if let Err(err) = self.notifier.send_activity(channel_id, &activity).await {
                warn!(%channel_id, error = %err, "failed to post welcome message");
            }
        }
    }

    /// Bind this service to a team the user already belongs to
    ///
    /// # Errors
    /// [`TeamLinkError::NotFound`] when no joined team has that name or the
    /// team has no channel with the configured channel name.
    #[instrument(skip(self, credential))]
    pub async fn select_existing(&self, credential: &Credential, team_name: &str) -> Result<TeamSelection> {
        let token = credential.token();

        let teams = self.graph.list_joined_teams(token).await?;
        let team = teams
            .into_iter()
            .find(|team| team.display_name == team_name)
            .ok_or_else(|| TeamLinkError::NotFound(format!("Team '{team_name}' not found")))?;

        let channels = self.graph.list_channels(token, &team.id).await?;
        let channel = channels
            .into_iter()
            .find(|channel| channel.display_name == self.settings.channel_name)
            .ok_or_else(|| {
                TeamLinkError::NotFound(format!(
                    "Channel '{}' not found in team '{team_name}'",
                    self.settings.channel_name
                ))
            })?;

        self.persist(&team.id, &channel.id).await?;
        Ok(TeamSelection { team_id: team.id, channel_id: channel.id })
    }
}

impl std::fmt::Debug for ProvisioningWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningWorkflow")
            .field("graph", &self.graph)
            .field("team_name", &self.settings.team_name)
            .finish_non_exhaustive()
    }
}
