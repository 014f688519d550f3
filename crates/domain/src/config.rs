//! Configuration structures
//!
//! Plain data; loading from the environment happens in
//! `teamlink_infra::config`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub oauth: OAuthSettings,
    pub graph: GraphSettings,
    pub bot: BotSettings,
    pub provisioning: ProvisioningSettings,
    pub server: ServerSettings,
}

/// Interactive (authorization code) login against the identity provider
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub authority_url: String,
    pub tenant: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

impl OAuthSettings {
    pub fn authorize_endpoint(&self) -> String {
        format!("{}/{}/oauth2/v2.0/authorize", self.authority_url.trim_end_matches('/'), self.tenant)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority_url.trim_end_matches('/'), self.tenant)
    }
}

impl std::fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("authority_url", &self.authority_url)
            .field("tenant", &self.tenant)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSettings {
    pub base_url: String,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self { base_url: constants::DEFAULT_GRAPH_BASE_URL.to_string() }
    }
}

/// Bot Framework connector and its client-credentials token endpoint.
///
/// The bot authenticates with the same app registration as the login flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    pub token_url: String,
    pub scope: String,
    pub service_url: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            token_url: constants::DEFAULT_BOT_TOKEN_URL.to_string(),
            scope: constants::DEFAULT_BOT_SCOPE.to_string(),
            service_url: constants::DEFAULT_BOT_SERVICE_URL.to_string(),
        }
    }
}

/// What the provisioning workflow creates and where it records the result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningSettings {
    pub team_name: String,
    pub team_description: String,
    pub team_picture: Option<String>,
    pub channel_name: String,
    pub channel_description: String,
    pub app_name: String,
    pub app_package: PathBuf,
    pub env_file: PathBuf,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    /// Channel recorded by a previous run (`CHANNEL_ID`)
    pub channel_id: Option<String>,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            team_name: constants::DEFAULT_TEAM_NAME.to_string(),
            team_description: constants::DEFAULT_TEAM_DESCRIPTION.to_string(),
            team_picture: None,
            channel_name: constants::DEFAULT_CHANNEL_NAME.to_string(),
            channel_description: constants::DEFAULT_CHANNEL_DESCRIPTION.to_string(),
            app_name: constants::DEFAULT_APP_NAME.to_string(),
            app_package: PathBuf::from(constants::DEFAULT_APP_PACKAGE),
            env_file: PathBuf::from(constants::DEFAULT_ENV_FILE),
            poll_interval: Duration::from_millis(constants::DEFAULT_POLL_INTERVAL_MS),
            poll_max_attempts: constants::DEFAULT_POLL_MAX_ATTEMPTS,
            channel_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub listen_addr: String,
    pub report_listen_addr: String,
    pub session_ttl: Duration,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: constants::DEFAULT_LISTEN_ADDR.to_string(),
            report_listen_addr: constants::DEFAULT_REPORT_LISTEN_ADDR.to_string(),
            session_ttl: Duration::from_secs(constants::DEFAULT_SESSION_TTL_SECS),
            json_logs: false,
        }
    }
}
