//! Application context - dependency injection container

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use teamlink_common::auth::{random_bytes, OAuthConfig, ServiceCredentialsConfig};
use teamlink_common::{CredentialCache, OAuthClient, OAuthClientTrait, ServiceTokenIssuer, SessionCredentialStore};
use teamlink_domain::constants::COOKIE_KEY_BYTES;
use teamlink_domain::{AppConfig, Result};
use teamlink_infra::{
    BotConnector, ChannelNotifier, ChannelSlot, EnvFileStore, GraphClient, HttpClient, ProvisioningWorkflow,
};
use tracing::info;

use crate::auth::AuthSessionFlow;

/// Everything the HTTP handlers need, cheap to clone
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthSessionFlow>,
    pub sessions: Arc<SessionCredentialStore>,
    pub workflow: Arc<ProvisioningWorkflow>,
    pub graph: GraphClient,
    pub notifier: Arc<dyn ChannelNotifier>,
    pub channel_slot: Arc<ChannelSlot>,
    pub secure_cookies: bool,
    cookie_key: Key,
}

impl AppContext {
    /// Wire the production clients from `config`
    ///
    /// # Errors
    /// Fails when the HTTP client cannot be built or the OS random source
    /// cannot produce the cookie key.
    pub fn new(config: AppConfig) -> Result<Self> {
        let oauth = OAuthClient::new(OAuthConfig::from_settings(&config.oauth));

        let issuer = ServiceTokenIssuer::new(ServiceCredentialsConfig {
            token_url: config.bot.token_url.clone(),
            client_id: config.oauth.client_id.clone(),
            client_secret: config.oauth.client_secret.clone(),
            scope: config.bot.scope.clone(),
        });
        let service_credential = Arc::new(CredentialCache::new(Arc::new(issuer)));
        let notifier = BotConnector::new(HttpClient::new()?, config.bot.service_url.clone(), service_credential);

        Self::with_services(config, Arc::new(oauth), Arc::new(notifier))
    }

    /// Wire the context around the given identity provider and notifier
    ///
    /// # Errors
    /// Same as [`AppContext::new`].
    pub fn with_services(
        config: AppConfig,
        oauth: Arc<dyn OAuthClientTrait>,
        notifier: Arc<dyn ChannelNotifier>,
    ) -> Result<Self> {
        let key_material = random_bytes(COOKIE_KEY_BYTES)?;
        let cookie_key = Key::derive_from(&key_material);

        let sessions = Arc::new(SessionCredentialStore::new(config.server.session_ttl));
        let auth = Arc::new(AuthSessionFlow::new(oauth, Arc::clone(&sessions)));

        let channel_slot = Arc::new(ChannelSlot::new(config.provisioning.channel_id.clone()));
        let graph = GraphClient::new(HttpClient::new()?, config.graph.base_url.clone());
        let workflow = Arc::new(ProvisioningWorkflow::new(
            graph.clone(),
            Arc::clone(&notifier),
            Arc::new(EnvFileStore::new(config.provisioning.env_file.clone())),
            Arc::clone(&channel_slot),
            config.provisioning.clone(),
        ));

        let secure_cookies = config.oauth.redirect_url.starts_with("https://");
        info!(secure_cookies, report_channel = channel_slot.get().is_some(), "application context ready");

        Ok(Self {
            config: Arc::new(config),
            auth,
            sessions,
            workflow,
            graph,
            notifier,
            channel_slot,
            secure_cookies,
            cookie_key,
        })
    }
}

// PrivateCookieJar requires Key to be extractable from state
impl FromRef<AppContext> for Key {
    fn from_ref(ctx: &AppContext) -> Self {
        ctx.cookie_key.clone()
    }
}
