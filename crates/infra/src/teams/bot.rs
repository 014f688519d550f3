//! Bot Framework connector for posting activities to Teams conversations

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use teamlink_common::AccessTokenProvider;
use teamlink_domain::{Result, TeamLinkError};
use tracing::{debug, instrument, warn};

use super::cards::OutgoingActivity;
use crate::http::HttpClient;

/// Sends activities into a conversation or channel
#[async_trait]
pub trait ChannelNotifier: Send + Sync {
    async fn send_activity(&self, conversation_id: &str, activity: &OutgoingActivity) -> Result<()>;
}

/// Connector authenticated with the bot's cached service credential
pub struct BotConnector {
    http: HttpClient,
    service_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl BotConnector {
    pub fn new(http: HttpClient, service_url: impl Into<String>, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        let service_url = service_url.into().trim_end_matches('/').to_string();
        Self { http, service_url, tokens }
    }

    fn activities_url(&self, conversation_id: &str) -> String {
        format!("{}/v3/conversations/{conversation_id}/activities", self.service_url)
    }
}

impl std::fmt::Debug for BotConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConnector").field("service_url", &self.service_url).finish_non_exhaustive()
    }
}

#[async_trait]
impl ChannelNotifier for BotConnector {
    #[instrument(skip(self, activity))]
    async fn send_activity(&self, conversation_id: &str, activity: &OutgoingActivity) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let request =
            self.http.request(Method::POST, self.activities_url(conversation_id)).bearer_auth(token).json(activity);
        let response = self.http.send(request).await?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            debug!(status = status.as_u16(), "activity delivered");
            return Ok(());
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("connector rejected service credential, dropping cached token");
            self.tokens.invalidate().await;
        }
        let body = response.text().await.unwrap_or_default();
        Err(TeamLinkError::remote("send message", status.as_u16(), body))
    }
}
