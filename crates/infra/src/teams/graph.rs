//! Microsoft Graph client for team, channel and app catalog operations
//!
//! Every call takes the signed-in user's bearer token; the client itself
//! holds no credentials. Collection reads may be retried when Graph
//! throttles; operation polls, creates and deletes are sent exactly once so
//! the poll budget counts real requests.

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use teamlink_domain::constants::STANDARD_TEAM_TEMPLATE;
use teamlink_domain::{Result, TeamLinkError};
use tracing::{debug, instrument};

use super::types::{
    AsyncOperation, CatalogApp, ChannelSummary, ChatMessageRequest, Collection, CreateChannelRequest,
    CreateChatRequest, CreateTeamOutcome, CreateTeamRequest, CreatedResource, InstallAppRequest, ItemBody,
    TeamSummary, UserProfile,
};
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct GraphClient {
    http: HttpClient,
    base_url: String,
}

impl GraphClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `template@odata.bind` value for the standard team template
    pub fn standard_template(&self) -> String {
        self.url(&format!("/{STANDARD_TEAM_TEMPLATE}"))
    }

    /// Absolute form of an operation `Location` header.
    ///
    /// Graph may answer with a path relative to the API root.
    pub fn resolve_location(&self, location: &str) -> String {
        if url::Url::parse(location).is_ok() {
            location.to_string()
        } else if location.starts_with('/') {
            self.url(location)
        } else {
            self.url(&format!("/{location}"))
        }
    }

    /// Profile of the signed-in user
    #[instrument(skip_all)]
    pub async fn me(&self, token: &str) -> Result<UserProfile> {
        let request = self.http.request(Method::GET, self.url("/me")).bearer_auth(token);
        let response = self.http.read(request).await?;
        json_with_status(response, StatusCode::OK, "get user profile").await
    }

    #[instrument(skip_all)]
    pub async fn list_joined_teams(&self, token: &str) -> Result<Vec<TeamSummary>> {
        let request = self.http.request(Method::GET, self.url("/me/joinedTeams")).bearer_auth(token);
        let response = self.http.read(request).await?;
        let teams: Collection<TeamSummary> = json_with_status(response, StatusCode::OK, "list joined teams").await?;
        debug!(count = teams.value.len(), "joined teams listed");
        Ok(teams.value)
    }

    #[instrument(skip(self, token))]
    pub async fn list_channels(&self, token: &str, team_id: &str) -> Result<Vec<ChannelSummary>> {
        let request = self.http.request(Method::GET, self.url(&format!("/teams/{team_id}/channels"))).bearer_auth(token);
        let response = self.http.read(request).await?;
        let channels: Collection<ChannelSummary> = json_with_status(response, StatusCode::OK, "list channels").await?;
        Ok(channels.value)
    }

    #[instrument(skip_all)]
    pub async fn list_catalog_apps(&self, token: &str) -> Result<Vec<CatalogApp>> {
        let request = self.http.request(Method::GET, self.url("/appCatalogs/teamsApps")).bearer_auth(token);
        let response = self.http.read(request).await?;
        let apps: Collection<CatalogApp> = json_with_status(response, StatusCode::OK, "list app catalog").await?;
        Ok(apps.value)
    }

    #[instrument(skip(self, token))]
    pub async fn delete_catalog_app(&self, token: &str, app_id: &str) -> Result<()> {
        let request =
            self.http.request(Method::DELETE, self.url(&format!("/appCatalogs/teamsApps/{app_id}"))).bearer_auth(token);
        let response = self.http.send(request).await?;
        expect_status(response, StatusCode::NO_CONTENT, "delete catalog app").await.map(drop)
    }

    /// `POST /teams`
    ///
    /// 201 yields the new ID, 202 the operation to poll and 409 a
    /// [`TeamLinkError::Conflict`]. A 202 without `Location` is an error.
    #[instrument(skip(self, token, body), fields(team = %body.display_name))]
    pub async fn create_team(&self, token: &str, body: &CreateTeamRequest) -> Result<CreateTeamOutcome> {
        let request = self.http.request(Method::POST, self.url("/teams")).bearer_auth(token).json(body);
        let response = self.http.send(request).await?;

        match response.status() {
            StatusCode::CREATED => {
                let created: CreatedResource = decode(response, "create team").await?;
                Ok(CreateTeamOutcome::Created { team_id: created.id })
            }
            StatusCode::ACCEPTED => {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| TeamLinkError::remote("create team", 202, "accepted without Location header"))?;
                Ok(CreateTeamOutcome::Accepted { operation_url: self.resolve_location(location) })
            }
            StatusCode::CONFLICT => Err(TeamLinkError::Conflict("Team already exists".to_string())),
            status => Err(remote_error(response, status, "create team").await),
        }
    }

    /// `GET` an async operation by its absolute URL, one request per call
    #[instrument(skip(self, token))]
    pub async fn get_operation(&self, token: &str, operation_url: &str) -> Result<AsyncOperation> {
        let request = self.http.request(Method::GET, operation_url).bearer_auth(token);
        let response = self.http.send(request).await?;
        json_with_status(response, StatusCode::OK, "get team operation").await
    }

    #[instrument(skip(self, token, body), fields(channel = %body.display_name))]
    pub async fn create_channel(&self, token: &str, team_id: &str, body: &CreateChannelRequest) -> Result<String> {
        let request =
            self.http.request(Method::POST, self.url(&format!("/teams/{team_id}/channels"))).bearer_auth(token).json(body);
        let response = self.http.send(request).await?;
        let created: CreatedResource = json_with_status(response, StatusCode::CREATED, "create channel").await?;
        Ok(created.id)
    }

    /// Upload a zipped app package to the organization catalog
    #[instrument(skip(self, token, package), fields(bytes = package.len()))]
    pub async fn upload_app_package(&self, token: &str, package: Vec<u8>) -> Result<String> {
        let request = self
            .http
            .request(Method::POST, self.url("/appCatalogs/teamsApps"))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/zip")
            .body(package);
        let response = self.http.send(request).await?;
        let created: CreatedResource = json_with_status(response, StatusCode::CREATED, "upload app package").await?;
        Ok(created.id)
    }

    #[instrument(skip(self, token))]
    pub async fn install_app(&self, token: &str, team_id: &str, app_id: &str) -> Result<()> {
        let body = InstallAppRequest { teams_app: self.url(&format!("/appCatalogs/teamsApps/{app_id}")) };
        let request = self
            .http
            .request(Method::POST, self.url(&format!("/teams/{team_id}/installedApps")))
            .bearer_auth(token)
            .json(&body);
        let response = self.http.send(request).await?;
        expect_status(response, StatusCode::CREATED, "install app").await.map(drop)
    }

    /// `POST /chats` for a one-on-one chat with `user` (UPN, email or object ID)
    #[instrument(skip(self, token))]
    pub async fn create_one_on_one_chat(&self, token: &str, user: &str) -> Result<String> {
        let body = CreateChatRequest::one_on_one(self.url(&format!("/users('{}')", user.replace('\'', "''"))));
        let request = self.http.request(Method::POST, self.url("/chats")).bearer_auth(token).json(&body);
        let response = self.http.send(request).await?;
        let created: CreatedResource = json_with_status(response, StatusCode::CREATED, "create chat").await?;
        Ok(created.id)
    }

    /// Post a plain message into a chat, returning the message ID
    #[instrument(skip(self, token, content))]
    pub async fn send_chat_message(&self, token: &str, chat_id: &str, content: &str) -> Result<String> {
        let body = ChatMessageRequest { body: ItemBody { content: content.to_string() } };
        let request =
            self.http.request(Method::POST, self.url(&format!("/chats/{chat_id}/messages"))).bearer_auth(token).json(&body);
        let response = self.http.send(request).await?;
        let created: CreatedResource = json_with_status(response, StatusCode::CREATED, "send chat message").await?;
        Ok(created.id)
    }
}

async fn remote_error(response: Response, status: StatusCode, operation: &str) -> TeamLinkError {
    let body = response.text().await.unwrap_or_default();
    TeamLinkError::remote(operation, status.as_u16(), body)
}

async fn expect_status(response: Response, expected: StatusCode, operation: &str) -> Result<Response> {
    let status = response.status();
    if status == expected {
        Ok(response)
    } else {
        Err(remote_error(response, status, operation).await)
    }
}

async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| TeamLinkError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| TeamLinkError::remote(operation, status, format!("malformed response: {e}")))
}

async fn json_with_status<T: DeserializeOwned>(response: Response, expected: StatusCode, operation: &str) -> Result<T> {
    let response = expect_status(response, expected, operation).await?;
    decode(response, operation).await
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> GraphClient {
        GraphClient::new(HttpClient::new().unwrap(), "https://graph.microsoft.com/v1.0/")
    }

    #[test]
    fn resolve_location_prefixes_relative_paths() {
        let graph = client();
        assert_eq!(graph.resolve_location("/operations/42"), "https://graph.microsoft.com/v1.0/operations/42");
        assert_eq!(
            graph.resolve_location("teams('t')/operations('o')"),
            "https://graph.microsoft.com/v1.0/teams('t')/operations('o')"
        );
        assert_eq!(graph.resolve_location("https://other.example/op/1"), "https://other.example/op/1");
    }

    #[test]
    fn standard_template_is_absolute() {
        assert_eq!(client().standard_template(), "https://graph.microsoft.com/v1.0/teamsTemplates('standard')");
    }

    #[tokio::test]
    async fn operation_poll_is_a_single_request_with_the_default_client() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/operations/42"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        let graph = GraphClient::new(HttpClient::new().unwrap(), server.uri());

        let err = graph.get_operation("tok", &graph.resolve_location("/operations/42")).await.unwrap_err();

        assert!(matches!(err, TeamLinkError::RemoteApi { status: 503, .. }));
    }

    #[tokio::test]
    async fn listing_retries_a_throttled_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/joinedTeams"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me/joinedTeams"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": [{"id": "t1", "displayName": "Blue"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let graph = GraphClient::new(HttpClient::new().unwrap(), server.uri());

        let teams = graph.list_joined_teams("tok").await.unwrap();

        assert_eq!(teams.len(), 1);
    }
}
