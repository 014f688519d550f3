#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::json;
use teamlink_common::testing::MockOAuthClient;
use teamlink_domain::{
    AppConfig, BotSettings, GraphSettings, OAuthSettings, ProvisioningSettings, Result, ServerSettings,
    TeamLinkError,
};
use teamlink_infra::teams::cards::OutgoingActivity;
use teamlink_infra::ChannelNotifier;
use teamlink_server::AppContext;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEAM_NAME: &str = "Blue Team";

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, OutgoingActivity)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
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
            return Err(TeamLinkError::remote("send message", 503, "unavailable"));
        }
        Ok(())
    }
}

/// Context wired to a mock identity provider, a recording notifier and a
/// Graph base URL of the caller's choosing.
pub struct TestApp {
    pub ctx: AppContext,
    pub oauth: MockOAuthClient,
    pub notifier: Arc<RecordingNotifier>,
    _dir: TempDir,
}

impl TestApp {
    pub fn new(graph_base_url: &str, channel_id: Option<&str>) -> Self {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let app_package = dir.path().join("app.zip");
        std::fs::write(&app_package, b"PK\x03\x04").expect("package written");

        let config = AppConfig {
            oauth: OAuthSettings {
                authority_url: "https://login.mock".to_string(),
                tenant: "common".to_string(),
                client_id: "test".to_string(),
                client_secret: "secret".to_string(),
                redirect_url: "http://localhost:3958/callback".to_string(),
                scopes: vec!["openid".to_string()],
            },
            graph: GraphSettings { base_url: graph_base_url.to_string() },
            bot: BotSettings::default(),
            provisioning: ProvisioningSettings {
                team_name: TEAM_NAME.to_string(),
                app_package,
                env_file: dir.path().join(".env"),
                poll_interval: Duration::from_millis(1),
                channel_id: channel_id.map(str::to_string),
                ..ProvisioningSettings::default()
            },
            server: ServerSettings::default(),
        };

        let oauth = MockOAuthClient::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = AppContext::with_services(config, Arc::new(oauth.clone()), Arc::clone(&notifier) as _)
            .expect("context should build");

        Self { ctx, oauth, notifier, _dir: dir }
    }

    pub fn main_router(&self) -> Router {
        teamlink_server::router(self.ctx.clone())
    }

    pub fn report_router(&self) -> Router {
        teamlink_server::report_router(self.ctx.clone())
    }
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.expect("router is infallible")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request should build")
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request should build")
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// `name=value` pair of the first `Set-Cookie` header for `name` that sets a value
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")) && pair.len() > name.len() + 1)
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response should redirect")
        .to_string()
}

/// Run `/login` and return (state, `auth-state=...` cookie pair)
pub async fn start_login(app: &TestApp) -> (String, String) {
    let response = send(app.main_router(), get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let url = location(&response);
    let state = url.split("state=").nth(1).expect("authorize URL carries state").to_string();
    let cookie = cookie_pair(&response, "auth-state").expect("state cookie set");
    (state, cookie)
}

pub async fn mount_existing_team(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/appCatalogs/teamsApps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me/joinedTeams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [
            {"id": "team-existing", "displayName": TEAM_NAME}
        ]})))
        .mount(server)
        .await;
}

/// Complete a login against a backend where the team already exists and
/// return the `auth-session=...` cookie pair
pub async fn signed_in(app: &TestApp, server: &MockServer) -> String {
    mount_existing_team(server).await;
    let (state, cookie) = start_login(app).await;
    let response = send(app.main_router(), get(&format!("/callback?code=abc&state={state}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&response, "auth-session").expect("session cookie set")
}
