//! Integration tests for BotConnector backed by a real CredentialCache

use std::sync::Arc;

use serde_json::json;
use teamlink_common::testing::MockTokenIssuer;
use teamlink_common::{AccessTokenProvider, CredentialCache};
use teamlink_domain::TeamLinkError;
use teamlink_infra::teams::cards::{welcome_card, OutgoingActivity};
use teamlink_infra::{BotConnector, ChannelNotifier, HttpClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer, issuer: &MockTokenIssuer) -> BotConnector {
    let cache = Arc::new(CredentialCache::new(Arc::new(issuer.clone())));
    BotConnector::new(HttpClient::new().unwrap(), server.uri(), cache as Arc<dyn AccessTokenProvider>)
}

#[tokio::test]
async fn posts_activity_with_service_token() {
    let server = MockServer::start().await;
    let issuer = MockTokenIssuer::new("bot");
    Mock::given(method("POST"))
        .and(path("/v3/conversations/conv-1/activities"))
        .and(header("authorization", "Bearer bot-1"))
        .and(body_partial_json(json!({"type": "message", "text": "hello"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let bot = connector(&server, &issuer);
    bot.send_activity("conv-1", &OutgoingActivity::text("hello")).await.unwrap();
    bot.send_activity("conv-1", &OutgoingActivity::text("hello")).await.unwrap();

    assert_eq!(issuer.call_count(), 1, "cached token should be reused");
}

#[tokio::test]
async fn card_activities_are_sent_as_attachments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/conversations/conv-1/activities"))
        .and(body_partial_json(json!({
            "attachments": [{"contentType": "application/vnd.microsoft.card.adaptive"}]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    connector(&server, &MockTokenIssuer::new("bot"))
        .send_activity("conv-1", &OutgoingActivity::card(welcome_card()))
        .await
        .unwrap();
}

#[tokio::test]
async fn unauthorized_response_drops_the_cached_token() {
    let server = MockServer::start().await;
    let issuer = MockTokenIssuer::new("bot");
    Mock::given(method("POST"))
        .and(path("/v3/conversations/conv-1/activities"))
        .and(header("authorization", "Bearer bot-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/conversations/conv-1/activities"))
        .and(header("authorization", "Bearer bot-2"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let bot = connector(&server, &issuer);
    let err = bot.send_activity("conv-1", &OutgoingActivity::text("hi")).await.unwrap_err();
    assert_eq!(err, TeamLinkError::remote("send message", 401, "token expired"));

    bot.send_activity("conv-1", &OutgoingActivity::text("hi")).await.unwrap();
    assert_eq!(issuer.call_count(), 2);
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/conversations/conv-1/activities"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = connector(&server, &MockTokenIssuer::new("bot"))
        .send_activity("conv-1", &OutgoingActivity::text("hi"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "send message failed (status 500): boom");
}

#[tokio::test]
async fn issuer_failure_surfaces_before_any_post() {
    let server = MockServer::start().await;
    let issuer = MockTokenIssuer::new("bot");
    issuer.fail_with(400, "invalid_client");
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

    let err = connector(&server, &issuer).send_activity("conv-1", &OutgoingActivity::text("hi")).await.unwrap_err();

    assert_eq!(err, TeamLinkError::remote("token request", 400, "invalid_client"));
}
