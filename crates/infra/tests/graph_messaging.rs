//! Integration tests for user profile and one-on-one chat calls on GraphClient

use serde_json::json;
use teamlink_domain::TeamLinkError;
use teamlink_infra::{GraphClient, HttpClient};
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn graph() -> (MockServer, GraphClient) {
    let server = MockServer::start().await;
    let graph = GraphClient::new(HttpClient::new().unwrap(), server.uri());
    (server, graph)
}

#[tokio::test]
async fn me_returns_the_signed_in_profile() {
    let (server, graph) = graph().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(bearer_token("user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "displayName": "Ada Lovelace",
            "userPrincipalName": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = graph.me("user-token").await.unwrap();

    assert_eq!(profile.id, "u-1");
    assert_eq!(profile.user_principal_name.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn me_surfaces_rejected_token() {
    let (server, graph) = graph().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("InvalidAuthenticationToken"))
        .expect(1)
        .mount(&server)
        .await;

    let err = graph.me("stale").await.unwrap_err();

    assert_eq!(err, TeamLinkError::remote("get user profile", 401, "InvalidAuthenticationToken"));
}

#[tokio::test]
async fn chat_is_created_then_messaged() {
    let (server, graph) = graph().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_partial_json(json!({
            "chatType": "oneOnOne",
            "members": [{"user@odata.bind": format!("{}/users('ada@example.com')", server.uri())}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "19:chat-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chats/19:chat-1/messages"))
        .and(body_partial_json(json!({"body": {"content": "Hello"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "msg-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let chat_id = graph.create_one_on_one_chat("user-token", "ada@example.com").await.unwrap();
    let message_id = graph.send_chat_message("user-token", &chat_id, "Hello").await.unwrap();

    assert_eq!(chat_id, "19:chat-1");
    assert_eq!(message_id, "msg-1");
}

#[tokio::test]
async fn chat_creation_requires_created_status() {
    let (server, graph) = graph().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "19:existing"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = graph.create_one_on_one_chat("user-token", "ada@example.com").await.unwrap_err();

    assert!(matches!(err, TeamLinkError::RemoteApi { ref operation, status: 200, .. } if operation == "create chat"));
}

#[tokio::test]
async fn chat_message_failure_is_not_retried() {
    let (server, graph) = graph().await;
    Mock::given(method("POST"))
        .and(path("/chats/19:chat-1/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(1)
        .mount(&server)
        .await;

    let err = graph.send_chat_message("user-token", "19:chat-1", "Hello").await.unwrap_err();

    assert_eq!(err, TeamLinkError::remote("send chat message", 503, "busy"));
}
