//! Microsoft Graph request and response schemas
//!
//! Only the fields this service reads or writes are modelled. Unknown fields
//! are ignored on input.

use serde::{Deserialize, Serialize};

/// `{"value": [...]}` collection wrapper used by Graph list endpoints
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Entry of `GET /me/joinedTeams`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

/// Entry of `GET /teams/{id}/channels`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

/// Entry of `GET /appCatalogs/teamsApps`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogApp {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

/// Body of `POST /teams`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[serde(rename = "template@odata.bind")]
    pub template: String,
    pub display_name: String,
    pub description: String,
    pub visibility: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Body of `POST /teams/{id}/channels`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelRequest {
    pub display_name: String,
    pub description: String,
}

/// Body of `POST /teams/{id}/installedApps`
#[derive(Debug, Clone, Serialize)]
pub struct InstallAppRequest {
    #[serde(rename = "teamsApp@odata.bind")]
    pub teams_app: String,
}

/// Any Graph response carrying the ID of a created resource
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub id: String,
}

/// Outcome of `POST /teams`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTeamOutcome {
    /// 201: the team exists now
    Created { team_id: String },
    /// 202: creation continues asynchronously; poll this absolute URL
    Accepted { operation_url: String },
}

/// Body of `GET {operation location}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncOperation {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub target_resource_id: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// Body of `GET /me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
}

/// Member entry of a chat creation request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMember {
    #[serde(rename = "@odata.type")]
    pub odata_type: &'static str,
    pub roles: Vec<String>,
    #[serde(rename = "user@odata.bind")]
    pub user: String,
}

/// Body of `POST /chats`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    pub chat_type: &'static str,
    pub members: Vec<ChatMember>,
}

impl CreateChatRequest {
    /// One-on-one chat with the user bound at `user_url`, joined as owner
    pub fn one_on_one(user_url: String) -> Self {
        Self {
            chat_type: "oneOnOne",
            members: vec![ChatMember {
                odata_type: "#microsoft.graph.aadUserConversationMember",
                roles: vec!["owner".to_string()],
                user: user_url,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemBody {
    pub content: String,
}

/// Body of `POST /chats/{id}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageRequest {
    pub body: ItemBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_team_request_uses_odata_bind() {
        let body = serde_json::to_value(CreateTeamRequest {
            template: "https://graph.microsoft.com/v1.0/teamsTemplates('standard')".to_string(),
            display_name: "Blue Team".to_string(),
            description: "desc".to_string(),
            visibility: "Private".to_string(),
            picture: None,
        })
        .unwrap();

        assert_eq!(body["template@odata.bind"], "https://graph.microsoft.com/v1.0/teamsTemplates('standard')");
        assert_eq!(body["displayName"], "Blue Team");
        assert_eq!(body["visibility"], "Private");
        assert!(body.get("picture").is_none());
    }

    #[test]
    fn async_operation_parses_graph_payload() {
        let op: AsyncOperation = serde_json::from_str(
            r#"{"id":"42","operationType":"createTeam","status":"succeeded","targetResourceId":"team-9","error":null}"#,
        )
        .unwrap();

        assert_eq!(op.status, "succeeded");
        assert_eq!(op.target_resource_id.as_deref(), Some("team-9"));
        assert!(op.error.is_none());
    }

    #[test]
    fn collection_defaults_to_empty() {
        let teams: Collection<TeamSummary> = serde_json::from_str("{}").unwrap();
        assert!(teams.value.is_empty());
    }

    #[test]
    fn one_on_one_chat_binds_the_user_as_owner() {
        let body = serde_json::to_value(CreateChatRequest::one_on_one(
            "https://graph.microsoft.com/v1.0/users('ada@example.com')".to_string(),
        ))
        .unwrap();

        assert_eq!(body["chatType"], "oneOnOne");
        let member = &body["members"][0];
        assert_eq!(member["@odata.type"], "#microsoft.graph.aadUserConversationMember");
        assert_eq!(member["roles"][0], "owner");
        assert_eq!(member["user@odata.bind"], "https://graph.microsoft.com/v1.0/users('ada@example.com')");
    }

    #[test]
    fn user_profile_tolerates_missing_optional_fields() {
        let profile: UserProfile = serde_json::from_str(r#"{"id":"u1","displayName":"Ada"}"#).unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Ada"));
        assert!(profile.mail.is_none());
    }
}
