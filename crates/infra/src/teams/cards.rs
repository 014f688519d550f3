//! Bot Framework activities and the adaptive cards this service sends

use serde::{Deserialize, Serialize};

const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const ADAPTIVE_CARD_VERSION: &str = "1.0";
const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Input ID of the question box on the welcome card
pub const QUESTION_INPUT_ID: &str = "userQuestion";

/// Activity posted to `/v3/conversations/{id}/activities`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingActivity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl OutgoingActivity {
    pub fn text(text: impl Into<String>) -> Self {
        Self { kind: "message".to_string(), text: Some(text.into()), attachments: Vec::new() }
    }

    pub fn card(card: AdaptiveCard) -> Self {
        Self {
            kind: "message".to_string(),
            text: None,
            attachments: vec![Attachment { content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(), content: card }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub content: AdaptiveCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdaptiveCard {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub body: Vec<CardElement>,
}

impl AdaptiveCard {
    pub fn new(body: Vec<CardElement>) -> Self {
        Self {
            schema: ADAPTIVE_CARD_SCHEMA.to_string(),
            kind: "AdaptiveCard".to_string(),
            version: ADAPTIVE_CARD_VERSION.to_string(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CardElement {
    TextBlock {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        wrap: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        separator: bool,
    },
    #[serde(rename = "Input.Text")]
    InputText { id: String, placeholder: String },
    ActionSet { actions: Vec<CardAction> },
}

impl CardElement {
    fn text_block(text: impl Into<String>) -> Self {
        Self::TextBlock { text: text.into(), weight: None, size: None, wrap: true, separator: false }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self::TextBlock { text: text.into(), weight: Some("bolder".to_string()), size: None, wrap: true, separator: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CardAction {
    #[serde(rename = "Action.Submit")]
    Submit { title: String },
}

/// Activity received on the messaging webhook
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingActivity {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub from: ChannelAccount,
    #[serde(default)]
    pub conversation: ConversationRef,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<SubmitValue>,
}

impl IncomingActivity {
    pub fn is_message(&self) -> bool {
        self.kind == "message"
    }

    /// Non-empty question submitted through the welcome card
    pub fn submitted_question(&self) -> Option<&str> {
        self.value.as_ref().and_then(|v| v.user_question.as_deref()).filter(|q| !q.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationRef {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitValue {
    #[serde(default)]
    pub user_question: Option<String>,
}

/// Card inviting the user to type a question
pub fn welcome_card() -> AdaptiveCard {
    AdaptiveCard::new(vec![
        CardElement::text_block("Feel free to ask me any questions!"),
        CardElement::InputText { id: QUESTION_INPUT_ID.to_string(), placeholder: "Ask a question...".to_string() },
        CardElement::ActionSet { actions: vec![CardAction::Submit { title: "Send".to_string() }] },
    ])
}

/// Fields of a submitted investigation report
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvestigationReport {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub description: String,
}

pub fn investigation_card(team_name: &str, report: &InvestigationReport) -> AdaptiveCard {
    AdaptiveCard::new(vec![
        CardElement::TextBlock {
            text: format!("{team_name} Investigation Report"),
            weight: Some("bolder".to_string()),
            size: Some("large".to_string()),
            wrap: false,
            separator: false,
        },
        CardElement::bold(format!("Title: {}", report.title)),
        CardElement::bold(format!("Time: {}", report.time)),
        CardElement::bold(format!("Severity: {}", report.severity)),
        CardElement::TextBlock { text: String::new(), weight: None, size: None, wrap: false, separator: true },
        CardElement::text_block(report.description.clone()),
    ])
}

pub fn welcome_channel_text(team_name: &str, channel_name: &str) -> String {
    format!(
        "Welcome to the **{team_name} {channel_name} Channel**, we will send you once an investigation reports in \
         this channel.\n\nIf you have any questions, send our virtual assistant a direct chat message!"
    )
}

pub fn welcome_user_text(user_name: &str, team_name: &str) -> String {
    format!(
        "Hello **{user_name}**, I hope you are having a great day!\n\n I am {team_name}'s virtual assistant and I am \
         here to respond to any questions you have."
    )
}

pub fn thank_you_text(user_name: &str, question: &str) -> String {
    format!(
        "Thank you for your question, **{user_name}**\n\n**Your Question:** '{question}'\n\nOur team will get back to \
         you shortly!"
    )
}
