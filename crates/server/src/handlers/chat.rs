//! Signed-in user's profile and direct chat messages via Graph

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use teamlink_domain::Credential;
use teamlink_infra::teams::types::UserProfile;
use tracing::info;

use crate::auth::browser_session::session_from;
use crate::context::AppContext;
use crate::http::AppError;

#[derive(Debug, Deserialize)]
pub struct ChatMessageForm {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub message: String,
}

fn signed_in(ctx: &AppContext, jar: &PrivateCookieJar) -> Result<Credential, AppError> {
    ctx.auth
        .active_session(session_from(jar).as_deref())
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "Not authenticated. Please log in first."))
}

/// `GET /profile`
pub async fn profile(State(ctx): State<AppContext>, jar: PrivateCookieJar) -> Result<Json<UserProfile>, AppError> {
    let credential = signed_in(&ctx, &jar)?;
    let profile = ctx
        .graph
        .me(credential.token())
        .await
        .map_err(|err| AppError::from(err).with_prefix("Failed to get user profile"))?;
    Ok(Json(profile))
}

/// `POST /chat-message`: open a one-on-one chat with `user` and post `message`
pub async fn chat_message(
    State(ctx): State<AppContext>,
    jar: PrivateCookieJar,
    Form(form): Form<ChatMessageForm>,
) -> Result<String, AppError> {
    let credential = signed_in(&ctx, &jar)?;

    let (user, message) = (form.user.trim(), form.message.trim());
    if user.is_empty() || message.is_empty() {
        return Err(AppError::bad_request("User and message are required"));
    }

    let chat_id = ctx
        .graph
        .create_one_on_one_chat(credential.token(), user)
        .await
        .map_err(|err| AppError::from(err).with_prefix("Failed to create chat"))?;
    ctx.graph
        .send_chat_message(credential.token(), &chat_id, message)
        .await
        .map_err(|err| AppError::from(err).with_prefix("Failed to send message"))?;

    info!(%chat_id, "direct message sent");
    Ok("Message sent successfully!".to_string())
}
