//! `POST /api/messages`: Bot Framework webhook

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use teamlink_infra::teams::cards::{
    thank_you_text, welcome_card, welcome_user_text, IncomingActivity, OutgoingActivity,
};
use tracing::{debug, error, info, warn};

use crate::context::AppContext;
use crate::http::AppError;

pub async fn messages(State(ctx): State<AppContext>, body: Bytes) -> Result<StatusCode, AppError> {
    let activity: IncomingActivity = serde_json::from_slice(&body).map_err(|err| {
        warn!(error = %err, "malformed activity");
        AppError::bad_request("Failed to parse request body")
    })?;

    if !activity.is_message() {
        debug!(kind = %activity.kind, "ignoring non-message activity");
        return Ok(StatusCode::OK);
    }

    let conversation_id = activity.conversation.id.as_str();
    let user_name = activity.from.name.as_str();

    if let Some(question) = activity.submitted_question() {
        info!(%conversation_id, "question submitted");
        let reply = OutgoingActivity::text(thank_you_text(user_name, question));
        ctx.notifier.send_activity(conversation_id, &reply).await.map_err(|err| {
            error!(%conversation_id, error = %err, "failed to answer question");
            AppError::internal("Failed to send response")
        })?;
        return Ok(StatusCode::OK);
    }

    let team_name = ctx.config.provisioning.team_name.as_str();
    let greeting = [
        OutgoingActivity::text(welcome_user_text(user_name, team_name)),
        OutgoingActivity::card(welcome_card()),
    ];
    for reply in &greeting {
        if let Err(err) = ctx.notifier.send_activity(conversation_id, reply).await {
            warn!(%conversation_id, error = %err, "failed to send welcome");
        }
    }

    Ok(StatusCode::OK)
}
