//! `POST /select-team`: bind the service to a team the user already has

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use teamlink_domain::TeamLinkError;
use tracing::info;

use crate::auth::browser_session::session_from;
use crate::context::AppContext;
use crate::http::AppError;

#[derive(Debug, Deserialize)]
pub struct SelectTeamForm {
    #[serde(default)]
    pub team_name: String,
}

pub async fn select_team(
    State(ctx): State<AppContext>,
    jar: PrivateCookieJar,
    Form(form): Form<SelectTeamForm>,
) -> Result<String, AppError> {
    let credential = ctx
        .auth
        .active_session(session_from(&jar).as_deref())
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "Not authenticated. Please log in first."))?;

    let team_name = form.team_name.trim();
    if team_name.is_empty() {
        return Err(AppError::bad_request("Team name is required"));
    }

    let selection = ctx.workflow.select_existing(&credential, team_name).await.map_err(|err| match err {
        TeamLinkError::NotFound(message) => AppError::bad_request(message),
        other => AppError::internal(AppError::from(other).message()),
    })?;

    info!(team_id = %selection.team_id, channel_id = %selection.channel_id, "existing team selected");
    Ok(format!(
        "Team '{team_name}' selected. Team ID: {}, Channel ID: {}",
        selection.team_id, selection.channel_id
    ))
}
