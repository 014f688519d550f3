//! `POST /report`: forward an investigation report to the team channel

use axum::extract::State;
use axum::Form;
use teamlink_infra::teams::cards::{investigation_card, InvestigationReport, OutgoingActivity};
use tracing::{error, info};

use crate::context::AppContext;
use crate::http::AppError;

pub async fn report(
    State(ctx): State<AppContext>,
    Form(report): Form<InvestigationReport>,
) -> Result<&'static str, AppError> {
    let channel_id = ctx.channel_slot.get().ok_or_else(|| AppError::internal("Channel ID not set"))?;

    let card = investigation_card(&ctx.config.provisioning.team_name, &report);
    ctx.notifier.send_activity(&channel_id, &OutgoingActivity::card(card)).await.map_err(|err| {
        error!(%channel_id, error = %err, "failed to deliver report");
        AppError::internal(format!("Failed to send message: {err}"))
    })?;

    info!(%channel_id, severity = %report.severity, "report delivered");
    Ok("Report sent successfully!")
}
