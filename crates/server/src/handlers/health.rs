//! `GET /healthz`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::context::AppContext;
use crate::utils::health::{ComponentHealth, HealthStatus};

pub async fn healthz(State(ctx): State<AppContext>) -> (StatusCode, Json<HealthStatus>) {
    let package = &ctx.config.provisioning.app_package;
    let app_package = if tokio::fs::try_exists(package).await.unwrap_or(false) {
        ComponentHealth::healthy("app_package", package.display().to_string())
    } else {
        ComponentHealth::unhealthy("app_package", format!("missing: {}", package.display()))
    };

    let report_channel = ctx.channel_slot.get().map_or_else(
        || ComponentHealth::healthy("report_channel", "not configured"),
        |id| ComponentHealth::healthy("report_channel", id),
    );

    let status = HealthStatus::new()
        .add_component(ComponentHealth::healthy("sessions", format!("{} active", ctx.sessions.len())))
        .add_component(report_channel)
        .add_component(app_package);

    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}
