//! TeamLink - Teams provisioning and bot service
//!
//! Main entry point: loads configuration, wires the context and serves both
//! listeners until Ctrl-C.

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Context;
use teamlink_domain::constants::SESSION_PURGE_INTERVAL_SECS;
use teamlink_server::utils::logging::init_tracing;
use teamlink_server::{report_router, router, spawn_session_purge, AppContext};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = teamlink_infra::config::load().context("failed to load configuration")?;
    init_tracing(config.server.json_logs);

    let main_addr = config.server.listen_addr.clone();
    let report_addr = config.server.report_listen_addr.clone();

    let ctx = AppContext::new(config).context("failed to initialise application context")?;
    let purge = spawn_session_purge(ctx.sessions.clone(), Duration::from_secs(SESSION_PURGE_INTERVAL_SECS));

    let main_listener =
        TcpListener::bind(&main_addr).await.with_context(|| format!("failed to bind {main_addr}"))?;
    let report_listener =
        TcpListener::bind(&report_addr).await.with_context(|| format!("failed to bind {report_addr}"))?;
    info!(%main_addr, %report_addr, "TeamLink listening");

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let mut main_shutdown = shutdown_rx.clone();
    let mut report_shutdown = shutdown_rx;

    let main_server = axum::serve(main_listener, router(ctx.clone())).with_graceful_shutdown(async move {
        let _ = main_shutdown.changed().await;
    });
    let report_server = axum::serve(report_listener, report_router(ctx)).with_graceful_shutdown(async move {
        let _ = report_shutdown.changed().await;
    });

    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown requested");
        let _ = shutdown_tx.send(());
    });

    let (main_result, report_result) = tokio::join!(main_server.into_future(), report_server.into_future());
    purge.abort();

    main_result.context("main listener failed")?;
    report_result.context("report listener failed")?;
    info!("TeamLink stopped");
    Ok(())
}
