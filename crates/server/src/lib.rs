//! # TeamLink Server
//!
//! HTTP layer of the service.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - The browser login flow and its cookies
//! - Route handlers for login, provisioning, the bot webhook and reports
//!
//! ## Architecture
//! - Depends on `common`, `domain` and `infra`
//! - Serves two listeners: the main router and the report router

pub mod auth;
pub mod context;
pub mod handlers;
pub mod http;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use teamlink_common::SessionCredentialStore;
use tokio::task::JoinHandle;
use tracing::debug;

pub use context::AppContext;

/// Login, provisioning, user chat, webhook and health routes
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/login", get(handlers::auth::login))
        .route("/callback", get(handlers::auth::callback))
        .route("/logout", get(handlers::auth::logout))
        .route("/select-team", post(handlers::select_team::select_team))
        .route("/profile", get(handlers::chat::profile))
        .route("/chat-message", post(handlers::chat::chat_message))
        .route("/api/messages", post(handlers::messages::messages))
        .route("/healthz", get(handlers::health::healthz))
        .with_state(ctx)
}

/// Investigation report intake, served on its own listener
pub fn report_router(ctx: AppContext) -> Router {
    Router::new().route("/report", post(handlers::report::report)).with_state(ctx)
}

/// Periodically drop expired sessions for the life of the process
pub fn spawn_session_purge(sessions: Arc<SessionCredentialStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                debug!(purged, remaining = sessions.len(), "expired sessions purged");
            }
        }
    })
}
