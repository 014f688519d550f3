//! `/login`, `/callback` and `/logout`

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use tracing::info;

use crate::auth::browser_session::{
    clear_session_cookie, clear_state_cookie, session_cookie, session_from, state_cookie, state_from,
};
use crate::auth::{CallbackOutcome, CallbackParams};
use crate::context::AppContext;
use crate::http::AppError;

const ALREADY_AUTHENTICATED: &str =
    "Already authenticated. <a href='/logout'>Logout</a> to use a different account.";

pub async fn login(State(ctx): State<AppContext>, jar: PrivateCookieJar) -> Result<Response, AppError> {
    if ctx.auth.active_session(session_from(&jar).as_deref()).is_some() {
        return Ok((StatusCode::OK, Html(ALREADY_AUTHENTICATED)).into_response());
    }

    let redirect = ctx.auth.begin_login()?;
    let jar = jar.remove(clear_session_cookie()).add(state_cookie(&redirect.state, ctx.secure_cookies));

    Ok((jar, Redirect::temporary(&redirect.url)).into_response())
}

/// Provider redirect target; on success provisioning runs inline and its
/// outcome is the response body.
pub async fn callback(
    State(ctx): State<AppContext>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    let expected_state = state_from(&jar);

    match ctx.auth.complete_login(&params, expected_state.as_deref()).await? {
        CallbackOutcome::Denied => Ok((jar.remove(clear_state_cookie()), Redirect::to("/login")).into_response()),
        CallbackOutcome::Authenticated { session_id, credential } => {
            let jar = jar.remove(clear_state_cookie()).add(session_cookie(
                &session_id,
                ctx.config.server.session_ttl,
                ctx.secure_cookies,
            ));

            match ctx.workflow.ensure_workspace(&credential).await {
                Ok(message) => Ok((jar, message).into_response()),
                Err(err) => {
                    let err = AppError::from(err).with_prefix("Failed to setup environment");
                    Ok((jar, err).into_response())
                }
            }
        }
    }
}

pub async fn logout(State(ctx): State<AppContext>, jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    ctx.auth.logout(session_from(&jar).as_deref());
    info!("session cookies cleared");
    (jar.remove(clear_state_cookie()).remove(clear_session_cookie()), Redirect::temporary("/login"))
}
