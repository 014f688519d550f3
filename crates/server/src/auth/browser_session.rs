//! Encrypted cookies carried by the browser during and after login
//!
//! The browser only ever holds the anti-forgery state and the opaque
//! session ID; credentials stay in the server's session store.

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::PrivateCookieJar;
use time::Duration;

pub const STATE_COOKIE: &str = "auth-state";
pub const SESSION_COOKIE: &str = "auth-session";

const STATE_COOKIE_MINUTES: i64 = 10;

/// Cookie holding the `state` issued for an in-flight login
pub fn state_cookie(state: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, state.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::minutes(STATE_COOKIE_MINUTES))
        .build()
}

/// Cookie holding the session ID, living as long as the server-side session
pub fn session_cookie(session_id: &str, ttl: std::time::Duration, secure: bool) -> Cookie<'static> {
    let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(seconds))
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").max_age(Duration::ZERO).build()
}

pub fn clear_state_cookie() -> Cookie<'static> {
    removal(STATE_COOKIE)
}

pub fn clear_session_cookie() -> Cookie<'static> {
    removal(SESSION_COOKIE)
}

pub fn state_from(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(STATE_COOKIE).map(|c| c.value().to_string())
}

pub fn session_from(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string()).filter(|id| !id.is_empty())
}
