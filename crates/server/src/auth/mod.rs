//! Browser login: cookies and the OAuth session flow

pub mod browser_session;
pub mod flow;

pub use flow::{AuthSessionFlow, CallbackOutcome, CallbackParams, LoginRedirect};
