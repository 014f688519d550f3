//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application. Anything that varies per deployment lives in
//! [`crate::config`] instead; these are the defaults it falls back to.

// Identity provider
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_TENANT: &str = "common";
pub const USER_SCOPES: &[&str] = &["openid", "profile", "User.Read", "Chat.ReadWrite", "Chat.Create"];

// Graph
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const STANDARD_TEAM_TEMPLATE: &str = "teamsTemplates('standard')";
pub const TEAM_VISIBILITY: &str = "Private";

// Bot Framework
pub const DEFAULT_BOT_TOKEN_URL: &str = "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
pub const DEFAULT_BOT_SCOPE: &str = "https://api.botframework.com/.default";
pub const DEFAULT_BOT_SERVICE_URL: &str = "https://smba.trafficmanager.net/amer";

// Provisioning
pub const DEFAULT_TEAM_NAME: &str = "TeamLink Security";
pub const DEFAULT_TEAM_DESCRIPTION: &str = "No alert left behind with our AI expert investigators";
pub const DEFAULT_CHANNEL_NAME: &str = "Reports";
pub const DEFAULT_CHANNEL_DESCRIPTION: &str = "Channel to receive investigation reports";
pub const DEFAULT_APP_NAME: &str = "TeamLink Security";
pub const DEFAULT_APP_PACKAGE: &str = "app.zip";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 30;

// Env file keys written back after provisioning
pub const ENV_KEY_TEAM_ID: &str = "TEAM_ID";
pub const ENV_KEY_CHANNEL_ID: &str = "CHANNEL_ID";

// Server
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3958";
pub const DEFAULT_REPORT_LISTEN_ADDR: &str = "0.0.0.0:3798";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;
pub const SESSION_PURGE_INTERVAL_SECS: u64 = 5 * 60;

// Secrets
pub const COOKIE_KEY_BYTES: usize = 32;
pub const STATE_BYTES: usize = 32;
pub const SESSION_ID_BYTES: usize = 16;

// Longest `expires_in` accepted from a token endpoint
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;
