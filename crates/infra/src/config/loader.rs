//! Configuration loader
//!
//! Loads application configuration from environment variables, after
//! merging in the `.env` file (if any) via `dotenvy`. Variables already set
//! in the process environment win over the file.
//!
//! ## Environment Variables
//! Required:
//! - `CLIENT_ID`, `CLIENT_SECRET`: app registration (login and bot)
//! - `REDIRECT_URL`: OAuth callback URL registered with the provider
//!
//! Optional (defaults in `teamlink_domain::constants`):
//! - `AUTHORITY_URL`, `TENANT`
//! - `GRAPH_BASE_URL`
//! - `BOT_TOKEN_URL`, `BOT_SCOPE`, `BOT_SERVICE_URL`
//! - `TEAM_NAME`, `TEAM_DESCRIPTION`, `TEAM_PICTURE`
//! - `CHANNEL_NAME`, `CHANNEL_DESCRIPTION`, `CHANNEL_ID`
//! - `APP_NAME`, `APP_ZIP`
//! - `ENV_FILE`
//! - `POLL_INTERVAL_MS`, `POLL_MAX_ATTEMPTS`
//! - `LISTEN_ADDR`, `REPORT_LISTEN_ADDR`, `SESSION_TTL_SECS`
//! - `LOG_FORMAT` (`json` for structured output)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use teamlink_domain::constants::{self, USER_SCOPES};
use teamlink_domain::{
    AppConfig, BotSettings, GraphSettings, OAuthSettings, ProvisioningSettings, Result, ServerSettings, TeamLinkError,
};

/// Load configuration, merging the `.env` file into the environment first.
///
/// A missing `.env` file is not an error.
///
/// # Errors
/// Returns `TeamLinkError::Config` if the file is malformed, a required
/// variable is missing or a value does not parse.
pub fn load() -> Result<AppConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => tracing::debug!("No .env file found, using process environment"),
        Err(e) => return Err(TeamLinkError::Config(format!("Failed to read .env file: {e}"))),
    }

    let config = load_from_env()?;
    tracing::info!(
        team = %config.provisioning.team_name,
        graph = %config.graph.base_url,
        listen = %config.server.listen_addr,
        "Configuration loaded from environment variables"
    );
    Ok(config)
}

/// Load configuration from the process environment
///
/// # Errors
/// Returns `TeamLinkError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary key lookup
///
/// Empty values are treated as unset.
///
/// # Errors
/// Returns `TeamLinkError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_lookup<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = Env { lookup };

    let oauth = OAuthSettings {
        authority_url: env.or("AUTHORITY_URL", constants::DEFAULT_AUTHORITY_URL),
        tenant: env.or("TENANT", constants::DEFAULT_TENANT),
        client_id: env.required("CLIENT_ID")?,
        client_secret: env.required("CLIENT_SECRET")?,
        redirect_url: env.required("REDIRECT_URL")?,
        scopes: USER_SCOPES.iter().map(ToString::to_string).collect(),
    };

    let graph = GraphSettings { base_url: env.or("GRAPH_BASE_URL", constants::DEFAULT_GRAPH_BASE_URL) };

    let bot = BotSettings {
        token_url: env.or("BOT_TOKEN_URL", constants::DEFAULT_BOT_TOKEN_URL),
        scope: env.or("BOT_SCOPE", constants::DEFAULT_BOT_SCOPE),
        service_url: env.or("BOT_SERVICE_URL", constants::DEFAULT_BOT_SERVICE_URL),
    };

    let provisioning = ProvisioningSettings {
        team_name: env.or("TEAM_NAME", constants::DEFAULT_TEAM_NAME),
        team_description: env.or("TEAM_DESCRIPTION", constants::DEFAULT_TEAM_DESCRIPTION),
        team_picture: env.optional("TEAM_PICTURE"),
        channel_name: env.or("CHANNEL_NAME", constants::DEFAULT_CHANNEL_NAME),
        channel_description: env.or("CHANNEL_DESCRIPTION", constants::DEFAULT_CHANNEL_DESCRIPTION),
        app_name: env.or("APP_NAME", constants::DEFAULT_APP_NAME),
        app_package: PathBuf::from(env.or("APP_ZIP", constants::DEFAULT_APP_PACKAGE)),
        env_file: PathBuf::from(env.or("ENV_FILE", constants::DEFAULT_ENV_FILE)),
        poll_interval: Duration::from_millis(env.parsed("POLL_INTERVAL_MS", constants::DEFAULT_POLL_INTERVAL_MS)?),
        poll_max_attempts: env.parsed("POLL_MAX_ATTEMPTS", constants::DEFAULT_POLL_MAX_ATTEMPTS)?,
        channel_id: env.optional("CHANNEL_ID"),
    };

    if provisioning.poll_max_attempts == 0 {
        return Err(TeamLinkError::Config("POLL_MAX_ATTEMPTS must be at least 1".to_string()));
    }

    let server = ServerSettings {
        listen_addr: env.or("LISTEN_ADDR", constants::DEFAULT_LISTEN_ADDR),
        report_listen_addr: env.or("REPORT_LISTEN_ADDR", constants::DEFAULT_REPORT_LISTEN_ADDR),
        session_ttl: Duration::from_secs(env.parsed("SESSION_TTL_SECS", constants::DEFAULT_SESSION_TTL_SECS)?),
        json_logs: env.optional("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
    };

    Ok(AppConfig { oauth, graph, bot, provisioning, server })
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    /// Get required environment variable
    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| TeamLinkError::Config(format!("Missing required environment variable: {key}")))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw.parse::<T>().map_err(|e| TeamLinkError::Config(format!("Invalid {key} '{raw}': {e}"))),
            None => Ok(default),
        }
    }
}
