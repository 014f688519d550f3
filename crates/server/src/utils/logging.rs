//! Tracing subscriber setup for the service binary

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info,teamlink=debug";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. With `json` set, events are
/// emitted as one JSON object per line.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true);
    let result = if json { builder.json().try_init() } else { builder.compact().try_init() };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
