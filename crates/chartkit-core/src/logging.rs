//! Logging bootstrap built on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,chartkit=debug";

/// Install a formatted subscriber honouring `RUST_LOG`.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a formatted subscriber with the given fallback directives.
///
/// Calling this more than once (or after another subscriber was installed)
/// is harmless; the existing subscriber stays active.
pub fn init_with_filter(directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already installed");
    }
}
