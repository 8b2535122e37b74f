//! Tracing/logging initialization.
//!
//! JSON lines on stdout. `RUST_LOG` overrides the filter passed in.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: service logs at info, plus one
/// span per HTTP request from `tower_http`.
pub const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// Initialize tracing for the process.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_target(false)
        .try_init()
        .is_ok()
}
