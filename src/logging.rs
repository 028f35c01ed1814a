//! Structured logging setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "oci_translator=info,tower_http=info";

/// Builds the log filter, preferring `RUST_LOG` over `verbose`/the default.
pub fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("oci_translator=debug,tower_http=debug")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    })
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
