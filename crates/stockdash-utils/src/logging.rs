//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber with default configuration
///
/// Reads the filter from `RUST_LOG`, falling back to `info`.
pub fn init_tracing() {
    init_tracing_with("info");
}

/// Initialize tracing with an explicit fallback filter
///
/// `RUST_LOG` still wins when set. Calling this twice is harmless; the
/// second installation attempt is ignored.
pub fn init_tracing_with(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing_with("warn");
        init_tracing();
    }

    #[test]
    fn test_build_filter_fallback() {
        let filter = build_filter("debug,stockdash_core=trace");
        assert!(filter.to_string().contains("stockdash_core=trace"));
    }
}
