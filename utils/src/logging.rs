//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Build the log filter: `RUST_LOG` when set, otherwise `fallback`.
///
/// An unparsable `fallback` degrades to `info`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_directive_is_used() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter("debug").to_string(), "debug");
    }

    #[test]
    fn target_directives_pass_through() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter("gridpledge_pool=debug").to_string(), "gridpledge_pool=debug");
    }
}
