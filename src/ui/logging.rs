//! ui::logging
//!
//! Installs the `tracing` subscriber for the binary.
//!
//! The filter comes from `$CARDMINT_LOG` using `EnvFilter` directive syntax
//! (for example `cardmint=debug`). Without it, the level is `warn`, or
//! `debug` when `--debug` is passed. Events are written to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CARDMINT_LOG";

/// Default filter directive for the given debug flag.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

/// Build the filter from `$CARDMINT_LOG`, falling back to the default.
pub fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("still running");
    }
}
