//! Structured logging to stderr.
//!
//! `RUST_LOG` wins when set. Otherwise `-v` raises every `rewind*` target to
//! debug and `-vv` to trace; everything else stays at warn.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,rewind=debug",
        _ => "warn,rewind=trace",
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_parse() {
        for verbosity in 0..4 {
            let directive = default_directive(verbosity);
            assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
        }
    }

    #[test]
    fn init_twice_is_harmless() {
        init(0);
        init(2);
    }
}
