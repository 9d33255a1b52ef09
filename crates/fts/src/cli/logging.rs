//! Diagnostic logging setup for the `fts` binary.

use std::{env, io};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "FTS_LOG";

/// Installs a stderr subscriber when logging was requested.
///
/// `FTS_LOG` takes precedence over `RUST_LOG`; without either, `-v` enables
/// debug output and `-vv` trace output for the fts crates.
pub fn init_tracing(verbose: u8) {
    let directive = env::var(LOG_ENV)
        .or_else(|_| env::var(EnvFilter::DEFAULT_ENV))
        .ok()
        .or_else(|| default_directive(verbose).map(str::to_owned));
    let Some(directive) = directive else {
        return;
    };

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("warning: ignoring invalid log filter '{directive}': {e}");
        EnvFilter::new("warn")
    });
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

/// Filter used when only `-v` flags were given.
fn default_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("fts=debug,fts_query=debug,fts_config=debug"),
        _ => Some("fts=trace,fts_query=trace,fts_config=trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), None);
        assert!(default_directive(1).is_some_and(|d| d.contains("fts_query=debug")));
        assert!(default_directive(3).is_some_and(|d| d.contains("fts_query=trace")));
    }
}
