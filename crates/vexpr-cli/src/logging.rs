//! Diagnostic output on stderr.
//!
//! The filter comes from `VEXPR_LOG` (same syntax as `RUST_LOG`). An explicit
//! `-v`/`-vv` on the command line wins over the environment.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "VEXPR_LOG";

pub fn init(verbosity: u8) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if verbosity == 0 => EnvFilter::new(directives),
        _ => EnvFilter::new(default_directive(verbosity)),
    };
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}

pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
