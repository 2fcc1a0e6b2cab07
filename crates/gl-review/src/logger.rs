//! Stderr logging using env_logger
//!
//! The filter comes from `RUST_LOG` when set. Otherwise `-v` flags pick the
//! level, falling back to the configured `log_level` and then `warn`.

use env_logger::{Builder, Env};

/// Default filter for the given verbosity and configured level
fn default_filter(verbosity: u8, configured: Option<&str>) -> &str {
    match verbosity {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize logging to stderr
pub fn init(verbosity: u8, configured: Option<&str>) {
    Builder::from_env(Env::default().default_filter_or(default_filter(verbosity, configured)))
        .format_timestamp(None)
        .init();
}
