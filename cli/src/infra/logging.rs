//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CATS_LOG=cats_cli=debug`.
pub const LOG_ENV: &str = "CATS_LOG";

/// Install the global subscriber. Logs go to stderr so stdout stays
/// parseable under `--json`.
///
/// `verbose` raises the default level from `warn` to `debug`; an explicit
/// `CATS_LOG` always wins.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
