use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging for the command line driver.
///
/// Logs go to stderr so stdout carries only the policy or query output.
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "gridq=debug" } else { "gridq=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // Already initialised elsewhere
    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
