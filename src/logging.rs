use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` when `verbose`.
/// Calling this twice is harmless, the second subscriber is just not installed.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jackson_fixup={}", default_level)));

    let result = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(verbose)
        .without_time()
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: Logger initialization failed: {}", e);
    }
}
