use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `--verbose` turns on debug events for this crate; otherwise `RUST_LOG`
/// is honoured and defaults to warnings only, so stdout stays clean for
/// command output.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("iterablectl=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
