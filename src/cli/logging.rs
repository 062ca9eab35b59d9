use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber for the binary.
///
/// `RUST_LOG` takes precedence; otherwise `-v` raises the level from warn to
/// info, and `-vv` to debug.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("testrun_report={}", level)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
