//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Create an environment filter based on verbosity level
fn create_env_filter(verbosity: u8) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        // Use RUST_LOG if set (allows debugging russh and other dependencies)
        EnvFilter::from_default_env()
    } else {
        match verbosity {
            0 => EnvFilter::new("rcr=warn,rcr_exec=warn"),
            1 => EnvFilter::new("rcr=info,rcr_exec=info"),
            // -vv: include russh debug logs for SSH troubleshooting
            _ => EnvFilter::new("rcr=debug,rcr_exec=debug,russh=debug"),
        }
    }
}

/// Initialize console logging.
///
/// Logs go to stderr so the remote command's stdout stays clean for
/// scripting.
pub fn init(verbosity: u8) {
    let filter = create_env_filter(verbosity);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
