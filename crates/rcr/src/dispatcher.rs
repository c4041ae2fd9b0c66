//! Top-level orchestration: load the profile, resolve the command, run it,
//! and map the outcome to a process exit code.

use rcr_exec::{ConnectionProfile, RemoteRunner, ResolveError, resolve};
use tracing::debug;

use crate::cli;
use crate::config::ProfileSource;

/// Process exit codes for failures that happen before or instead of the
/// remote command. A completed remote command exits with its own code, so
/// these sit in ranges scripts rarely use; collisions with a remote command
/// that itself exits 64, 65, 78, or 255 are accepted.
pub mod exit {
    /// No command given, or a first-class command missing its arguments (EX_USAGE)
    pub const USAGE: i32 = 64;
    /// Command name that is not a single word (EX_DATAERR)
    pub const MALFORMED: i32 = 65;
    /// Missing or invalid configuration (EX_CONFIG)
    pub const CONFIG: i32 = 78;
    /// Interrupted by Ctrl-C (128 + SIGINT)
    pub const INTERRUPTED: i32 = 130;
    /// Connection-level failure, matching the OpenSSH client convention
    pub const CONNECTION: i32 = 255;
}

/// Run one invocation. `tokens` is the remote command name followed by its
/// arguments; the returned value is the process exit code.
///
/// The profile is loaded only after the invocation shape is known to be
/// valid, so `rcr` with no command never touches configuration.
pub async fn run(
    tokens: &[String],
    profiles: &dyn ProfileSource,
    runner: &dyn RemoteRunner,
) -> i32 {
    let Some((name, args)) = tokens.split_first() else {
        cli::print_usage();
        return exit::USAGE;
    };

    let profile = match profiles.load() {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("{e}");
            return exit::CONFIG;
        }
    };

    let spec = match resolve(name, args, profile.target_os()) {
        Ok(spec) => spec,
        Err(e @ ResolveError::MissingArgs { .. }) => {
            eprintln!("{e}");
            return exit::USAGE;
        }
        Err(e @ ResolveError::MalformedName(_)) => {
            eprintln!("{e}");
            return exit::MALFORMED;
        }
    };

    print_banner(&profile, spec.name()).await;

    tokio::select! {
        result = runner.execute(&profile, &spec) => match result {
            Ok(status) => {
                debug!(
                    exit_code = status.exit_code,
                    duration = ?status.duration,
                    "remote command finished"
                );
                status.exit_code
            }
            Err(e) => {
                eprintln!("{e}");
                exit::CONNECTION
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // Dropping the execute future tears down the session; the
            // remote process is not signalled.
            eprintln!("interrupted");
            exit::INTERRUPTED
        }
    }
}

/// Banner printed before execution, announcing what runs where
async fn print_banner(profile: &ConnectionProfile, label: &str) {
    let ip = resolve_ip(profile.host(), profile.port()).await;
    println!("Running {label} on host {} with IP {ip}", profile.host());
}

/// First resolved address for the host, or "unknown". Resolution failures
/// never block execution; the connection attempt does its own lookup.
async fn resolve_ip(host: &str, port: u16) -> String {
    match tokio::net::lookup_host((host, port)).await {
        Ok(mut addrs) => addrs
            .next()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        Err(_) => "unknown".to_string(),
    }
}
