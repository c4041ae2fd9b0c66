//! Error types for rcr-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during remote execution.
///
/// A remote command that runs to completion with a non-zero exit status is
/// not an error; these variants cover everything that prevents the command
/// from reporting an exit status at all.
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Failed to connect to the remote host
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection attempt exceeded its time bound
    #[error("connection attempt timed out after {timeout:?}")]
    ConnectTimeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Server key does not match the recorded known_hosts entry
    #[error("host key mismatch for {host}: server identity changed")]
    HostKeyMismatch {
        /// Host whose recorded key no longer matches
        host: String,
    },

    /// Authentication failed
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// SSH key error
    #[error("SSH key error: {0}")]
    KeyError(String),

    /// I/O error during execution
    #[error("I/O error: {0}")]
    IoError(String),

    /// Session ended before the remote command reported an exit status
    #[error("session closed before the remote command reported an exit status")]
    NoExitStatus,
}
