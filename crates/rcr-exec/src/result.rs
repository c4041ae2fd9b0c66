//! Result types for command execution

use std::time::Duration;

/// Outcome of a remote command that ran to completion.
///
/// Output is relayed to the local terminal while the command runs, so only
/// the exit status and timing are captured here. A non-zero exit code is a
/// completed execution, not an error.
#[derive(Debug, Clone)]
pub struct CommandStatus {
    /// Exit status code reported by the remote process (0 for success)
    pub exit_code: i32,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandStatus {
    /// Check if the remote command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
