//! Remote runner trait

use async_trait::async_trait;

use crate::error::ExecError;
use crate::profile::ConnectionProfile;
use crate::resolver::RemoteCommandSpec;
use crate::result::CommandStatus;

/// The seam between dispatch and the network.
///
/// Implementations open a connection described by the profile, run the
/// resolved command, relay its output, and report the exit status. Test
/// doubles implement this without touching a socket.
#[async_trait]
pub trait RemoteRunner: Send + Sync {
    /// Run `spec` on the host described by `profile` and return the remote
    /// exit status.
    ///
    /// # Errors
    /// Any failure before the remote command could report an exit status:
    /// connection, host key, authentication, or a session that dies mid-run.
    async fn execute(
        &self,
        profile: &ConnectionProfile,
        spec: &RemoteCommandSpec,
    ) -> Result<CommandStatus, ExecError>;
}
