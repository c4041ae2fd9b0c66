//! SSH command execution using russh crate

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use russh::keys::ssh_key;
use russh::keys::{PrivateKeyWithHashAlg, check_known_hosts, load_secret_key};
use russh::{ChannelMsg, Disconnect, client};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::ExecError;
use crate::profile::ConnectionProfile;
use crate::resolver::RemoteCommandSpec;
use crate::result::CommandStatus;
use crate::traits::RemoteRunner;

/// Upper bound on a connection attempt unless overridden
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// SSH client handler checking server keys against the user's known_hosts.
///
/// The posture is accept-new: a recorded host must present its recorded
/// key, an unrecorded host is accepted. A missing known_hosts file
/// disables the check.
#[derive(Debug)]
struct SshClientHandler {
    host: String,
    port: u16,
}

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        match check_known_hosts(&self.host, self.port, server_public_key) {
            Ok(true) => Ok(true),
            Ok(false) => {
                debug!(host = %self.host, "host not in known_hosts, accepting");
                Ok(true)
            }
            Err(e) => {
                warn!(host = %self.host, error = %e, "server key rejected by known_hosts");
                Ok(false)
            }
        }
    }
}

/// SSH-backed remote runner.
///
/// Each `execute` call opens a fresh connection, runs the single command,
/// and disconnects. Remote output is relayed to the local stdout and
/// stderr as it arrives rather than buffered until completion.
#[derive(Debug, Clone)]
pub struct SshRunner {
    connect_timeout: Duration,
}

impl SshRunner {
    /// Runner with the default connection time bound
    #[must_use]
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Override the connection time bound
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Connect and authenticate with the profile's key
    #[instrument(skip(self, profile), fields(host = %profile.host()))]
    async fn connect(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<client::Handle<SshClientHandler>, ExecError> {
        info!(
            host = %profile.host(),
            port = profile.port(),
            user = %profile.user(),
            "connecting to SSH"
        );

        let config = Arc::new(client::Config::default());
        let handler = SshClientHandler {
            host: profile.host().to_string(),
            port: profile.port(),
        };

        let mut session = timeout(
            self.connect_timeout,
            client::connect(config, (profile.host(), profile.port()), handler),
        )
        .await
        .map_err(|_| ExecError::ConnectTimeout {
            timeout: self.connect_timeout,
        })?
        .map_err(|e| match e {
            russh::Error::UnknownKey => ExecError::HostKeyMismatch {
                host: profile.host().to_string(),
            },
            e => ExecError::ConnectionFailed(e.to_string()),
        })?;

        let key_pair = load_secret_key(profile.key_path(), None)
            .map_err(|e| ExecError::KeyError(e.to_string()))?;

        let hash_alg = session
            .best_supported_rsa_hash()
            .await
            .ok()
            .flatten()
            .flatten();
        let auth_res = session
            .authenticate_publickey(
                profile.user(),
                PrivateKeyWithHashAlg::new(Arc::new(key_pair), hash_alg),
            )
            .await
            .map_err(|e| ExecError::AuthenticationFailed(e.to_string()))?;

        if !auth_res.success() {
            return Err(ExecError::AuthenticationFailed(
                "public key authentication rejected by server".to_string(),
            ));
        }

        info!(host = %profile.host(), "SSH connected and authenticated");

        Ok(session)
    }

    /// Run the command on an established session, relaying output
    async fn execute_remote(
        &self,
        session: &mut client::Handle<SshClientHandler>,
        spec: &RemoteCommandSpec,
    ) -> Result<CommandStatus, ExecError> {
        let cmd = spec.shell_line();

        debug!(command = %cmd, "executing remote command");

        let start = Instant::now();

        let mut channel = session
            .channel_open_session()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        channel
            .exec(true, cmd.as_str())
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let mut stdout = tokio::io::stdout();
        let mut stderr = tokio::io::stderr();
        let mut exit_code = None;

        // Drain until the channel closes. The exit status and trailing data
        // can arrive in either order, so Eof alone does not end the loop.
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => {
                    stdout
                        .write_all(&data)
                        .await
                        .map_err(|e| ExecError::IoError(e.to_string()))?;
                    stdout
                        .flush()
                        .await
                        .map_err(|e| ExecError::IoError(e.to_string()))?;
                }
                // ext 1 is stderr
                ChannelMsg::ExtendedData { data, ext } if ext == 1 => {
                    stderr
                        .write_all(&data)
                        .await
                        .map_err(|e| ExecError::IoError(e.to_string()))?;
                    stderr
                        .flush()
                        .await
                        .map_err(|e| ExecError::IoError(e.to_string()))?;
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    exit_code = Some(exit_status.cast_signed());
                }
                _ => {}
            }
        }

        let duration = start.elapsed();

        match exit_code {
            Some(exit_code) => {
                debug!(
                    command = %cmd,
                    status = exit_code,
                    duration = ?duration,
                    "remote command completed"
                );
                Ok(CommandStatus {
                    exit_code,
                    duration,
                })
            }
            None => Err(ExecError::NoExitStatus),
        }
    }
}

impl Default for SshRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteRunner for SshRunner {
    #[instrument(skip(self, profile, spec), fields(host = %profile.host(), command = %spec.name()))]
    async fn execute(
        &self,
        profile: &ConnectionProfile,
        spec: &RemoteCommandSpec,
    ) -> Result<CommandStatus, ExecError> {
        let mut session = self.connect(profile).await?;

        let result = self.execute_remote(&mut session, spec).await;

        // Disconnect on both paths; a failure here must not mask the result.
        if let Err(e) = session
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            debug!(host = %profile.host(), error = %e, "SSH disconnect failed");
        }

        result
    }
}
