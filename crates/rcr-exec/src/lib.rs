//! rcr-exec: Remote execution for rcr
//!
//! Provides the validated connection profile, command resolution, and the
//! SSH-backed runner behind the `RemoteRunner` trait.

pub mod error;
pub mod profile;
pub mod resolver;
pub mod result;
pub mod ssh;
pub mod traits;

pub use error::ExecError;
pub use profile::{ConnectionProfile, ProfileError};
pub use resolver::{RemoteCommandSpec, ResolveError, TargetOs, resolve};
pub use result::CommandStatus;
pub use ssh::{DEFAULT_CONNECT_TIMEOUT, SshRunner};
pub use traits::RemoteRunner;
