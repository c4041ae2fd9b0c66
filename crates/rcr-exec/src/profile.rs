//! Validated connection profile for the remote host

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::resolver::TargetOs;

/// Profile validation errors
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("user must not be empty")]
    EmptyUser,

    #[error("port must be in 1..=65535")]
    InvalidPort,

    #[error("key file not found: {0}")]
    KeyNotFound(String),

    #[error("key file permissions too open: {0} (should be 600)")]
    KeyPermissions(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connection parameters for the single configured remote host.
///
/// Every field is checked at construction, so a profile that exists is safe
/// to hand to a runner. Fields are read-only afterwards; a changed config
/// means building a new profile.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    host: String,
    user: String,
    key_path: PathBuf,
    port: u16,
    target_os: TargetOs,
}

impl ConnectionProfile {
    /// Build a profile, validating every field.
    ///
    /// # Errors
    /// Returns `ProfileError` if host or user is blank, the port is 0, or
    /// the key file is missing, unreadable, or has loose permissions.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        key_path: impl Into<PathBuf>,
        port: u16,
        target_os: TargetOs,
    ) -> Result<Self, ProfileError> {
        let host = host.into();
        let user = user.into();
        let key_path = key_path.into();

        if host.trim().is_empty() {
            return Err(ProfileError::EmptyHost);
        }
        if user.trim().is_empty() {
            return Err(ProfileError::EmptyUser);
        }
        if port == 0 {
            return Err(ProfileError::InvalidPort);
        }
        validate_key_file(&key_path)?;

        Ok(Self {
            host,
            user,
            key_path,
            port,
            target_os,
        })
    }

    /// Remote host name or address
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Login user on the remote host
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Path to the private key used for authentication
    #[must_use]
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// SSH port
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Operating system hint for the remote host
    #[must_use]
    pub fn target_os(&self) -> TargetOs {
        self.target_os
    }
}

fn validate_key_file(path: &Path) -> Result<(), ProfileError> {
    if !path.exists() {
        return Err(ProfileError::KeyNotFound(path.display().to_string()));
    }
    // Open rather than just stat, so unreadable files fail here and not
    // mid-connection.
    File::open(path)?;
    validate_key_permissions(path)
}

#[cfg(unix)]
fn validate_key_permissions(path: &Path) -> Result<(), ProfileError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let mode = metadata.permissions().mode();

    // mode & 0o77 checks group and other permissions
    if mode & 0o77 != 0 {
        return Err(ProfileError::KeyPermissions(path.display().to_string()));
    }

    Ok(())
}

#[cfg(not(unix))]
fn validate_key_permissions(_path: &Path) -> Result<(), ProfileError> {
    Ok(())
}
