//! Configuration loading and the profile source seam

use std::env;
use std::path::{Path, PathBuf};

use rcr_exec::{ConnectionProfile, ProfileError, TargetOs};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "RCR_CONFIG";

const DEFAULT_PORT: i64 = 22;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("config file not found: {0}\ncreate it with a [remote] section (host, user, key, port)")]
    NotFound(String),

    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    /// `[remote]` section absent
    #[error("[remote] section missing in {0}")]
    MissingSection(String),

    /// Required keys absent or blank, all reported at once
    #[error("missing values in [remote] section: {0}")]
    MissingValues(String),

    /// Port outside the valid range
    #[error("invalid port in config: {0} (must be in 1..=65535)")]
    InvalidPort(i64),

    /// Unrecognized os hint
    #[error("invalid os in config: {0:?} (expected \"unix\" or \"windows\")")]
    InvalidOs(String),

    /// Field-level validation failure
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Where the connection profile comes from.
///
/// The dispatcher only sees this trait, so tests substitute canned or
/// failing sources without touching the filesystem.
pub trait ProfileSource: Send + Sync {
    /// Load and validate the connection profile.
    ///
    /// # Errors
    /// Returns `ConfigError` if the source is missing, malformed, or fails
    /// field validation.
    fn load(&self) -> Result<ConnectionProfile, ConfigError>;
}

/// Raw config file shape; every key optional so validation can report what
/// is actually missing instead of failing on the first absence.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    remote: Option<RemoteSection>,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteSection {
    host: Option<String>,
    user: Option<String>,
    key: Option<String>,
    port: Option<i64>,
    os: Option<String>,
}

/// TOML-file backed profile source
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading from an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Source honoring `RCR_CONFIG`, falling back to the per-user config
    /// directory.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::new(path);
        }
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("rcr").join("config.toml"))
    }

    /// Path this source reads from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileSource for FileSource {
    fn load(&self) -> Result<ConnectionProfile, ConfigError> {
        let display = self.path.display().to_string();

        if !self.path.exists() {
            return Err(ConfigError::NotFound(display));
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display.clone(),
            source,
        })?;
        let section = raw.remote.ok_or(ConfigError::MissingSection(display))?;

        validate(section)
    }
}

/// Turn the raw section into a validated profile, reporting every missing
/// required key in one message.
fn validate(section: RemoteSection) -> Result<ConnectionProfile, ConfigError> {
    let host = section.host.unwrap_or_default();
    let user = section.user.unwrap_or_default();
    let key = section.key.unwrap_or_default();

    let missing: Vec<&str> = [("host", &host), ("user", &user), ("key", &key)]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingValues(missing.join(", ")));
    }

    let port = section.port.unwrap_or(DEFAULT_PORT);
    if !(1..=65535).contains(&port) {
        return Err(ConfigError::InvalidPort(port));
    }

    let target_os = match section.os {
        None => TargetOs::Unknown,
        Some(value) => match value.parse() {
            Ok(os) => os,
            Err(()) => return Err(ConfigError::InvalidOs(value)),
        },
    };

    Ok(ConnectionProfile::new(
        host,
        user,
        key,
        port as u16,
        target_os,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_key(dir: &Path) -> PathBuf {
        let path = dir.join("id_ed25519");
        fs::write(&path, "dummy key material").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        }
        path
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn full_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let key = write_key(dir.path());
        let config = write_config(
            dir.path(),
            &format!(
                "[remote]\nhost = \"server1.example.com\"\nuser = \"deploy\"\nkey = {:?}\nport = 2222\nos = \"unix\"\n",
                key
            ),
        );

        let profile = FileSource::new(config).load().unwrap();

        assert_eq!(profile.host(), "server1.example.com");
        assert_eq!(profile.user(), "deploy");
        assert_eq!(profile.port(), 2222);
        assert_eq!(profile.target_os(), TargetOs::Unix);
    }

    #[test]
    fn port_defaults_to_22() {
        let dir = tempfile::tempdir().unwrap();
        let key = write_key(dir.path());
        let config = write_config(
            dir.path(),
            &format!(
                "[remote]\nhost = \"h.example\"\nuser = \"deploy\"\nkey = {:?}\n",
                key
            ),
        );

        let profile = FileSource::new(config).load().unwrap();
        assert_eq!(profile.port(), 22);
        assert_eq!(profile.target_os(), TargetOs::Unknown);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path().join("absent.toml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn missing_section_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), "[other]\nvalue = 1\n");

        let err = FileSource::new(config).load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection(_)));
    }

    #[test]
    fn all_missing_values_reported_at_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), "[remote]\nuser = \"deploy\"\n");

        let err = FileSource::new(config).load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingValues(ref v) if v == "host, key"));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let key = write_key(dir.path());
        let config = write_config(
            dir.path(),
            &format!("[remote]\nhost = \"h.example\"\nuser = \"  \"\nkey = {:?}\n", key),
        );

        let err = FileSource::new(config).load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingValues(ref v) if v == "user"));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let key = write_key(dir.path());
        let config = write_config(
            dir.path(),
            &format!(
                "[remote]\nhost = \"h.example\"\nuser = \"deploy\"\nkey = {:?}\nport = 70000\n",
                key
            ),
        );

        let err = FileSource::new(config).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(70000)));
    }

    #[test]
    fn non_numeric_port_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[remote]\nhost = \"h.example\"\nuser = \"deploy\"\nkey = \"/k\"\nport = \"abc\"\n",
        );

        let err = FileSource::new(config).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_os_hint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let key = write_key(dir.path());
        let config = write_config(
            dir.path(),
            &format!(
                "[remote]\nhost = \"h.example\"\nuser = \"deploy\"\nkey = {:?}\nos = \"plan9\"\n",
                key
            ),
        );

        let err = FileSource::new(config).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOs(ref v) if v == "plan9"));
    }

    #[test]
    fn bad_key_path_surfaces_profile_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[remote]\nhost = \"h.example\"\nuser = \"deploy\"\nkey = \"/no/such/key\"\n",
        );

        let err = FileSource::new(config).load().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Profile(ProfileError::KeyNotFound(_))
        ));
    }

    #[test]
    fn env_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("override.toml");

        // SAFETY: no other test reads or writes this variable
        unsafe { env::set_var(CONFIG_ENV_VAR, &path) };
        let source = FileSource::from_env();
        unsafe { env::remove_var(CONFIG_ENV_VAR) };

        assert_eq!(source.path(), path);
    }
}
