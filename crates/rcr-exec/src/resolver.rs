//! Command name resolution

use std::str::FromStr;

use thiserror::Error;

/// Remote operating system hint.
///
/// Carried as metadata on resolved commands; resolution does not rewrite
/// tokens based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetOs {
    /// Unix-like remote (Linux, BSD, macOS)
    Unix,
    /// Windows remote
    Windows,
    /// No hint configured
    #[default]
    Unknown,
}

impl FromStr for TargetOs {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unix" => Ok(TargetOs::Unix),
            "windows" => Ok(TargetOs::Windows),
            _ => Err(()),
        }
    }
}

/// Command resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Command name is not a single word
    #[error("malformed command name {0:?}: must be a single word without whitespace")]
    MalformedName(String),

    /// First-class command called without its required arguments
    #[error("rcr {command} requires {requirement}.\nExample: {example}")]
    MissingArgs {
        /// Command that was invoked
        command: &'static str,
        /// What the command needs
        requirement: &'static str,
        /// Invocation to show the user
        example: &'static str,
    },
}

/// A resolved remote command: the exact tokens to run, plus the OS hint
/// that was in effect when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommandSpec {
    tokens: Vec<String>,
    target_os: TargetOs,
}

impl RemoteCommandSpec {
    /// Command name (first token)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.tokens[0]
    }

    /// Full token list, name first
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// OS hint carried for a future per-OS flag policy
    #[must_use]
    pub fn target_os(&self) -> TargetOs {
        self.target_os
    }

    /// Single command line for the remote shell, with each token quoted so
    /// argument boundaries survive the exec string.
    #[must_use]
    pub fn shell_line(&self) -> String {
        self.tokens
            .iter()
            .map(|t| shell_quote(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Turn a command name and its arguments into a runnable spec.
///
/// `ping` and `nslookup` are first class: they resolve like any other
/// command but require at least one argument, so a bare invocation gets a
/// usage hint instead of a confusing remote error. Every other name passes
/// through untouched with its arguments.
///
/// # Errors
/// `MalformedName` if the name is empty or contains whitespace;
/// `MissingArgs` for a bare `ping` or `nslookup`.
pub fn resolve(
    name: &str,
    args: &[String],
    target_os: TargetOs,
) -> Result<RemoteCommandSpec, ResolveError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ResolveError::MalformedName(name.to_string()));
    }

    match name {
        "ping" if args.is_empty() => {
            return Err(ResolveError::MissingArgs {
                command: "ping",
                requirement: "ping arguments",
                example: "rcr ping 8.8.8.8 -c 4",
            });
        }
        "nslookup" if args.is_empty() => {
            return Err(ResolveError::MissingArgs {
                command: "nslookup",
                requirement: "a hostname",
                example: "rcr nslookup example.com",
            });
        }
        _ => {}
    }

    // TODO: translate ping's count flag per target OS (-c on unix, -n on
    // windows); tokens currently pass through exactly as given.
    let mut tokens = Vec::with_capacity(args.len() + 1);
    tokens.push(name.to_string());
    tokens.extend(args.iter().cloned());

    Ok(RemoteCommandSpec { tokens, target_os })
}

/// Shell-escape a token for embedding in the single exec string.
///
/// Plain tokens pass through unchanged; anything else is single-quoted with
/// embedded quotes rewritten as `'\''`.
fn shell_quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}
