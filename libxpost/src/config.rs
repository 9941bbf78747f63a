//! Configuration for xpost
//!
//! All configuration comes from the process environment: four credential
//! variables for the X API plus optional path overrides for local state.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, PlatformError, Result};

/// Environment variable holding the API (consumer) key.
pub const ENV_API_KEY: &str = "X_API_KEY";
/// Environment variable holding the API (consumer) key secret.
pub const ENV_API_KEY_SECRET: &str = "X_API_KEY_SECRET";
/// Environment variable holding the user access token.
pub const ENV_ACCESS_TOKEN: &str = "X_ACCESS_TOKEN";
/// Environment variable holding the user access token secret.
pub const ENV_ACCESS_TOKEN_SECRET: &str = "X_ACCESS_TOKEN_SECRET";

/// Override for the history file location.
pub const ENV_HISTORY_FILE: &str = "XPOST_HISTORY_FILE";
/// Override for the screenshots/render output directory.
pub const ENV_SCREENSHOTS_DIR: &str = "XPOST_SCREENSHOTS_DIR";

/// OAuth 1.0a user-context credentials for the X API.
///
/// Read once at construction. Missing variables are not an error here:
/// they surface as `PlatformError::Authentication` on the first API call.
pub struct Credentials {
    api_key: Option<SecretString>,
    api_key_secret: Option<SecretString>,
    access_token: Option<SecretString>,
    access_token_secret: Option<SecretString>,
}

/// Borrowed view of a complete credential set, handed to the request signer.
#[derive(Debug)]
pub struct CredentialSet<'a> {
    pub api_key: &'a str,
    pub api_key_secret: &'a str,
    pub access_token: &'a str,
    pub access_token_secret: &'a str,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self {
            api_key: read_secret(ENV_API_KEY),
            api_key_secret: read_secret(ENV_API_KEY_SECRET),
            access_token: read_secret(ENV_ACCESS_TOKEN),
            access_token_secret: read_secret(ENV_ACCESS_TOKEN_SECRET),
        }
    }

    /// Construct credentials directly. Used by tests.
    pub fn new(
        api_key: impl Into<String>,
        api_key_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Some(SecretString::from(api_key.into())),
            api_key_secret: Some(SecretString::from(api_key_secret.into())),
            access_token: Some(SecretString::from(access_token.into())),
            access_token_secret: Some(SecretString::from(access_token_secret.into())),
        }
    }

    /// Credentials with nothing set. Any use fails with an authentication
    /// error naming the missing variables.
    pub fn unset() -> Self {
        Self {
            api_key: None,
            api_key_secret: None,
            access_token: None,
            access_token_secret: None,
        }
    }

    /// Expose the full credential set, or fail naming the missing variables.
    pub fn require(&self) -> std::result::Result<CredentialSet<'_>, PlatformError> {
        if let (Some(api_key), Some(api_key_secret), Some(access_token), Some(access_token_secret)) = (
            &self.api_key,
            &self.api_key_secret,
            &self.access_token,
            &self.access_token_secret,
        ) {
            return Ok(CredentialSet {
                api_key: api_key.expose_secret(),
                api_key_secret: api_key_secret.expose_secret(),
                access_token: access_token.expose_secret(),
                access_token_secret: access_token_secret.expose_secret(),
            });
        }

        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push(ENV_API_KEY);
        }
        if self.api_key_secret.is_none() {
            missing.push(ENV_API_KEY_SECRET);
        }
        if self.access_token.is_none() {
            missing.push(ENV_ACCESS_TOKEN);
        }
        if self.access_token_secret.is_none() {
            missing.push(ENV_ACCESS_TOKEN_SECRET);
        }
        Err(PlatformError::Authentication(format!(
            "missing credentials: set {}",
            missing.join(", ")
        )))
    }
}

fn read_secret(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

/// Resolve the history file path.
///
/// `XPOST_HISTORY_FILE` (tilde-expanded) wins; otherwise
/// `<data dir>/xpost/post-history.json` per the XDG base directory spec.
pub fn history_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(ENV_HISTORY_FILE) {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingDirectory("data directory".to_string()))?;

    Ok(data_dir.join("xpost").join("post-history.json"))
}

/// Resolve (and create) the directory where screenshots and renders land.
pub fn screenshots_dir() -> Result<PathBuf> {
    let dir = if let Ok(path) = std::env::var(ENV_SCREENSHOTS_DIR) {
        PathBuf::from(shellexpand::tilde(&path).to_string())
    } else {
        dirs::data_dir()
            .ok_or_else(|| ConfigError::MissingDirectory("data directory".to_string()))?
            .join("xpost")
            .join("screenshots")
    };

    std::fs::create_dir_all(&dir).map_err(ConfigError::Io)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_with_all_credentials() {
        let creds = Credentials::new("k", "ks", "t", "ts");
        let set = creds.require().unwrap();
        assert_eq!(set.api_key, "k");
        assert_eq!(set.access_token_secret, "ts");
    }

    #[test]
    fn test_require_names_missing_variables() {
        let creds = Credentials {
            api_key: Some(SecretString::from("k".to_string())),
            api_key_secret: None,
            access_token: None,
            access_token_secret: Some(SecretString::from("ts".to_string())),
        };

        let err = creds.require().unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains(ENV_API_KEY_SECRET));
        assert!(msg.contains(ENV_ACCESS_TOKEN));
    }
}
