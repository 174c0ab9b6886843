//! Publisher configuration.
//!
//! A CI host stores one configuration per build configuration and hands it to
//! the publisher as a flat parameter map (see [`keys`]). The same settings can
//! also be read from a TOML file:
//!
//! ```toml
//! server_url = "https://ugs.example.com"
//! project = "//depot/Main/Game"
//! badge_name = "Editor"
//! auth_user = "ci"
//! auth_password = "hunter2"
//! ```
//!
//! Configurations are validated once, when saved or loaded, and then reused
//! for every event.

use std::{collections::HashMap, fmt, path::Path};

use serde::{Deserialize, Serialize};

/// Parameter keys used by CI hosts.
pub mod keys {
    pub const SERVER_URL: &str = "ugsServerUrl";
    pub const AUTH_USER: &str = "ugsAuthUser";
    /// Stored by the host in its secure parameter storage.
    pub const AUTH_PASSWORD: &str = "secure:ugsAuthPassword";
    pub const PROJECT: &str = "ugsProject";
    pub const BADGE_NAME: &str = "ugsBadgeName";
}

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// I/O error when reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error when a config file is malformed.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// One or more required settings are missing.
    #[error("invalid configuration: {}", describe_invalid(.0))]
    Invalid(Vec<InvalidProperty>),
}

fn describe_invalid(properties: &[InvalidProperty]) -> String {
    properties
        .iter()
        .map(|property| format!("{} ({})", property.message, property.key))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A setting that failed validation, keyed by its host parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidProperty {
    pub key: &'static str,
    pub message: &'static str,
}

/// Secret password for HTTP basic auth. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AuthPassword(String);

impl AuthPassword {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthPassword(****)")
    }
}

/// Username and password for HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: AuthPassword,
}

/// Settings for publishing badges to one UGS server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublisherConfig {
    pub server_url: String,
    pub project: String,
    /// Shown by UGS as the badge label (`BuildType` on the wire).
    pub badge_name: String,
    #[serde(default)]
    pub auth_user: Option<String>,
    #[serde(default)]
    pub auth_password: Option<AuthPassword>,
}

impl PublisherConfig {
    /// Creates an unauthenticated configuration.
    #[must_use]
    pub fn new(
        server_url: impl Into<String>,
        project: impl Into<String>,
        badge_name: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            project: project.into(),
            badge_name: badge_name.into(),
            auth_user: None,
            auth_password: None,
        }
    }

    #[must_use]
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth_user = Some(user.into());
        self.auth_password = Some(AuthPassword::new(password));
        self
    }

    /// Reads the configuration from a host parameter map.
    ///
    /// Missing required keys become empty strings so that [`Self::validate`]
    /// can report them; blank credentials are treated as absent.
    #[must_use]
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let required = |key: &str| params.get(key).cloned().unwrap_or_default();
        let optional = |key: &str| {
            params
                .get(key)
                .filter(|value| !value.trim().is_empty())
                .cloned()
        };

        Self {
            server_url: required(keys::SERVER_URL),
            project: required(keys::PROJECT),
            badge_name: required(keys::BADGE_NAME),
            auth_user: optional(keys::AUTH_USER),
            auth_password: optional(keys::AUTH_PASSWORD).map(AuthPassword),
        }
    }

    /// Parses a TOML document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if required settings are blank.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validated()
    }

    /// Loads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Lists every required setting that is missing or blank.
    #[must_use]
    pub fn validate(&self) -> Vec<InvalidProperty> {
        [
            (&self.server_url, keys::SERVER_URL, "URL must be specified"),
            (&self.project, keys::PROJECT, "Project must be specified"),
            (
                &self.badge_name,
                keys::BADGE_NAME,
                "Badge name must be specified",
            ),
        ]
        .into_iter()
        .filter(|(value, _, _)| value.trim().is_empty())
        .map(|(_, key, message)| InvalidProperty { key, message })
        .collect()
    }

    /// Returns the configuration if it passes [`Self::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every failed setting.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let invalid = self.validate();
        if invalid.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(invalid))
        }
    }

    /// Basic-auth credentials, present only when both a user and a password
    /// are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<BasicCredentials> {
        match (&self.auth_user, &self.auth_password) {
            (Some(username), Some(password)) => Some(BasicCredentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}
