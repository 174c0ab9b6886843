//! Errors surfaced to the CI host.

use ugs_core::{AUTHORIZATION_ERROR_MESSAGE, HttpFailure, RequestBuildError};

/// Errors that can occur while publishing a badge for a lifecycle event.
///
/// None of these are retried; each is reported once and returned to the
/// caller.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PublishError {
    /// The build's revision does not carry a change number.
    #[error(transparent)]
    InvalidRevision(#[from] RequestBuildError),

    /// The UGS server answered with an error status.
    #[error("UGS responded with {status} {status_text}: {message}")]
    Http {
        status: u16,
        status_text: String,
        message: String,
    },

    /// The badge update could not be encoded as JSON.
    #[error("failed to serialize badge update: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The transport failed before an HTTP response was received.
    #[error("request to UGS failed: {0}")]
    Transport(#[source] anyhow::Error),
}

impl PublishError {
    pub(crate) fn http(failure: HttpFailure, status_text: &str) -> Self {
        Self::Http {
            status: failure.status,
            status_text: status_text.to_string(),
            message: failure.message,
        }
    }
}

/// Why a connectivity probe failed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// The server rejected the configured credentials.
    #[error("{}", AUTHORIZATION_ERROR_MESSAGE)]
    Unauthorized,

    /// The server answered with an unexpected status.
    #[error("UGS responded with {status} {status_text}: {message}")]
    Http {
        status: u16,
        status_text: String,
        message: String,
    },

    /// The transport failed before an HTTP response was received.
    #[error("request to UGS failed: {0}")]
    Transport(#[source] anyhow::Error),
}

/// A failed connection test, phrased for the settings UI.
#[derive(Debug, thiserror::Error)]
#[error("UGS publisher has failed to test connection to server {server_url}")]
pub struct ConnectionTestError {
    pub server_url: String,
    #[source]
    pub source: ProbeError,
}
