//! Interpretation of UGS server responses.
//!
//! The connectivity probe and the badge publish share the same error-body
//! handling: an error response may carry `{"message": "..."}`, which is used
//! when present.

use serde_json::Value;

/// Reported when the server rejects the configured credentials.
pub const AUTHORIZATION_ERROR_MESSAGE: &str = "Check username & password for RUGS";

/// Reported when an error response has no body at all.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Empty HTTP response";

/// Reported when an error body carries no usable `message`.
pub const GENERIC_RESPONSE_MESSAGE: &str = "HTTP response error";

/// An unexpected HTTP status with the best message that could be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub message: String,
}

/// Classification of a connectivity probe response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Ok,
    AuthFailure,
    /// The endpoint answered but rejected the synthetic request.
    BadRequestIgnored,
    GenericError(HttpFailure),
}

impl ProbeOutcome {
    /// Whether the probe proves the server is reachable with valid
    /// credentials.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::BadRequestIgnored)
    }
}

/// Classifies the response to `GET /api/rugs_metrics`.
#[must_use]
pub fn classify_response(status: u16, body: Option<&str>) -> ProbeOutcome {
    match status {
        401 | 403 => ProbeOutcome::AuthFailure,
        400 => ProbeOutcome::BadRequestIgnored,
        200 => ProbeOutcome::Ok,
        _ => ProbeOutcome::GenericError(http_failure(status, body)),
    }
}

/// Classifies the response to `POST /api/build`.
///
/// Anything below 400 is accepted. Authorization failures are not singled out
/// here; they surface as a generic [`HttpFailure`].
///
/// # Errors
///
/// Returns the [`HttpFailure`] for any status of 400 or above.
pub fn classify_publish_response(status: u16, body: Option<&str>) -> Result<(), HttpFailure> {
    if status >= 400 {
        return Err(http_failure(status, body));
    }
    Ok(())
}

fn http_failure(status: u16, body: Option<&str>) -> HttpFailure {
    let message = match body {
        None => EMPTY_RESPONSE_MESSAGE.to_string(),
        Some(content) => {
            body_message(content).unwrap_or_else(|| GENERIC_RESPONSE_MESSAGE.to_string())
        }
    };

    HttpFailure { status, message }
}

/// Reads `message` from a JSON object body. Scalar messages are taken as
/// their text; anything that is not an object yields `None`.
fn body_message(content: &str) -> Option<String> {
    let value: Value = serde_json::from_str(content).ok()?;
    match value.as_object()?.get("message")? {
        Value::String(message) => Some(message.clone()),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
