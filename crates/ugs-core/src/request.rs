//! Construction of the badge update posted to `/api/build`.

use serde::Serialize;

use crate::{BadgeResult, PublisherConfig};

/// Errors that can occur when building a publish request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RequestBuildError {
    /// The revision does not end in a base-10 change number.
    #[error("revision '{revision}' is not a valid change number")]
    InvalidRevision { revision: String },
}

/// Everything needed to post one badge update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub server_url: String,
    pub project: String,
    pub badge_name: String,
    pub change_number: i32,
    /// Wire code of the badge, see [`BadgeResult::ugs_value`].
    pub result: u8,
    pub url: Option<String>,
}

/// JSON body accepted by `POST /api/build`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishBody<'a> {
    pub change_number: i32,
    pub project: &'a str,
    pub build_type: &'a str,
    pub result: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
}

impl PublishRequest {
    /// The endpoint this request is posted to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        post_badge_url(&self.server_url)
    }

    #[must_use]
    pub fn body(&self) -> PublishBody<'_> {
        PublishBody {
            change_number: self.change_number,
            project: &self.project,
            build_type: &self.badge_name,
            result: self.result,
            url: self.url.as_deref(),
        }
    }
}

/// Builds the request that reports `badge` for `revision_id`.
///
/// # Errors
///
/// Returns [`RequestBuildError::InvalidRevision`] if no change number can be
/// parsed from `revision_id`.
pub fn build_publish_request(
    config: &PublisherConfig,
    revision_id: &str,
    badge: BadgeResult,
    target_url: Option<&str>,
) -> Result<PublishRequest, RequestBuildError> {
    let change_number = parse_change_number(revision_id)?;

    Ok(PublishRequest {
        server_url: config.server_url.clone(),
        project: config.project.clone(),
        badge_name: config.badge_name.clone(),
        change_number,
        result: badge.ugs_value(),
        url: target_url.map(str::to_string),
    })
}

/// Extracts the change number from a revision identifier.
///
/// Feature-branch revisions look like `main|123`; only the part after the
/// last `|` is parsed.
///
/// # Errors
///
/// Returns [`RequestBuildError::InvalidRevision`] if that part is not a
/// base-10 `i32`.
pub fn parse_change_number(revision_id: &str) -> Result<i32, RequestBuildError> {
    let number = revision_id.rsplit('|').next().unwrap_or(revision_id);

    number
        .parse::<i32>()
        .map_err(|_| RequestBuildError::InvalidRevision {
            revision: revision_id.to_string(),
        })
}

/// `{server_url}/api/build`
#[must_use]
pub fn post_badge_url(server_url: &str) -> String {
    format!("{}/api/build", trim_server_url(server_url))
}

/// `{server_url}/api/rugs_metrics`
#[must_use]
pub fn metrics_url(server_url: &str) -> String {
    format!("{}/api/rugs_metrics", trim_server_url(server_url))
}

fn trim_server_url(server_url: &str) -> &str {
    server_url.trim().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> PublisherConfig {
        PublisherConfig::new("https://ugs.example.com", "//depot/Main/Game", "Editor")
    }

    #[test]
    fn test_build_publish_request_populates_fields() {
        let request = build_publish_request(
            &config(),
            "12345",
            BadgeResult::Warning,
            Some("https://ci.example.com/build/1"),
        )
        .unwrap();

        assert_eq!(
            request,
            PublishRequest {
                server_url: "https://ugs.example.com".to_string(),
                project: "//depot/Main/Game".to_string(),
                badge_name: "Editor".to_string(),
                change_number: 12345,
                result: 2,
                url: Some("https://ci.example.com/build/1".to_string()),
            }
        );
    }

    #[test]
    fn test_non_numeric_revision_is_rejected() {
        let err = build_publish_request(&config(), "abc", BadgeResult::Success, None).unwrap_err();

        assert_eq!(
            err,
            RequestBuildError::InvalidRevision {
                revision: "abc".to_string()
            }
        );
        assert_eq!(err.to_string(), "revision 'abc' is not a valid change number");
    }

    #[test]
    fn test_parse_change_number_variants() {
        assert_eq!(parse_change_number("42").unwrap(), 42);
        assert_eq!(parse_change_number("main|123").unwrap(), 123);
        assert_eq!(parse_change_number("a|b|7").unwrap(), 7);
    }

    #[test]
    fn test_parse_change_number_rejects_bad_input() {
        for revision in [
            "",
            "main|",
            "123|main",
            "1a2b3c4d",
            "99999999999",
            " 42",
            "3.0",
        ] {
            assert!(
                parse_change_number(revision).is_err(),
                "accepted revision {revision:?}"
            );
        }
    }

    #[test]
    fn test_body_uses_ugs_field_names() {
        let request =
            build_publish_request(&config(), "42", BadgeResult::Success, Some("https://ci/42"))
                .unwrap();

        let value = serde_json::to_value(request.body()).unwrap();
        assert_eq!(
            value,
            json!({
                "ChangeNumber": 42,
                "Project": "//depot/Main/Game",
                "BuildType": "Editor",
                "Result": 3,
                "Url": "https://ci/42",
            })
        );
    }

    #[test]
    fn test_body_omits_missing_url() {
        let request = build_publish_request(&config(), "42", BadgeResult::Starting, None).unwrap();

        let value = serde_json::to_value(request.body()).unwrap();
        assert!(value.get("Url").is_none());
        assert_eq!(value["Result"], 0);
    }

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(
            post_badge_url("https://ugs.example.com"),
            "https://ugs.example.com/api/build"
        );
        assert_eq!(
            metrics_url("https://ugs.example.com/"),
            "https://ugs.example.com/api/rugs_metrics"
        );
        assert_eq!(
            build_publish_request(&config(), "1", BadgeResult::Success, None)
                .unwrap()
                .endpoint(),
            "https://ugs.example.com/api/build"
        );
    }
}
