//! Core types for publishing build status badges to Unreal Game Sync (UGS).
//!
//! This crate holds the host-independent logic of the UGS commit status
//! publisher. Nothing here performs network I/O; the `ugs-publisher` crate
//! composes these pieces with an HTTP transport.
//!
//! # Key Components
//!
//! - **Badges**: [`BadgeResult`] and its stable wire codes
//! - **Status mapping**: [`map_badge`] and [`CommitStatus::for_build`] turn a
//!   CI build outcome into a badge
//! - **Requests**: [`build_publish_request`] produces the [`PublishRequest`]
//!   posted to `{server}/api/build`
//! - **Responses**: [`classify_response`] and [`classify_publish_response`]
//!   interpret what the UGS server answered
//! - **Configuration**: [`PublisherConfig`] with host-parameter parsing and
//!   validation
//! - **Events**: the lifecycle events a host should deliver
//!
//! # Example
//!
//! ```
//! use ugs_core::{BuildOutcome, PublisherConfig, build_publish_request, map_badge};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PublisherConfig::new("https://ugs.example.com", "//depot/Main/Game", "Editor");
//! let badge = map_badge(false, false, &BuildOutcome::Successful);
//! let request = build_publish_request(&config, "42", badge, None)?;
//!
//! assert_eq!(request.change_number, 42);
//! assert_eq!(request.result, 3);
//! # Ok(())
//! # }
//! ```

mod badge;
pub mod config;
mod events;
mod request;
mod response;
mod status;

pub use badge::BadgeResult;
pub use config::{AuthPassword, BasicCredentials, ConfigError, InvalidProperty, PublisherConfig};
pub use events::{PublisherEvent, SUPPORTED_EVENTS, SUPPORTED_EVENTS_WITH_QUEUED, supported_events};
pub use request::{
    PublishBody, PublishRequest, RequestBuildError, build_publish_request, metrics_url,
    parse_change_number, post_badge_url,
};
pub use response::{
    AUTHORIZATION_ERROR_MESSAGE, EMPTY_RESPONSE_MESSAGE, GENERIC_RESPONSE_MESSAGE, HttpFailure,
    ProbeOutcome, classify_publish_response, classify_response,
};
pub use status::{BuildInfo, BuildOutcome, CommitStatus, DependencyInfo, map_badge};

/// Identifier under which the publisher registers with a CI host.
pub const PUBLISHER_ID: &str = "ugs";

/// Human-readable publisher name.
pub const PUBLISHER_NAME: &str = "Unreal Game Sync";

/// One-line summary of what a configured publisher does.
#[must_use]
pub fn describe_publisher() -> String {
    format!("Post commit status to {PUBLISHER_NAME}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_publisher_mentions_name() {
        assert_eq!(
            describe_publisher(),
            "Post commit status to Unreal Game Sync"
        );
    }
}
