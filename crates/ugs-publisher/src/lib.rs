//! # UGS Status Publisher
//!
//! Posts CI build lifecycle events to an Unreal Game Sync metadata server as
//! status badges.
//!
//! The CI host owns event delivery, configuration storage and problem
//! display. This crate plugs into it through two seams:
//!
//! - [`HttpTransport`] sends requests. [`ReqwestTransport`] is provided; hosts
//!   with their own HTTP stack can implement the trait instead.
//! - [`ProblemReporter`] receives publish failures. [`LogProblemReporter`]
//!   logs them through `tracing`.
//!
//! ## Publishing
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ugs_publisher::{ReqwestTransport, UgsStatusPublisher};
//! use ugs_publisher::ugs_core::{BuildInfo, BuildOutcome, PublisherConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PublisherConfig::new("https://ugs.example.com", "//depot/Main/Game", "Editor")
//!     .validated()?;
//! let publisher = UgsStatusPublisher::new(config, Arc::new(ReqwestTransport::new()?));
//!
//! let build = BuildInfo::new("Game :: Editor #42", BuildOutcome::Successful)
//!     .with_view_url("https://ci.example.com/build/42");
//! publisher.build_finished(&build, "12345").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing a connection
//!
//! [`test_connection`] calls `GET /api/rugs_metrics` and turns rejected
//! credentials into a dedicated message for the settings UI.

mod error;
mod publisher;
mod reporter;
mod transport;

pub use error::{ConnectionTestError, ProbeError, PublishError};
pub use publisher::{UgsStatusPublisher, test_connection};
pub use reporter::{LogProblemReporter, ProblemReporter};
pub use transport::{
    DEFAULT_CONNECTION_TIMEOUT, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    ReqwestTransport, ReqwestTransportBuilder, TransportBuildError,
};
pub use ugs_core;
