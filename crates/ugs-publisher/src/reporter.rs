//! Reporting of publish failures back to the CI host.

use std::fmt;

use tracing::warn;
use ugs_core::{BuildInfo, PUBLISHER_ID};

use crate::PublishError;

/// Receives every publish failure, typically to annotate the build.
///
/// Reporting must not block or fail the build; implementations should record
/// the problem and return.
pub trait ProblemReporter: fmt::Debug + Send + Sync {
    fn report_problem(&self, build: &BuildInfo, revision: &str, error: &PublishError);
}

/// Logs publish failures through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProblemReporter;

impl ProblemReporter for LogProblemReporter {
    fn report_problem(&self, build: &BuildInfo, revision: &str, error: &PublishError) {
        warn!(
            publisher = PUBLISHER_ID,
            build = %build.description,
            revision,
            error = %error,
            "Failed to publish commit status"
        );
    }
}
