//! Mapping from CI build outcomes to UGS badges.

use std::fmt;

use tracing::warn;

use crate::BadgeResult;

/// Result of a CI build as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Successful,
    Error,
    Failure,
    Warning,
    /// A status label the publisher has no mapping for.
    Unknown(String),
}

impl BuildOutcome {
    #[must_use]
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Successful)
    }

    /// `Error` and `Failure` both count as a failed build.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Error | Self::Failure)
    }

    /// Parses a host status label, case-insensitively.
    ///
    /// Labels without a mapping are kept verbatim in [`BuildOutcome::Unknown`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" | "SUCCESSFUL" | "NORMAL" => Self::Successful,
            "ERROR" => Self::Error,
            "FAILURE" => Self::Failure,
            "WARNING" => Self::Warning,
            _ => Self::Unknown(label.to_string()),
        }
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successful => f.write_str("SUCCESS"),
            Self::Error => f.write_str("ERROR"),
            Self::Failure => f.write_str("FAILURE"),
            Self::Warning => f.write_str("WARNING"),
            Self::Unknown(label) => f.write_str(label),
        }
    }
}

/// Maps a build's phase and outcome to the badge UGS should display.
///
/// A starting build is always [`BadgeResult::Starting`]. Otherwise success and
/// explicit errors or failures take precedence over cancellation, and
/// cancellation takes precedence over a warning. Unrecognized outcomes are
/// logged and reported as [`BadgeResult::Skipped`].
#[must_use]
pub fn map_badge(is_starting: bool, is_canceled: bool, outcome: &BuildOutcome) -> BadgeResult {
    if is_starting {
        return BadgeResult::Starting;
    }

    match outcome {
        BuildOutcome::Successful => BadgeResult::Success,
        BuildOutcome::Error | BuildOutcome::Failure => BadgeResult::Failure,
        _ if is_canceled => BadgeResult::Skipped,
        BuildOutcome::Warning => BadgeResult::Warning,
        BuildOutcome::Unknown(label) => {
            warn!(status = %label, "Unknown build status, reporting badge as skipped");
            BadgeResult::Skipped
        }
    }
}

/// Snapshot of a dependency of a composite build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyInfo {
    pub outcome: BuildOutcome,
    pub canceled: bool,
    /// The dependency failed to start.
    pub internal_error: bool,
}

impl DependencyInfo {
    fn failed_after_running(&self) -> bool {
        !self.canceled && !self.internal_error && self.outcome.is_failed()
    }
}

/// What the host knows about a build when a lifecycle event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub outcome: BuildOutcome,
    pub canceled: bool,
    pub internal_error: bool,
    /// Composite builds aggregate the results of their dependencies.
    pub composite: bool,
    /// Short human-readable description used in logs and problem reports.
    pub description: String,
    /// Link back to the build in the CI system.
    pub view_url: Option<String>,
    pub dependencies: Vec<DependencyInfo>,
}

impl BuildInfo {
    /// Creates a plain, non-composite build.
    #[must_use]
    pub fn new(description: impl Into<String>, outcome: BuildOutcome) -> Self {
        Self {
            outcome,
            canceled: false,
            internal_error: false,
            composite: false,
            description: description.into(),
            view_url: None,
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_view_url(mut self, url: impl Into<String>) -> Self {
        self.view_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn canceled(mut self) -> Self {
        self.canceled = true;
        self
    }

    #[must_use]
    pub fn with_internal_error(mut self) -> Self {
        self.internal_error = true;
        self
    }

    #[must_use]
    pub fn composite(mut self, dependencies: Vec<DependencyInfo>) -> Self {
        self.composite = true;
        self.dependencies = dependencies;
        self
    }
}

/// Badge plus the link UGS attaches to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStatus {
    pub badge: BadgeResult,
    pub target_url: Option<String>,
}

impl CommitStatus {
    #[must_use]
    pub fn new(badge: BadgeResult, target_url: Option<String>) -> Self {
        Self { badge, target_url }
    }

    /// Computes the status to publish for `build`.
    ///
    /// A composite build whose dependency ran and failed is reported as a
    /// failure even if the composite itself was canceled or is only starting.
    #[must_use]
    pub fn for_build(build: &BuildInfo, is_starting: bool) -> Self {
        let target_url = build.view_url.clone();

        if build.composite
            && build
                .dependencies
                .iter()
                .any(DependencyInfo::failed_after_running)
        {
            return Self::new(BadgeResult::Failure, target_url);
        }

        let is_canceled = build.canceled || build.internal_error;
        let badge = map_badge(is_starting, is_canceled, &build.outcome);
        Self::new(badge, target_url)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, logs.contents())
    }

    fn all_outcomes() -> Vec<BuildOutcome> {
        vec![
            BuildOutcome::Successful,
            BuildOutcome::Error,
            BuildOutcome::Failure,
            BuildOutcome::Warning,
            BuildOutcome::Unknown("X".to_string()),
        ]
    }

    #[test]
    fn test_starting_always_wins() {
        for outcome in all_outcomes() {
            for is_canceled in [false, true] {
                assert_eq!(
                    map_badge(true, is_canceled, &outcome),
                    BadgeResult::Starting,
                    "outcome {outcome}, canceled {is_canceled}"
                );
            }
        }
    }

    #[test]
    fn test_decision_table_when_not_canceled() {
        assert_eq!(
            map_badge(false, false, &BuildOutcome::Successful),
            BadgeResult::Success
        );
        assert_eq!(
            map_badge(false, false, &BuildOutcome::Error),
            BadgeResult::Failure
        );
        assert_eq!(
            map_badge(false, false, &BuildOutcome::Failure),
            BadgeResult::Failure
        );
        assert_eq!(
            map_badge(false, false, &BuildOutcome::Warning),
            BadgeResult::Warning
        );
    }

    #[test]
    fn test_cancellation_beats_warning_and_unknown() {
        assert_eq!(
            map_badge(false, true, &BuildOutcome::Warning),
            BadgeResult::Skipped
        );
        assert_eq!(
            map_badge(false, true, &BuildOutcome::Unknown("X".to_string())),
            BadgeResult::Skipped
        );
    }

    #[test]
    fn test_success_and_failure_beat_cancellation() {
        assert_eq!(
            map_badge(false, true, &BuildOutcome::Successful),
            BadgeResult::Success
        );
        assert_eq!(
            map_badge(false, true, &BuildOutcome::Error),
            BadgeResult::Failure
        );
        assert_eq!(
            map_badge(false, true, &BuildOutcome::Failure),
            BadgeResult::Failure
        );
    }

    #[test]
    fn test_unknown_outcome_is_skipped_and_logged() {
        let (badge, logs) =
            with_captured_logs(|| map_badge(false, false, &BuildOutcome::Unknown("X".to_string())));

        assert_eq!(badge, BadgeResult::Skipped);
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("Unknown build status"), "logs: {logs}");
        assert!(logs.contains('X'), "logs: {logs}");
    }

    #[test]
    fn test_known_outcomes_log_nothing() {
        let (_, logs) = with_captured_logs(|| {
            for outcome in &all_outcomes()[..4] {
                let _ = map_badge(false, false, outcome);
            }
        });

        assert!(logs.is_empty(), "logs: {logs}");
    }

    #[test]
    fn test_outcome_from_label() {
        assert_eq!(BuildOutcome::from_label("SUCCESS"), BuildOutcome::Successful);
        assert_eq!(BuildOutcome::from_label("normal"), BuildOutcome::Successful);
        assert_eq!(BuildOutcome::from_label("Error"), BuildOutcome::Error);
        assert_eq!(BuildOutcome::from_label("FAILURE"), BuildOutcome::Failure);
        assert_eq!(BuildOutcome::from_label("warning"), BuildOutcome::Warning);
        assert_eq!(
            BuildOutcome::from_label("UNKNOWN"),
            BuildOutcome::Unknown("UNKNOWN".to_string())
        );
    }

    #[test]
    fn test_commit_status_carries_view_url() {
        let build = BuildInfo::new("Game :: Editor #7", BuildOutcome::Successful)
            .with_view_url("https://ci.example.com/build/7");

        let status = CommitStatus::for_build(&build, false);

        assert_eq!(status.badge, BadgeResult::Success);
        assert_eq!(
            status.target_url.as_deref(),
            Some("https://ci.example.com/build/7")
        );
    }

    #[test]
    fn test_internal_error_counts_as_canceled() {
        let build = BuildInfo::new("b", BuildOutcome::Warning).with_internal_error();
        assert_eq!(
            CommitStatus::for_build(&build, false).badge,
            BadgeResult::Skipped
        );
    }

    #[test]
    fn test_canceled_build_is_skipped() {
        let build = BuildInfo::new("b", BuildOutcome::Unknown("UNKNOWN".into())).canceled();
        assert_eq!(
            CommitStatus::for_build(&build, false).badge,
            BadgeResult::Skipped
        );
    }

    #[test]
    fn test_composite_with_failed_dependency_is_failure() {
        let build = BuildInfo::new("composite", BuildOutcome::Warning)
            .canceled()
            .composite(vec![
                DependencyInfo {
                    outcome: BuildOutcome::Successful,
                    canceled: false,
                    internal_error: false,
                },
                DependencyInfo {
                    outcome: BuildOutcome::Failure,
                    canceled: false,
                    internal_error: false,
                },
            ]);

        assert_eq!(
            CommitStatus::for_build(&build, false).badge,
            BadgeResult::Failure
        );
        assert_eq!(
            CommitStatus::for_build(&build, true).badge,
            BadgeResult::Failure
        );
    }

    #[test]
    fn test_composite_ignores_canceled_or_unstarted_dependencies() {
        let build = BuildInfo::new("composite", BuildOutcome::Warning)
            .canceled()
            .composite(vec![
                DependencyInfo {
                    outcome: BuildOutcome::Failure,
                    canceled: true,
                    internal_error: false,
                },
                DependencyInfo {
                    outcome: BuildOutcome::Error,
                    canceled: false,
                    internal_error: true,
                },
            ]);

        assert_eq!(
            CommitStatus::for_build(&build, false).badge,
            BadgeResult::Skipped
        );
    }

    #[test]
    fn test_dependency_failure_ignored_for_non_composite_build() {
        let mut build = BuildInfo::new("plain", BuildOutcome::Successful);
        build.dependencies.push(DependencyInfo {
            outcome: BuildOutcome::Failure,
            canceled: false,
            internal_error: false,
        });

        assert_eq!(
            CommitStatus::for_build(&build, false).badge,
            BadgeResult::Success
        );
    }
}
