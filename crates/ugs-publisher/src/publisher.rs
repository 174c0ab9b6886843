//! Lifecycle callbacks that post badges to UGS.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use ugs_core::{
    BuildInfo, CommitStatus, ProbeOutcome, PublisherConfig, PublisherEvent,
    build_publish_request, classify_publish_response, classify_response, metrics_url,
};

use crate::{
    ConnectionTestError, HttpRequest, HttpTransport, LogProblemReporter, ProbeError,
    ProblemReporter, PublishError,
};

/// Publishes UGS badges for one build configuration.
///
/// Each callback makes at most one HTTP call and keeps no state between calls,
/// so a single publisher can serve concurrent builds. The boolean returned by
/// the callbacks tells the host whether the event was published.
#[derive(Debug, Clone)]
pub struct UgsStatusPublisher {
    config: PublisherConfig,
    transport: Arc<dyn HttpTransport>,
    reporter: Arc<dyn ProblemReporter>,
}

impl UgsStatusPublisher {
    /// Creates a publisher that logs failures with [`LogProblemReporter`].
    ///
    /// `config` is expected to have passed [`PublisherConfig::validate`].
    pub fn new(config: PublisherConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            reporter: Arc::new(LogProblemReporter),
        }
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ProblemReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// UGS has no queued badge, so queue events are acknowledged and dropped.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other callbacks.
    pub async fn build_queued(
        &self,
        build: &BuildInfo,
        revision: &str,
    ) -> Result<bool, PublishError> {
        debug!(
            project = %self.config.project,
            build = %build.description,
            revision,
            "Ignoring queued build"
        );
        Ok(PublisherEvent::Queued.publishes_badge())
    }

    /// # Errors
    ///
    /// Never fails; the signature matches the other callbacks.
    pub async fn build_removed_from_queue(
        &self,
        build: &BuildInfo,
        revision: &str,
    ) -> Result<bool, PublishError> {
        debug!(
            project = %self.config.project,
            build = %build.description,
            revision,
            "Ignoring build removed from queue"
        );
        Ok(PublisherEvent::RemovedFromQueue.publishes_badge())
    }

    /// Publishes a [`Starting`](ugs_core::BadgeResult::Starting) badge.
    ///
    /// # Errors
    ///
    /// Returns a [`PublishError`] if the revision has no change number, the
    /// request fails, or UGS answers with an error status. The error has
    /// already been handed to the problem reporter.
    pub async fn build_started(
        &self,
        build: &BuildInfo,
        revision: &str,
    ) -> Result<bool, PublishError> {
        self.update_build_status(build, revision, true).await?;
        Ok(true)
    }

    /// Publishes the final badge of a finished build.
    ///
    /// # Errors
    ///
    /// See [`Self::build_started`].
    pub async fn build_finished(
        &self,
        build: &BuildInfo,
        revision: &str,
    ) -> Result<bool, PublishError> {
        self.update_build_status(build, revision, false).await?;
        Ok(true)
    }

    /// Publishes the badge of an interrupted build, usually
    /// [`Skipped`](ugs_core::BadgeResult::Skipped).
    ///
    /// # Errors
    ///
    /// See [`Self::build_started`].
    pub async fn build_interrupted(
        &self,
        build: &BuildInfo,
        revision: &str,
    ) -> Result<bool, PublishError> {
        self.update_build_status(build, revision, false).await?;
        Ok(true)
    }

    /// Republishes a build that was manually marked successful.
    ///
    /// A build still in progress keeps its starting badge.
    ///
    /// # Errors
    ///
    /// See [`Self::build_started`].
    pub async fn build_marked_as_successful(
        &self,
        build: &BuildInfo,
        revision: &str,
        build_in_progress: bool,
    ) -> Result<bool, PublishError> {
        self.update_build_status(build, revision, build_in_progress)
            .await?;
        Ok(true)
    }

    /// Probes the configured server, see [`test_connection`].
    ///
    /// # Errors
    ///
    /// See [`test_connection`].
    pub async fn test_connection(&self) -> Result<ProbeOutcome, ConnectionTestError> {
        test_connection(&self.config, self.transport.as_ref()).await
    }

    async fn update_build_status(
        &self,
        build: &BuildInfo,
        revision: &str,
        is_starting: bool,
    ) -> Result<(), PublishError> {
        let result = self.post_status(build, revision, is_starting).await;
        if let Err(error) = &result {
            self.reporter.report_problem(build, revision, error);
        }
        result
    }

    #[instrument(skip(self, build), fields(build = %build.description))]
    async fn post_status(
        &self,
        build: &BuildInfo,
        revision: &str,
        is_starting: bool,
    ) -> Result<(), PublishError> {
        let status = CommitStatus::for_build(build, is_starting);
        let request = build_publish_request(
            &self.config,
            revision,
            status.badge,
            status.target_url.as_deref(),
        )?;
        let body = serde_json::to_string(&request.body())?;

        info!(
            change_number = request.change_number,
            badge = %status.badge,
            "Publishing UGS badge"
        );

        let response = self
            .transport
            .execute(HttpRequest::post_json(
                request.endpoint(),
                self.config.credentials(),
                body,
            ))
            .await
            .map_err(PublishError::Transport)?;

        classify_publish_response(response.status, response.body.as_deref())
            .map_err(|failure| PublishError::http(failure, &response.status_text))?;

        debug!(status = response.status, "UGS accepted badge");
        Ok(())
    }
}

/// Checks that the server in `config` is reachable and accepts its
/// credentials by calling `GET /api/rugs_metrics`.
///
/// A `400 Bad Request` counts as reachable.
///
/// # Errors
///
/// Returns a [`ConnectionTestError`] naming the server when the credentials
/// are rejected, the server answers with an unexpected status, or the request
/// cannot be sent.
pub async fn test_connection(
    config: &PublisherConfig,
    transport: &dyn HttpTransport,
) -> Result<ProbeOutcome, ConnectionTestError> {
    probe(config, transport).await.map_err(|source| {
        let error = ConnectionTestError {
            server_url: config.server_url.clone(),
            source,
        };
        debug!(error = %error, cause = %error.source, "Connection test failed");
        error
    })
}

async fn probe(
    config: &PublisherConfig,
    transport: &dyn HttpTransport,
) -> Result<ProbeOutcome, ProbeError> {
    let request = HttpRequest::get_json(metrics_url(&config.server_url), config.credentials());
    let response = transport
        .execute(request)
        .await
        .map_err(ProbeError::Transport)?;

    match classify_response(response.status, response.body.as_deref()) {
        ProbeOutcome::AuthFailure => Err(ProbeError::Unauthorized),
        ProbeOutcome::GenericError(failure) => Err(ProbeError::Http {
            status: failure.status,
            status_text: response.status_text,
            message: failure.message,
        }),
        outcome => {
            debug!(status = response.status, "Connection test succeeded");
            Ok(outcome)
        }
    }
}
