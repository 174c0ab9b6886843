//! Lifecycle events the publisher subscribes to.

use std::fmt;

/// Build lifecycle events a CI host can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublisherEvent {
    Queued,
    RemovedFromQueue,
    Started,
    Finished,
    Interrupted,
    MarkedAsSuccessful,
}

impl PublisherEvent {
    /// Whether handling this event posts a badge.
    #[must_use]
    pub const fn publishes_badge(self) -> bool {
        !matches!(self, Self::Queued | Self::RemovedFromQueue)
    }
}

impl fmt::Display for PublisherEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Queued => "queued",
            Self::RemovedFromQueue => "removed from queue",
            Self::Started => "started",
            Self::Finished => "finished",
            Self::Interrupted => "interrupted",
            Self::MarkedAsSuccessful => "marked as successful",
        };
        f.write_str(name)
    }
}

/// Events the publisher subscribes to.
pub const SUPPORTED_EVENTS: &[PublisherEvent] = &[
    PublisherEvent::Started,
    PublisherEvent::Finished,
    PublisherEvent::Interrupted,
    PublisherEvent::MarkedAsSuccessful,
];

/// [`SUPPORTED_EVENTS`] plus the queue events, for hosts that report them.
pub const SUPPORTED_EVENTS_WITH_QUEUED: &[PublisherEvent] = &[
    PublisherEvent::Queued,
    PublisherEvent::RemovedFromQueue,
    PublisherEvent::Started,
    PublisherEvent::Finished,
    PublisherEvent::Interrupted,
    PublisherEvent::MarkedAsSuccessful,
];

/// Selects the event set for a host.
#[must_use]
pub fn supported_events(queued_supported: bool) -> &'static [PublisherEvent] {
    if queued_supported {
        SUPPORTED_EVENTS_WITH_QUEUED
    } else {
        SUPPORTED_EVENTS
    }
}
