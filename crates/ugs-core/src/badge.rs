//! Badge values understood by the UGS server.

use std::fmt;

use serde::{Serialize, Serializer};

/// Status badge shown by Unreal Game Sync for a change number.
///
/// The integer returned by [`BadgeResult::ugs_value`] is what goes over the
/// wire. These codes are fixed by the UGS server and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeResult {
    Starting,
    Failure,
    Warning,
    Success,
    Skipped,
}

impl BadgeResult {
    /// Every badge, in wire-code order.
    pub const ALL: [Self; 5] = [
        Self::Starting,
        Self::Failure,
        Self::Warning,
        Self::Success,
        Self::Skipped,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Failure => "Failure",
            Self::Warning => "Warning",
            Self::Success => "Success",
            Self::Skipped => "Skipped",
        }
    }

    /// The `Result` code sent to `/api/build`.
    #[must_use]
    pub const fn ugs_value(self) -> u8 {
        match self {
            Self::Starting => 0,
            Self::Failure => 1,
            Self::Warning => 2,
            Self::Success => 3,
            Self::Skipped => 4,
        }
    }
}

impl fmt::Display for BadgeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for BadgeResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.ugs_value())
    }
}
