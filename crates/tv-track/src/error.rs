//! Error types for table-side trackers.

use thiserror::Error;

/// Result type for tracker operations.
pub type TrackResult<T> = Result<T, TrackError>;

/// Errors raised by alarms, number trackers and the initiative rotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// No number tracker with that name.
    #[error("tracker '{0}' not found")]
    TrackerNotFound(String),

    /// A number tracker with that name already exists.
    #[error("tracker '{0}' already exists")]
    DuplicateTracker(String),

    /// No participant with that name in the rotation.
    #[error("participant '{0}' not found")]
    ParticipantNotFound(String),

    /// Initiative has not been started.
    #[error("no initiative in progress")]
    NoRotation,

    /// Initiative is running but nobody has been added.
    #[error("no participants in initiative")]
    EmptyRotation,

    /// A duration string could not be parsed.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The text as given.
        input: String,
        /// What was wrong with it.
        reason: String,
    },
}
