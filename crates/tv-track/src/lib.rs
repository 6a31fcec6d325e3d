//! Table-side trackers for Tavern.
//!
//! Countdown alarms, named number trackers (hit points, ammunition) and
//! an initiative rotation. The registries are internally locked so one
//! instance can be shared between an input loop and a display loop.

pub mod error;
pub mod number;
pub mod rotation;
pub mod timer;

pub use error::{TrackError, TrackResult};
pub use number::{NumberRegistry, NumberTracker};
pub use rotation::{Participant, Rotation, RotationManager};
pub use timer::{Timer, TimerRegistry, format_duration, format_duration_short, parse_duration};
