//! Named number trackers (HP, spell slots, ammunition).
//!
//! Unlike a clamped resource track, a number tracker stores whatever value
//! it is given: temporary hit points may push `current` past `max`.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{TrackError, TrackResult};

/// A named counter with a reference maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberTracker {
    /// Unique tracker ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current value.
    pub current: i32,
    /// Reference maximum.
    pub max: i32,
    /// Whether the tracker is shown in the status bar.
    pub pinned: bool,
}

impl NumberTracker {
    /// Create an unpinned tracker.
    pub fn new(name: impl Into<String>, current: i32, max: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            current,
            max,
            pinned: false,
        }
    }

    /// Shift the current value by `delta`. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = self.current.saturating_add(delta);
        self.current
    }

    fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for NumberTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}/{}", self.name, self.current, self.max)
    }
}

/// Thread-safe set of number trackers, addressed by case-insensitive name.
///
/// Every getter returns a snapshot.
#[derive(Debug, Default)]
pub struct NumberRegistry {
    trackers: RwLock<HashMap<Uuid, NumberTracker>>,
}

impl NumberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tracker. Fails if the name is already taken.
    pub fn add(&self, name: &str, current: i32, max: i32) -> TrackResult<NumberTracker> {
        let mut trackers = self.trackers.write();
        if trackers.values().any(|t| t.matches(name)) {
            return Err(TrackError::DuplicateTracker(name.to_string()));
        }
        let tracker = NumberTracker::new(name, current, max);
        debug!(name, current, max, "tracker added");
        trackers.insert(tracker.id, tracker.clone());
        Ok(tracker)
    }

    /// Look up a tracker by name.
    pub fn get(&self, name: &str) -> Option<NumberTracker> {
        self.trackers.read().values().find(|t| t.matches(name)).cloned()
    }

    fn update<F>(&self, name: &str, f: F) -> TrackResult<NumberTracker>
    where
        F: FnOnce(&mut NumberTracker),
    {
        let mut trackers = self.trackers.write();
        let tracker = trackers
            .values_mut()
            .find(|t| t.matches(name))
            .ok_or_else(|| TrackError::TrackerNotFound(name.to_string()))?;
        f(tracker);
        Ok(tracker.clone())
    }

    /// Set the current value.
    pub fn set(&self, name: &str, value: i32) -> TrackResult<NumberTracker> {
        self.update(name, |t| t.current = value)
    }

    /// Shift the current value by `delta`.
    pub fn adjust(&self, name: &str, delta: i32) -> TrackResult<NumberTracker> {
        self.update(name, |t| {
            t.adjust(delta);
        })
    }

    /// Show a tracker in the status bar.
    pub fn pin(&self, name: &str) -> TrackResult<NumberTracker> {
        self.update(name, |t| t.pinned = true)
    }

    /// Hide a tracker from the status bar.
    pub fn unpin(&self, name: &str) -> TrackResult<NumberTracker> {
        self.update(name, |t| t.pinned = false)
    }

    /// Pin every tracker. Returns how many were newly pinned.
    pub fn pin_all(&self) -> usize {
        let mut changed = 0;
        for t in self.trackers.write().values_mut().filter(|t| !t.pinned) {
            t.pinned = true;
            changed += 1;
        }
        changed
    }

    /// Remove a tracker by name.
    pub fn delete(&self, name: &str) -> TrackResult<NumberTracker> {
        let mut trackers = self.trackers.write();
        let id = trackers
            .values()
            .find(|t| t.matches(name))
            .map(|t| t.id)
            .ok_or_else(|| TrackError::TrackerNotFound(name.to_string()))?;
        trackers
            .remove(&id)
            .ok_or_else(|| TrackError::TrackerNotFound(name.to_string()))
    }

    /// Remove every tracker.
    pub fn delete_all(&self) {
        self.trackers.write().clear();
    }

    fn collect<P>(&self, keep: P) -> Vec<NumberTracker>
    where
        P: Fn(&NumberTracker) -> bool,
    {
        let mut out: Vec<NumberTracker> = self
            .trackers
            .read()
            .values()
            .filter(|t| keep(t))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// All trackers sorted by name.
    pub fn list(&self) -> Vec<NumberTracker> {
        self.collect(|_| true)
    }

    /// Pinned trackers sorted by name.
    pub fn pinned(&self) -> Vec<NumberTracker> {
        self.collect(|t| t.pinned)
    }

    /// Trackers whose name contains `pattern`, ignoring case.
    pub fn search(&self, pattern: &str) -> Vec<NumberTracker> {
        let pattern = pattern.to_lowercase();
        self.collect(|t| t.name.to_lowercase().contains(&pattern))
    }

    /// Number of trackers.
    pub fn count(&self) -> usize {
        self.trackers.read().len()
    }

    /// Number of pinned trackers.
    pub fn pinned_count(&self) -> usize {
        self.trackers.read().values().filter(|t| t.pinned).count()
    }
}
