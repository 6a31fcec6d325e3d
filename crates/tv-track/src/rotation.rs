//! Initiative rotation: turn order, rounds, and who is still standing.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TrackError, TrackResult};

/// A combatant in the rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name.
    pub name: String,
    /// Initiative score (higher goes first).
    pub initiative: i32,
    /// False once the participant is down or has left the fight.
    pub active: bool,
}

impl Participant {
    fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Turn order sorted by initiative (descending), then by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    participants: Vec<Participant>,
    current_turn: usize,
    round: u32,
    /// Set once the first turn has been passed. Until then the head of the
    /// order is current, so late additions with higher initiative go first.
    begun: bool,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new()
    }
}

impl Rotation {
    /// Create an empty rotation at round 1.
    pub fn new() -> Self {
        Self {
            participants: Vec::new(),
            current_turn: 0,
            round: 1,
            begun: false,
        }
    }

    /// Participants in turn order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Index of the current participant in [`Self::participants`].
    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    /// Current round (1-based).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The participant whose turn it is.
    pub fn current(&self) -> Option<&Participant> {
        self.participants.get(self.current_turn)
    }

    /// Number of participants still in the fight.
    pub fn active_count(&self) -> usize {
        self.participants.iter().filter(|p| p.active).count()
    }

    /// Whether anyone has been added.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Add a participant and re-sort. Once turns are under way the
    /// current participant stays current.
    pub fn add(&mut self, name: impl Into<String>, initiative: i32) {
        let current = if self.begun {
            self.current().cloned()
        } else {
            None
        };

        self.participants.push(Participant {
            name: name.into(),
            initiative,
            active: true,
        });
        self.participants.sort_by(|a, b| {
            b.initiative
                .cmp(&a.initiative)
                .then_with(|| a.name.cmp(&b.name))
        });

        if let Some(index) =
            current.and_then(|c| self.participants.iter().position(|p| *p == c))
        {
            self.current_turn = index;
        }
    }

    /// Advance to the next active participant, wrapping into a new round.
    ///
    /// Stops after one full loop if nobody else is active.
    pub fn next(&mut self) -> Option<&Participant> {
        let len = self.participants.len();
        if len == 0 {
            return None;
        }
        self.begun = true;
        let start = self.current_turn;
        loop {
            self.current_turn += 1;
            if self.current_turn >= len {
                self.current_turn = 0;
                self.round += 1;
            }
            if self.current_turn == start || self.participants[self.current_turn].active {
                break;
            }
        }
        self.current()
    }

    /// Step back to the previous active participant. Never goes below round 1.
    pub fn previous(&mut self) -> Option<&Participant> {
        let len = self.participants.len();
        if len == 0 {
            return None;
        }
        let start = self.current_turn;
        loop {
            if self.current_turn == 0 {
                self.current_turn = len - 1;
                self.round = self.round.saturating_sub(1).max(1);
            } else {
                self.current_turn -= 1;
            }
            if self.current_turn == start || self.participants[self.current_turn].active {
                break;
            }
        }
        self.current()
    }

    fn set_active(&mut self, name: &str, active: bool) -> TrackResult<()> {
        let p = self
            .participants
            .iter_mut()
            .find(|p| p.matches(name))
            .ok_or_else(|| TrackError::ParticipantNotFound(name.to_string()))?;
        p.active = active;
        Ok(())
    }

    /// Mark a participant as out of the fight.
    pub fn mark_out(&mut self, name: &str) -> TrackResult<()> {
        self.set_active(name, false)
    }

    /// Bring a participant back into the fight.
    pub fn mark_in(&mut self, name: &str) -> TrackResult<()> {
        self.set_active(name, true)
    }
}

/// Thread-safe holder for the initiative rotation, if one is running.
#[derive(Debug, Default)]
pub struct RotationManager {
    rotation: RwLock<Option<Rotation>>,
}

impl RotationManager {
    /// Create a manager with no rotation running.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh rotation, discarding any previous one.
    pub fn start(&self) {
        debug!("initiative started");
        *self.rotation.write() = Some(Rotation::new());
    }

    /// Stop the rotation, returning its final state.
    pub fn end(&self) -> Option<Rotation> {
        debug!("initiative ended");
        self.rotation.write().take()
    }

    /// Whether a rotation is running.
    pub fn is_active(&self) -> bool {
        self.rotation.read().is_some()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Rotation) -> TrackResult<T>) -> TrackResult<T> {
        let mut guard = self.rotation.write();
        let rotation = guard.as_mut().ok_or(TrackError::NoRotation)?;
        f(rotation)
    }

    /// Add a participant to the running rotation.
    pub fn add(&self, name: &str, initiative: i32) -> TrackResult<()> {
        self.with(|r| {
            r.add(name, initiative);
            Ok(())
        })
    }

    /// Advance the turn. Returns the new current participant and round.
    pub fn next(&self) -> TrackResult<(Participant, u32)> {
        self.with(|r| {
            let p = r.next().cloned().ok_or(TrackError::EmptyRotation)?;
            Ok((p, r.round()))
        })
    }

    /// Step the turn back. Returns the new current participant and round.
    pub fn previous(&self) -> TrackResult<(Participant, u32)> {
        self.with(|r| {
            let p = r.previous().cloned().ok_or(TrackError::EmptyRotation)?;
            Ok((p, r.round()))
        })
    }

    /// The current participant and round.
    pub fn current(&self) -> TrackResult<(Participant, u32)> {
        self.with(|r| {
            let p = r.current().cloned().ok_or(TrackError::EmptyRotation)?;
            Ok((p, r.round()))
        })
    }

    /// Mark a participant as out of the fight.
    pub fn mark_out(&self, name: &str) -> TrackResult<()> {
        self.with(|r| r.mark_out(name))
    }

    /// Bring a participant back into the fight.
    pub fn mark_in(&self, name: &str) -> TrackResult<()> {
        self.with(|r| r.mark_in(name))
    }

    /// A copy of the current rotation, if one is running.
    pub fn snapshot(&self) -> Option<Rotation> {
        self.rotation.read().clone()
    }
}
