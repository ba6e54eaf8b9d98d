//! Fixed-tick delayed actions
//!
//! Timed effects (power-up expiry, the post-point serve, the extra-life
//! notice) are queued against the tick clock and drained at the top of each
//! tick, so they are serialized with the simulation and replay identically.
//! Every entry carries the run generation it was queued in; cancelling bumps
//! the generation so nothing from an abandoned run can fire into a new one.

use serde::{Deserialize, Serialize};

use super::state::PowerUpId;

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Remove an uncollected power-up from the board
    ExpireBoardPowerUp(PowerUpId),
    /// End an active effect (reverting it if needed)
    ExpireEffect(PowerUpId),
    /// Put a fresh ball in play after a point
    ServeBall,
    /// Hide the "extra life used" notice
    ClearExtraLifeNotice,
}

#[derive(Debug, Clone)]
struct Entry {
    fire_at: u64,
    seq: u64,
    generation: u32,
    action: ScheduledAction,
}

/// Queue of actions keyed by the tick they fire on
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    generation: u32,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire on tick `fire_at`
    pub fn schedule(&mut self, fire_at: u64, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            fire_at,
            seq,
            generation: self.generation,
            action,
        });
    }

    /// Remove and return every action due at or before `now`, oldest first
    pub fn take_due(&mut self, now: u64) -> Vec<ScheduledAction> {
        let generation = self.generation;
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|entry| {
            if entry.fire_at <= now {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| (e.fire_at, e.seq));
        due.into_iter()
            .filter(|e| e.generation == generation)
            .map(|e| e.action)
            .collect()
    }

    /// Drop everything pending and start a new generation
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Cancelling {} pending actions", self.entries.len());
        }
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of queued actions
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
