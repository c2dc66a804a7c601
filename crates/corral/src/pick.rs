//! Long-press state machine separating "move" from "pick up for reparenting".
//!
//! # State Machine
//!
//! ```text
//!            pick                 delay elapsed
//!   Idle ──────────► Pending ────────────────► Candidate
//!    ▲                  │                          │
//!    │     translate /  │                          │ drag end
//!    └──── drag end ────┘◄─────────────────────────┘
//! ```
//!
//! The machine itself is pure: it never reads the clock, and the engine feeds
//! it the current [`Instant`]. Every pick gets a fresh generation so that a
//! [`PickTimer`] held by a host scheduler goes stale as soon as the pick it
//! belongs to is cancelled or replaced. Cancelling twice, or cancelling after
//! the timer fired, is a no-op.

use std::{
    mem,
    time::{Duration, Instant},
};

use corral_core::identifier::Id;

/// Handle to the confirmation timer of one pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickTimer {
    generation: u64,
    deadline: Instant,
}

impl PickTimer {
    /// Returns the instant at which the pick matures.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// Observable state of the pick gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum PickState {
    Idle,
    Pending {
        origin: Id,
        started: Instant,
        generation: u64,
    },
    Candidate {
        ids: Vec<Id>,
    },
}

#[derive(Debug)]
pub(crate) struct PickMachine {
    delay: Duration,
    state: PickState,
    generation: u64,
}

impl PickMachine {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: PickState::Idle,
            generation: 0,
        }
    }

    pub(crate) fn state(&self) -> &PickState {
        &self.state
    }

    /// Returns the matured candidate set, empty unless in `Candidate`.
    pub(crate) fn candidates(&self) -> &[Id] {
        match &self.state {
            PickState::Candidate { ids } => ids,
            _ => &[],
        }
    }

    /// Starts a new pending pick.
    ///
    /// Returns the timer of the new pick and the candidate set it displaced,
    /// if a matured set was still held.
    pub(crate) fn pick(&mut self, origin: Id, now: Instant) -> (PickTimer, Option<Vec<Id>>) {
        self.generation += 1;
        let previous = mem::replace(
            &mut self.state,
            PickState::Pending {
                origin,
                started: now,
                generation: self.generation,
            },
        );
        let displaced = match previous {
            PickState::Candidate { ids } => Some(ids),
            _ => None,
        };
        let timer = PickTimer {
            generation: self.generation,
            deadline: now + self.delay,
        };
        (timer, displaced)
    }

    /// Cancels a pending pick. Returns true if a pick was cancelled.
    pub(crate) fn cancel(&mut self) -> bool {
        if matches!(self.state, PickState::Pending { .. }) {
            self.state = PickState::Idle;
            true
        } else {
            false
        }
    }

    /// Returns the origin of the pending pick if its delay has elapsed at `now`.
    pub(crate) fn due(&self, now: Instant) -> Option<Id> {
        match self.state {
            PickState::Pending {
                origin, started, ..
            } if now.saturating_duration_since(started) >= self.delay => Some(origin),
            _ => None,
        }
    }

    /// Returns the origin of the pending pick if `timer` belongs to it.
    pub(crate) fn current(&self, timer: PickTimer) -> Option<Id> {
        match self.state {
            PickState::Pending {
                origin, generation, ..
            } if generation == timer.generation => Some(origin),
            _ => None,
        }
    }

    /// Moves a pending pick to `Candidate` with the given ids.
    pub(crate) fn mature(&mut self, ids: Vec<Id>) {
        if matches!(self.state, PickState::Pending { .. }) {
            self.state = PickState::Candidate { ids };
        }
    }

    /// Ends the gesture, returning the captured candidate set.
    ///
    /// A pending pick is cancelled and yields `None`.
    pub(crate) fn release(&mut self) -> Option<Vec<Id>> {
        match mem::replace(&mut self.state, PickState::Idle) {
            PickState::Candidate { ids } => Some(ids),
            _ => None,
        }
    }
}
