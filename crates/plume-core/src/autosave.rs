//! Cooperative auto-save scheduling.
//!
//! The scheduler owns no timer. The front end asks [`AutoSave::next`] when
//! the next firing is due, waits on its own event loop and then delivers the
//! [`Ticket`] back through [`EditorEvent::AutoSaveTick`]. Every enable or
//! disable starts a new generation, and tickets from an older generation
//! are refused when they arrive, so switching auto-save off cancels a
//! firing that was already scheduled.
//!
//! [`EditorEvent::AutoSaveTick`]: crate::EditorEvent::AutoSaveTick

use std::time::{Duration, Instant};

/// Permission for one auto-save firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    sequence: u64,
}

/// Auto-save state: enabled flag, interval and the next due time.
#[derive(Debug, Clone)]
pub struct AutoSave {
    enabled: bool,
    interval: Duration,
    generation: u64,
    sequence: u64,
    due: Option<Instant>,
}

impl AutoSave {
    /// Creates a disabled scheduler.
    pub fn new(interval: Duration) -> Self {
        Self {
            enabled: false,
            interval,
            generation: 0,
            sequence: 0,
            due: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Turns auto-save on. The first firing is due immediately.
    pub fn enable(&mut self, now: Instant) {
        self.enabled = true;
        self.generation += 1;
        self.due = Some(now);
    }

    /// Turns auto-save off and invalidates every outstanding ticket.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.generation += 1;
        self.due = None;
    }

    /// Returns when the next firing is due and the ticket to deliver then.
    pub fn next(&self) -> Option<(Instant, Ticket)> {
        let due = self.due?;
        Some((
            due,
            Ticket {
                generation: self.generation,
                sequence: self.sequence,
            },
        ))
    }

    /// Accepts a delivered ticket.
    ///
    /// Returns true when the save should run, in which case the next
    /// firing has been scheduled one interval after `now`. Stale tickets,
    /// tickets delivered twice and tickets arriving while disabled return
    /// false and schedule nothing.
    pub fn fire(&mut self, ticket: Ticket, now: Instant) -> bool {
        if !self.enabled
            || ticket.generation != self.generation
            || ticket.sequence != self.sequence
        {
            return false;
        }
        self.sequence += 1;
        self.due = Some(now + self.interval);
        true
    }
}
