#![forbid(unsafe_code)]

//! Echo timeline: periodic re-lighting of cycle cells at shrinking intensity.
//!
//! Every [`CycleEvent`] spawns one echo chain per cell. The chain is a single
//! [`ScheduledEcho`] record in a min-heap keyed by its due instant; firing it
//! either re-arms the record one period later or drops it for good.
//!
//! # Firing math
//!
//! The `n`th firing of a chain happens at `created_at + n * period` and has
//! intensity `255 * decay_factor^n`. A firing at or below the visibility floor
//! terminates the chain, so an event fires exactly
//! `ceil(ln(floor / 255) / ln(decay_factor))` times, the last one silent.
//! Re-arming adds the period to the previous due instant rather than to the
//! poll instant, so late polls do not stretch the chain.
//!
//! # Invariants
//!
//! 1. Records pop in due order; equal due instants pop in insertion order.
//! 2. A chain never fires more than once per period.
//! 3. Once a chain expires it is never re-armed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use hexecho_core::CellCoord;
use web_time::Instant;

use crate::decay::{CycleEvent, DebugTuning, MAX_INTENSITY};

/// Lower bound on a debug-shortened echo period.
pub const MIN_EFFECTIVE_PERIOD: Duration = Duration::from_millis(1);

/// Echo timing and attenuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoConfig {
    /// Spacing between firings. Default: 4s.
    pub period: Duration,
    /// Per-firing attenuation in `(0, 1)`. Default: 0.5.
    pub decay_factor: f64,
    /// Firings at or below this intensity end the chain. Default: 1.0.
    pub visibility_floor: f64,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(4000),
            decay_factor: 0.5,
            visibility_floor: 1.0,
        }
    }
}

impl EchoConfig {
    /// Parameters in effect with debug mode on: the period shrinks by
    /// `echo_period_divisor`, but never below [`MIN_EFFECTIVE_PERIOD`] unless
    /// the base period already is.
    #[must_use]
    pub fn effective(&self, debug: Option<&DebugTuning>) -> Self {
        match debug {
            None => *self,
            Some(tuning) => Self {
                period: (self.period / tuning.echo_period_divisor.max(1))
                    .max(MIN_EFFECTIVE_PERIOD.min(self.period)),
                ..*self
            },
        }
    }

    /// Check the ranges that keep every chain finite. An empty list means the
    /// config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.period.is_zero() {
            errors.push("echo.period must be > 0".into());
        }
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            errors.push(format!(
                "echo.decay_factor must be in (0, 1), got {}",
                self.decay_factor
            ));
        }
        if !(self.visibility_floor >= 1.0 && self.visibility_floor < 255.0) {
            errors.push(format!(
                "echo.visibility_floor must be in [1, 255), got {}",
                self.visibility_floor
            ));
        }
        errors
    }

    /// Outcome of the `ordinal`th firing of a chain (1-based).
    #[must_use]
    pub fn fire(&self, ordinal: u32) -> EchoFiring {
        let raw = f64::from(MAX_INTENSITY) * self.decay_factor.powf(f64::from(ordinal));
        if raw.is_nan() || raw <= self.visibility_floor {
            return EchoFiring::Expired { ordinal };
        }
        EchoFiring::Visible {
            ordinal,
            intensity: raw.round().min(f64::from(MAX_INTENSITY)) as u8,
        }
    }

    /// Total firings per chain, counting the silent last one. `None` when the
    /// factor is outside `(0, 1)` and the chain would never end.
    #[must_use]
    pub fn firings_per_event(&self) -> Option<u32> {
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return None;
        }
        let mut ordinal = 1;
        while let EchoFiring::Visible { .. } = self.fire(ordinal) {
            ordinal += 1;
        }
        Some(ordinal)
    }
}

/// Result of firing one scheduled echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoFiring {
    Visible { ordinal: u32, intensity: u8 },
    Expired { ordinal: u32 },
}

/// One pending echo of one cycle event on one cell.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEcho {
    pub due: Instant,
    pub cell: CellCoord,
    pub event: CycleEvent,
    /// 1-based firing number this record represents.
    pub ordinal: u32,
    seq: u64,
}

impl PartialEq for ScheduledEcho {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEcho {}

impl PartialOrd for ScheduledEcho {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEcho {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, earliest due must come out first.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of pending echoes.
#[derive(Debug, Default)]
pub struct EchoScheduler {
    queue: BinaryHeap<ScheduledEcho>,
    next_seq: u64,
}

impl EchoScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a chain for `event` on `cell`; the first firing is one period
    /// after the event.
    pub fn arm(&mut self, cell: CellCoord, event: CycleEvent, period: Duration) {
        self.push(event.created_at + period, cell, event, 1);
    }

    /// Queue the firing after `fired`, one period past its due instant.
    pub fn rearm(&mut self, fired: &ScheduledEcho, period: Duration) {
        self.push(fired.due + period, fired.cell, fired.event, fired.ordinal + 1);
    }

    fn push(&mut self, due: Instant, cell: CellCoord, event: CycleEvent, ordinal: u32) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.push(ScheduledEcho {
            due,
            cell,
            event,
            ordinal,
            seq,
        });
    }

    /// Pop the earliest record if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<ScheduledEcho> {
        if self.queue.peek()?.due <= now {
            self.queue.pop()
        } else {
            None
        }
    }

    /// Pop every record currently due at `now`, earliest first.
    pub fn poll(&mut self, now: Instant) -> Vec<ScheduledEcho> {
        let mut due = Vec::new();
        while let Some(record) = self.pop_due(now) {
            due.push(record);
        }
        due
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due instant of the earliest pending record.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|r| r.due)
    }

    /// Pending records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEcho> {
        self.queue.iter()
    }

    /// Cancel every chain.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
