#![forbid(unsafe_code)]

//! Per-cell decay state machine.
//!
//! A cell rests until a validated cycle colors it. It then fades one step per
//! render tick until every color channel reaches zero and it rests again.
//! Echo firings (see [`crate::echo_scheduler`]) re-light a cell at reduced
//! intensity and send it back into the fade.
//!
//! # State Machine
//!
//! ```text
//!            apply_cycle / apply_echo
//! Resting ───────────────────────────▶ Decaying ──┐ decay_step (held or faded)
//!    ▲                                    │  ◀────┘
//!    └──────── all channels at zero ──────┘
//! ```
//!
//! # Invariants
//!
//! 1. A cell no cycle has touched stays `Resting` with rest color forever.
//! 2. Without echoes, channel values and intensity never increase between
//!    decay steps.
//! 3. `Resting` implies rest color `(0, 0, 0)` and intensity 0.
//! 4. No decay happens within the grace period after the last echo event
//!    (the cycle application itself counts as one).
//! 5. An echo never lowers a cell that a newer cycle keeps at equal or higher
//!    intensity.

use std::fmt;
use std::time::Duration;

use hexecho_core::color::HIGHLIGHT_EXACT;
use hexecho_core::{PaletteSlot, Rgb, Rgba};
use web_time::Instant;

/// Full intensity of a freshly colored cell.
pub const MAX_INTENSITY: u8 = u8::MAX;

/// Identifier of a validated cycle. Strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleId(pub u64);

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Record left on a cell each time a validated cycle colors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleEvent {
    pub cycle: CycleId,
    pub slot: PaletteSlot,
    pub created_at: Instant,
}

/// Fade parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayConfig {
    /// Amount subtracted from each channel per tick. Default: 2.
    pub rate_per_tick: u8,
    /// Hold time after a cycle or echo before fading resumes. Default: 300ms.
    pub grace: Duration,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            rate_per_tick: 2,
            grace: Duration::from_millis(300),
        }
    }
}

impl DecayConfig {
    /// Parameters in effect with debug mode on: decay runs `decay_multiplier`
    /// times faster (saturating at 255 per tick).
    #[must_use]
    pub fn effective(&self, debug: Option<&DebugTuning>) -> Self {
        match debug {
            None => *self,
            Some(tuning) => Self {
                rate_per_tick: self
                    .rate_per_tick
                    .saturating_mul(tuning.decay_multiplier.max(1)),
                grace: self.grace,
            },
        }
    }
}

/// Speed-ups applied while debug mode is on. The state machine is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugTuning {
    /// Decay rate multiplier. Default: 5.
    pub decay_multiplier: u8,
    /// Echo period divisor. Default: 4.
    pub echo_period_divisor: u32,
}

impl Default for DebugTuning {
    fn default() -> Self {
        Self {
            decay_multiplier: 5,
            echo_period_divisor: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecayPhase {
    #[default]
    Resting,
    Decaying,
}

/// Result of one decay step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayStep {
    /// Cell is resting; nothing to do.
    Idle,
    /// Within the grace period.
    Held,
    /// Channels reduced, still visible.
    Faded,
    /// Reached zero and returned to rest on this step.
    Rested,
}

/// Everything a renderer needs to draw one cell, plus its cycle history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellState {
    color: Rgb,
    intensity: u8,
    phase: DecayPhase,
    slot: Option<PaletteSlot>,
    driving_cycle: Option<CycleId>,
    last_echo_at: Option<Instant>,
    highlighted: bool,
    highlight_color: Rgba,
    history: Vec<CycleEvent>,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            intensity: 0,
            phase: DecayPhase::Resting,
            slot: None,
            driving_cycle: None,
            last_echo_at: None,
            highlighted: false,
            highlight_color: HIGHLIGHT_EXACT,
            history: Vec::new(),
        }
    }
}

impl CellState {
    #[inline]
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    #[must_use]
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> DecayPhase {
        self.phase
    }

    /// Palette slot of the color currently shown (kept after the cell rests so
    /// the rotation continues from it).
    #[inline]
    #[must_use]
    pub fn slot(&self) -> Option<PaletteSlot> {
        self.slot
    }

    /// Cycle whose cycle application or echo last lit this cell.
    #[inline]
    #[must_use]
    pub fn driving_cycle(&self) -> Option<CycleId> {
        self.driving_cycle
    }

    #[inline]
    #[must_use]
    pub fn last_echo_at(&self) -> Option<Instant> {
        self.last_echo_at
    }

    #[inline]
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    #[inline]
    #[must_use]
    pub fn highlight_color(&self) -> Rgba {
        self.highlight_color
    }

    /// Every cycle event this cell took part in, oldest first.
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[CycleEvent] {
        &self.history
    }

    pub(crate) fn set_highlight(&mut self, on: bool, color: Rgba) {
        self.highlighted = on;
        self.highlight_color = color;
    }

    pub(crate) fn toggle_highlight(&mut self) {
        self.highlighted = !self.highlighted;
    }

    pub(crate) fn clear_highlight(&mut self) {
        self.set_highlight(false, HIGHLIGHT_EXACT);
    }

    /// Light the cell for a newly validated cycle and record the event.
    pub(crate) fn apply_cycle(
        &mut self,
        cycle: CycleId,
        slot: PaletteSlot,
        color: Rgb,
        now: Instant,
    ) -> CycleEvent {
        let event = CycleEvent {
            cycle,
            slot,
            created_at: now,
        };
        self.color = color;
        self.intensity = MAX_INTENSITY;
        self.phase = DecayPhase::Decaying;
        self.slot = Some(slot);
        self.driving_cycle = Some(cycle);
        self.last_echo_at = Some(now);
        self.highlighted = false;
        self.history.push(event);
        event
    }

    /// Re-light the cell for an echo of `event` at `intensity`.
    ///
    /// Returns `false` (and changes nothing) when a newer cycle already holds
    /// the cell at an equal or higher intensity.
    pub(crate) fn apply_echo(
        &mut self,
        event: &CycleEvent,
        color: Rgb,
        intensity: u8,
        now: Instant,
    ) -> bool {
        if let Some(current) = self.driving_cycle
            && current > event.cycle
            && self.intensity >= intensity
        {
            return false;
        }
        self.color = color.scaled(intensity);
        self.intensity = intensity;
        self.phase = DecayPhase::Decaying;
        self.slot = Some(event.slot);
        self.driving_cycle = Some(event.cycle);
        self.last_echo_at = Some(now);
        true
    }

    /// Advance the fade by one tick.
    pub(crate) fn decay_step(&mut self, config: &DecayConfig, now: Instant) -> DecayStep {
        if self.phase == DecayPhase::Resting {
            return DecayStep::Idle;
        }
        if let Some(last) = self.last_echo_at
            && now.saturating_duration_since(last) < config.grace
        {
            return DecayStep::Held;
        }
        self.color = self.color.saturating_sub(config.rate_per_tick);
        self.intensity = self.intensity.saturating_sub(config.rate_per_tick);
        if self.color.is_black() {
            self.color = Rgb::BLACK;
            self.intensity = 0;
            self.phase = DecayPhase::Resting;
            DecayStep::Rested
        } else {
            DecayStep::Faded
        }
    }
}
