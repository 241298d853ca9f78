#![forbid(unsafe_code)]

//! Blink feedback for a rejected selection.
//!
//! The held cells toggle their highlight `count * 2` times, `interval` apart,
//! with the first toggle at the instant the flash starts. The last toggle
//! also clears the selection. Like the gesture recognizer this is driven by
//! caller-supplied instants; nothing here owns a timer.

use std::time::Duration;

use hexecho_core::CellCoord;
use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashConfig {
    /// Time between toggles. Default: 200ms.
    pub interval: Duration,
    /// Number of on/off blinks. Default: 2.
    pub count: u32,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            count: 2,
        }
    }
}

impl FlashConfig {
    #[inline]
    #[must_use]
    pub fn total_toggles(&self) -> u32 {
        self.count.saturating_mul(2)
    }
}

/// What [`Flash::advance`] owes the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlashStep {
    /// Highlight toggles that came due.
    pub toggles: u32,
    /// The final toggle happened; clear the selection.
    pub finished: bool,
}

/// A flash in progress.
#[derive(Debug, Clone)]
pub struct Flash {
    cells: Vec<CellCoord>,
    next_at: Instant,
    done: u32,
    total: u32,
    interval: Duration,
}

impl Flash {
    /// Begin flashing `cells`. Repeated cells are flashed once.
    #[must_use]
    pub fn start(mut cells: Vec<CellCoord>, now: Instant, config: &FlashConfig) -> Self {
        cells.sort_unstable();
        cells.dedup();
        Self {
            cells,
            next_at: now,
            done: 0,
            total: config.total_toggles(),
            interval: config.interval,
        }
    }

    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.done >= self.total
    }

    /// Instant of the next toggle, if any remain.
    #[must_use]
    pub fn next_at(&self) -> Option<Instant> {
        (!self.is_finished()).then_some(self.next_at)
    }

    /// Count toggles due at `now`.
    pub fn advance(&mut self, now: Instant) -> FlashStep {
        let mut step = FlashStep::default();
        while !self.is_finished() && self.next_at <= now {
            self.done += 1;
            self.next_at += self.interval;
            step.toggles += 1;
        }
        step.finished = self.is_finished();
        step
    }

    /// Skip the remaining toggles.
    pub fn finish(&mut self) -> FlashStep {
        let step = FlashStep {
            toggles: self.total.saturating_sub(self.done),
            finished: true,
        };
        self.done = self.total;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_toggle_is_immediate() {
        let t0 = Instant::now();
        let mut f = Flash::start(vec![CellCoord::new(1, 1)], t0, &FlashConfig::default());
        assert_eq!(
            f.advance(t0),
            FlashStep {
                toggles: 1,
                finished: false
            }
        );
        assert_eq!(f.next_at(), Some(t0 + ms(200)));
    }

    #[test]
    fn finishes_on_fourth_toggle() {
        let t0 = Instant::now();
        let mut f = Flash::start(vec![CellCoord::new(1, 1)], t0, &FlashConfig::default());
        f.advance(t0);
        assert_eq!(f.advance(t0 + ms(399)).toggles, 1);
        let last = f.advance(t0 + ms(600));
        assert_eq!(last.toggles, 2);
        assert!(last.finished);
        assert_eq!(f.next_at(), None);
        assert_eq!(f.advance(t0 + ms(5000)).toggles, 0);
    }

    #[test]
    fn finish_reports_skipped_toggles() {
        let t0 = Instant::now();
        let mut f = Flash::start(vec![CellCoord::new(1, 1)], t0, &FlashConfig::default());
        f.advance(t0);
        assert_eq!(
            f.finish(),
            FlashStep {
                toggles: 3,
                finished: true
            }
        );
        assert!(f.is_finished());
    }

    #[test]
    fn repeated_cells_flash_once() {
        let a = CellCoord::new(2, 2);
        let b = CellCoord::new(2, 3);
        let f = Flash::start(vec![a, b, a], Instant::now(), &FlashConfig::default());
        assert_eq!(f.cells(), &[a, b]);
    }

    #[test]
    fn zero_count_finishes_immediately() {
        let cfg = FlashConfig {
            interval: ms(200),
            count: 0,
        };
        let t0 = Instant::now();
        let mut f = Flash::start(vec![CellCoord::new(0, 0)], t0, &cfg);
        assert!(f.advance(t0).finished);
    }
}
