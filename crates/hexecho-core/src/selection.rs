#![forbid(unsafe_code)]

//! Drag selection tracking.
//!
//! [`SelectionTracker`] records the ordered cells a pointer passes over during
//! one drag gesture. It deliberately does not check adjacency while the drag is
//! in progress: a jump or a self-crossing stays in the sequence and surfaces
//! later as a normal cycle rejection instead of a silently dropped input.
//!
//! # State Machine
//!
//! ```text
//! Idle --begin()--> Active --extend(c)*--> Active --end()--> Idle
//! ```
//!
//! # Invariants
//!
//! 1. No two consecutive entries are equal.
//! 2. `begin()` discards any unterminated previous sequence.
//! 3. `extend()` while idle is a no-op.
//! 4. After `end()` the tracker is idle and empty.

use crate::coord::CellCoord;

/// Ordered cell sequence for the active gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    cells: Vec<CellCoord>,
    active: bool,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: Vec::with_capacity(16),
            active: false,
        }
    }

    /// Start a new gesture, dropping whatever was recorded before.
    pub fn begin(&mut self) {
        self.cells.clear();
        self.active = true;
    }

    /// Append `cell` unless it repeats the last entry.
    ///
    /// Returns `true` when the sequence grew.
    pub fn extend(&mut self, cell: CellCoord) -> bool {
        if !self.active || self.cells.last() == Some(&cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    /// Cells recorded so far.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Whether a gesture is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Finish the gesture and hand over the recorded sequence.
    pub fn end(&mut self) -> Vec<CellCoord> {
        self.active = false;
        std::mem::take(&mut self.cells)
    }
}
