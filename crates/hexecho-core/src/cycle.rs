#![forbid(unsafe_code)]

//! Cycle validation for a finished drag selection.
//!
//! A selection counts as a cycle when it is a closed walk in the
//! [`HexGraph`] in which every entry touches exactly two other entries. The
//! closed-walk test alone would accept a path that doubles back through a
//! region or carries a spur; the degree test narrows acceptance to simple
//! loops.
//!
//! Checks run in order and stop at the first failure:
//!
//! 1. length at least [`MIN_CYCLE_LEN`]
//! 2. every consecutive pair adjacent, including last to first
//! 3. no cell appears twice
//! 4. every entry has in-selection degree exactly 2
//!
//! Step 3 closes a gap in the degree test: a back-and-forth walk such as
//! `A, B, C, B` has degree 2 everywhere once repeated entries are counted.
//!
//! On this lattice no closed 4- or 5-walk passes step 3 (any such loop has a
//! chord), so the smallest accepted cycle is the six-cell ring around a cell.

use std::fmt;

use ahash::AHashSet;

use crate::color::{HIGHLIGHT_EXACT, HIGHLIGHT_OVER, HIGHLIGHT_UNDER, Rgba};
use crate::coord::CellCoord;
use crate::graph::HexGraph;

use crate::trace;

/// Shortest selection that can be accepted.
pub const MIN_CYCLE_LEN: usize = 4;

/// Required in-selection degree of every cycle member.
pub const CYCLE_DEGREE: usize = 2;

/// Why a selection was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Fewer than [`MIN_CYCLE_LEN`] entries.
    TooShort { len: usize },
    /// Entry `index` is not adjacent to its successor (wrapping).
    Broken { index: usize },
    /// Entry `index` repeats a cell seen earlier in the selection.
    Revisit { index: usize },
    /// Entry `index` touches `degree` other entries instead of two.
    WrongDegree { index: usize, degree: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => {
                write!(f, "selection of {len} cells is shorter than {MIN_CYCLE_LEN}")
            }
            Self::Broken { index } => write!(f, "no edge between entry {index} and its successor"),
            Self::Revisit { index } => write!(f, "entry {index} revisits an earlier cell"),
            Self::WrongDegree { index, degree } => {
                write!(f, "entry {index} has {degree} neighbors in the selection")
            }
        }
    }
}

/// Run every check and report the first failure.
pub fn check_cycle(sequence: &[CellCoord], graph: &HexGraph) -> Result<(), Rejection> {
    let len = sequence.len();
    if len < MIN_CYCLE_LEN {
        trace!(len, "cycle rejected: too short");
        return Err(Rejection::TooShort { len });
    }

    for index in 0..len {
        let next = sequence[(index + 1) % len];
        if !graph.are_neighbors(sequence[index], next) {
            trace!(index, "cycle rejected: broken walk");
            return Err(Rejection::Broken { index });
        }
    }

    let mut seen = AHashSet::with_capacity(len);
    for (index, cell) in sequence.iter().enumerate() {
        if !seen.insert(*cell) {
            trace!(index, "cycle rejected: revisit");
            return Err(Rejection::Revisit { index });
        }
    }

    for index in 0..len {
        let degree = degree_in_sequence(sequence, index, graph);
        if degree != CYCLE_DEGREE {
            trace!(index, degree, "cycle rejected: wrong degree");
            return Err(Rejection::WrongDegree { index, degree });
        }
    }

    Ok(())
}

/// Whether `sequence` is a simple cycle in `graph`.
#[inline]
#[must_use]
pub fn validate(sequence: &[CellCoord], graph: &HexGraph) -> bool {
    check_cycle(sequence, graph).is_ok()
}

/// Number of entries (other than those equal to `sequence[index]`) adjacent to
/// `sequence[index]`. Repeated entries are counted each time they appear.
#[must_use]
pub fn degree_in_sequence(sequence: &[CellCoord], index: usize, graph: &HexGraph) -> usize {
    let cell = sequence[index];
    sequence
        .iter()
        .filter(|&&other| other != cell && graph.are_neighbors(cell, other))
        .count()
}

/// Degree of a selection entry relative to [`CYCLE_DEGREE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegreeClass {
    Under,
    Exact,
    Over,
}

impl DegreeClass {
    #[must_use]
    pub fn of(degree: usize) -> Self {
        match degree.cmp(&CYCLE_DEGREE) {
            std::cmp::Ordering::Less => Self::Under,
            std::cmp::Ordering::Equal => Self::Exact,
            std::cmp::Ordering::Greater => Self::Over,
        }
    }

    /// Live-feedback highlight color.
    #[must_use]
    pub const fn highlight(self) -> Rgba {
        match self {
            Self::Under => HIGHLIGHT_UNDER,
            Self::Exact => HIGHLIGHT_EXACT,
            Self::Over => HIGHLIGHT_OVER,
        }
    }
}

/// Degree class of every entry, in sequence order.
#[must_use]
pub fn degree_classes(sequence: &[CellCoord], graph: &HexGraph) -> Vec<DegreeClass> {
    (0..sequence.len())
        .map(|i| DegreeClass::of(degree_in_sequence(sequence, i, graph)))
        .collect()
}
