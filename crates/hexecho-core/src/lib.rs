#![forbid(unsafe_code)]

//! Core: hex grid topology, drag selection, and cycle validation.
//!
//! # Role in hexecho
//! `hexecho-core` is the pure decision layer. It knows nothing about time:
//! it owns the toroidal adjacency graph, the drag-selection tracker, the
//! cycle validator, and the palette and layout math a renderer needs.
//!
//! # Primary responsibilities
//! - **HexGraph**: six-neighbor adjacency under toroidal wrap.
//! - **SelectionTracker**: ordered cells visited during one drag.
//! - **check_cycle / validate**: closed-walk plus degree-2 cycle test.
//! - **HexLayout**: cell centers and point-to-cell resolution.
//!
//! # How it fits in the system
//! `hexecho-runtime` wraps these pieces in a session that adds the clock:
//! decay, echoes, and flash feedback.

pub mod color;
pub mod coord;
pub mod cycle;
pub mod geometry;
pub mod graph;
pub mod logging;
pub mod selection;

// Tracing macros at the crate root; no-op shims when the feature is off.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace};

pub use color::{Palette, PaletteSlot, Rgb, Rgba};
pub use coord::{CellCoord, GridDims, GridError};
pub use cycle::{
    DegreeClass, Rejection, check_cycle, degree_classes, degree_in_sequence, validate,
};
pub use geometry::{HexLayout, Point, Sensitivity, SensitivityError};
pub use graph::HexGraph;
pub use selection::SelectionTracker;
