#![forbid(unsafe_code)]

//! hexecho public facade crate.
//!
//! Re-exports the types an input/render loop needs from the internal crates
//! and offers a small prelude.
//!
//! ```rust,ignore
//! use hexecho::prelude::*;
//!
//! let mut session = HexSession::default();
//! let layout = HexLayout::fit(session.dims(), 1280.0, 720.0, 40.0);
//! if let Some(cell) = session.resolve(&layout, Point::new(x, y)) {
//!     session.on_gesture_start(cell, Instant::now());
//! }
//! ```

// --- Core re-exports -------------------------------------------------------

pub use hexecho_core::{
    CellCoord, DegreeClass, GridDims, GridError, HexGraph, HexLayout, Palette, PaletteSlot, Point,
    Rejection, Rgb, Rgba, SelectionTracker, Sensitivity, SensitivityError, check_cycle,
    degree_classes, validate,
};

// --- Runtime re-exports ----------------------------------------------------

pub use hexecho_runtime::{
    CellState, ConfigError, CycleEvent, CycleId, DebugTuning, DecayConfig, DecayPhase, EchoConfig,
    EchoScheduler, FlashConfig, GestureOutcome, HexPolicy, HexSession, Instant, SessionConfig,
    TickReport,
};

pub use hexecho_core as core;
pub use hexecho_runtime as runtime;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for hexecho setup.
///
/// The gesture and tick paths never fail; errors only arise while building a
/// grid, validating a session config or loading a policy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Sensitivity(#[from] SensitivityError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard result type for hexecho APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a session for `rows` x `cols` with every other setting at its default.
pub fn session_with_grid(rows: u16, cols: u16) -> Result<HexSession> {
    let dims = GridDims::new(rows, cols)?;
    Ok(HexSession::new(SessionConfig {
        dims,
        ..SessionConfig::default()
    })?)
}

/// Build a session from a policy file, picking the format from the extension
/// (`.json` is JSON, anything else TOML).
#[cfg(feature = "policy-config")]
pub fn session_from_policy_file(path: impl AsRef<std::path::Path>) -> Result<HexSession> {
    let path = path.as_ref();
    let policy = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => HexPolicy::from_json_file(path)?,
        _ => HexPolicy::from_toml_file(path)?,
    };
    Ok(HexSession::new(policy.to_session_config()?)?)
}

pub mod prelude {
    pub use crate::{
        CellCoord, CycleId, Error, GestureOutcome, GridDims, HexLayout, HexSession, Instant, Point,
        Result, Rgb, SessionConfig, TickReport,
    };

    pub use crate::{core, runtime};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_errors_convert() {
        let err = session_with_grid(5, 10).unwrap_err();
        assert!(matches!(err, Error::Grid(GridError::OddRows(5))));
        assert_eq!(err.to_string(), "grid row count must be even, got 5");
    }

    #[test]
    fn sensitivity_errors_convert() {
        fn parse(v: f64) -> Result<Sensitivity> {
            Ok(Sensitivity::new(v)?)
        }
        assert!(matches!(parse(0.0), Err(Error::Sensitivity(_))));
        assert!(parse(0.5).is_ok());
    }

    #[test]
    fn config_errors_convert() {
        let mut policy = HexPolicy::default();
        policy.flash.interval_ms = 0;
        let err: Error = policy.to_session_config().unwrap_err().into();
        assert!(err.to_string().contains("flash.interval"));
    }

    #[test]
    fn invalid_session_config_converts() {
        let config = SessionConfig {
            echo: EchoConfig {
                decay_factor: 1.0,
                ..EchoConfig::default()
            },
            ..SessionConfig::default()
        };
        let err: Error = HexSession::new(config).unwrap_err().into();
        assert!(matches!(err, Error::Config(ConfigError::Validation(_))));
        assert!(err.to_string().contains("echo.decay_factor"));
    }

    #[test]
    fn prelude_drives_a_session() {
        use crate::prelude::*;

        let mut session = session_with_grid(6, 8).unwrap();
        let now = Instant::now();
        let ring = session.graph().ring_around(CellCoord::new(2, 3));
        session.on_gesture_start(ring[0], now);
        for &cell in &ring[1..] {
            session.on_gesture_extend(cell);
        }
        let outcome: GestureOutcome = session.on_gesture_end(now);
        assert!(outcome.is_valid());
        let report: TickReport = session.tick(now);
        assert!(!report.changed());
    }
}
