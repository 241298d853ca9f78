#![forbid(unsafe_code)]

//! Runtime: the clock-driven half of hexecho.
//!
//! # Role in hexecho
//! `hexecho-runtime` turns the pure decisions of `hexecho-core` into state
//! that changes over time. Accepted cycles light their cells, the cells fade,
//! and echoes re-light them at shrinking intensity until they vanish.
//! Rejected selections blink and clear.
//!
//! # Primary responsibilities
//! - **HexSession**: owns grid, cells, selection, echoes and flash; exposes
//!   the gesture and tick calls.
//! - **CellState**: per-cell decay state machine and cycle history.
//! - **EchoScheduler**: priority queue of pending echo firings.
//! - **HexPolicy**: every tunable, loadable from TOML or JSON.
//!
//! # How it fits in the system
//! An input/render loop resolves pointer positions to cells with
//! [`hexecho_core::HexLayout`], feeds them to a [`HexSession`], calls
//! [`HexSession::tick`] once per frame, and draws [`HexSession::cells`].
//! Every call takes the current instant from the caller.

pub mod decay;
pub mod echo_scheduler;
pub mod flash;
pub mod policy_config;
pub mod session;

pub use decay::{CellState, CycleEvent, CycleId, DebugTuning, DecayConfig, DecayPhase};
pub use echo_scheduler::{EchoConfig, EchoFiring, EchoScheduler, ScheduledEcho};
pub use flash::{Flash, FlashConfig};
pub use policy_config::{ConfigError, HexPolicy};
pub use session::{GestureOutcome, HexSession, SessionConfig, TickReport};

pub use web_time::Instant;
