#![forbid(unsafe_code)]

//! Policy-as-data configuration for a hexecho session.
//!
//! Every tunable of the grid, the fade, the echo timeline, the rejection
//! flash and debug mode lives in one [`HexPolicy`] that can be loaded from
//! TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # hexecho.toml
//! [grid]
//! rows = 12
//! cols = 40
//!
//! [echo]
//! period_ms = 3000
//! decay_factor = 0.6
//! ```
//!
//! ```rust,ignore
//! let policy = HexPolicy::from_toml_file("hexecho.toml")?;
//! let session = HexSession::new(policy.to_session_config()?)?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value the matching runtime config uses, so
//! `HexPolicy::default().to_session_config()` equals
//! `SessionConfig::default()`.

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use hexecho_core::{GridDims, GridError, Palette, Sensitivity};

use crate::decay::{DebugTuning, DecayConfig};
use crate::echo_scheduler::EchoConfig;
use crate::flash::FlashConfig;
use crate::session::{SessionConfig, validate_tuning};

// ---------------------------------------------------------------------------
// Top-level HexPolicy
// ---------------------------------------------------------------------------

/// Every tunable parameter of a session, grouped by concern.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct HexPolicy {
    pub grid: GridPolicy,
    pub decay: DecayPolicy,
    pub echo: EchoPolicy,
    pub flash: FlashPolicy,
    pub debug: DebugPolicy,
}

impl HexPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter range. An empty list means the policy is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = GridDims::new(self.grid.rows, self.grid.cols) {
            errors.push(format!("grid: {e}"));
        }
        if let Err(e) = Sensitivity::new(self.grid.selection_sensitivity) {
            errors.push(format!("grid.selection_sensitivity: {e}"));
        }

        errors.extend(validate_tuning(
            &self.to_decay_config(),
            &self.to_echo_config(),
            &self.to_flash_config(),
            &self.to_debug_tuning(),
        ));

        errors
    }

    /// Build a [`DecayConfig`] from this policy.
    #[must_use]
    pub fn to_decay_config(&self) -> DecayConfig {
        DecayConfig {
            rate_per_tick: self.decay.rate_per_tick,
            grace: Duration::from_millis(self.decay.grace_ms),
        }
    }

    /// Build an [`EchoConfig`] from this policy.
    #[must_use]
    pub fn to_echo_config(&self) -> EchoConfig {
        EchoConfig {
            period: Duration::from_millis(self.echo.period_ms),
            decay_factor: self.echo.decay_factor,
            visibility_floor: self.echo.visibility_floor,
        }
    }

    /// Build a [`FlashConfig`] from this policy.
    #[must_use]
    pub fn to_flash_config(&self) -> FlashConfig {
        FlashConfig {
            interval: Duration::from_millis(self.flash.interval_ms),
            count: self.flash.count,
        }
    }

    /// Build the [`DebugTuning`] from this policy.
    #[must_use]
    pub fn to_debug_tuning(&self) -> DebugTuning {
        DebugTuning {
            decay_multiplier: self.debug.decay_multiplier,
            echo_period_divisor: self.debug.echo_period_divisor,
        }
    }

    /// Validate and convert into a ready-to-use [`SessionConfig`].
    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        let dims = GridDims::new(self.grid.rows, self.grid.cols)?;
        let sensitivity = Sensitivity::new(self.grid.selection_sensitivity)
            .map_err(|e| ConfigError::Validation(vec![e.to_string()]))?;
        Ok(SessionConfig {
            dims,
            sensitivity,
            palette: Palette::default(),
            decay: self.to_decay_config(),
            echo: self.to_echo_config(),
            flash: self.to_flash_config(),
            debug: self.to_debug_tuning(),
            debug_enabled: self.debug.enabled,
        })
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Grid size and pointer resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct GridPolicy {
    /// Default: 8. Must be even and at least 4.
    pub rows: u16,
    /// Default: 32. At least 3.
    pub cols: u16,
    /// Fraction of the cell radius that counts as a hit. Default: 0.8.
    pub selection_sensitivity: f64,
}

impl Default for GridPolicy {
    fn default() -> Self {
        let dims = GridDims::default();
        Self {
            rows: dims.rows(),
            cols: dims.cols(),
            selection_sensitivity: Sensitivity::default().get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct DecayPolicy {
    /// Channel decrement per tick. Default: 2.
    pub rate_per_tick: u8,
    /// Hold after each cycle or echo (ms). Default: 300.
    pub grace_ms: u64,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            rate_per_tick: 2,
            grace_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct EchoPolicy {
    /// Time between echoes (ms). Default: 4000.
    pub period_ms: u64,
    /// Per-echo attenuation. Default: 0.5.
    pub decay_factor: f64,
    /// Echoes at or below this intensity end the chain. Default: 1.0.
    pub visibility_floor: f64,
}

impl Default for EchoPolicy {
    fn default() -> Self {
        Self {
            period_ms: 4000,
            decay_factor: 0.5,
            visibility_floor: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct FlashPolicy {
    /// Toggle spacing (ms). Default: 200.
    pub interval_ms: u64,
    /// Blink count; the highlight toggles twice per blink. Default: 2.
    pub count: u32,
}

impl Default for FlashPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            count: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct DebugPolicy {
    /// Start with debug mode on. Default: false.
    pub enabled: bool,
    /// Default: 5.
    pub decay_multiplier: u8,
    /// Default: 4.
    pub echo_period_divisor: u32,
}

impl Default for DebugPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            decay_multiplier: 5,
            echo_period_divisor: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or converting a policy.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "policy-config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "policy-config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Grid(#[from] GridError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
