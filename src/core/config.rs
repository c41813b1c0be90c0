//! Evaluation configuration with documented constants
//!
//! Tunables shared by the ballistics stepper and the spread resolver.
//! Weapon-specific numbers live on the weapon definitions, not here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::ArmoryError;

/// Configuration for fire-time evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmoryConfig {
    // === BALLISTICS ===
    /// Velocity floor applied after drag (world units per second)
    ///
    /// Keeps segment flight time finite when drag would otherwise stall
    /// the projectile at zero velocity.
    pub min_velocity: f32,

    /// Smallest segment length the stepper will advance by
    ///
    /// Profiles authored with a zero or tiny segment length are stepped at
    /// this length instead.
    pub min_segment_length: f32,

    /// Hard cap on segments walked per trace
    ///
    /// At the default (4096) with 0.5 unit segments a trace covers
    /// 2048 units, well beyond any catalog weapon's max range.
    pub max_trace_segments: u32,

    // === SPREAD ===
    /// Upper bound on the resolved cone half-angle (radians)
    pub max_spread_angle: f32,

    /// Scale applied to destabilization while sprinting
    ///
    /// Sprint spread is already wide, so at 0.5 only half the
    /// destabilization angle is added on top of it.
    pub sprint_destabilization_scale: f32,
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            // Ballistics
            min_velocity: 0.5,
            min_segment_length: 0.05,
            max_trace_segments: 4096,

            // Spread
            max_spread_angle: 0.35,
            sprint_destabilization_scale: 0.5,
        }
    }
}

impl ArmoryConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ArmoryError> {
        let config: ArmoryConfig =
            toml::from_str(content).map_err(|e| ArmoryError::Config(e.to_string()))?;
        config.validate().map_err(ArmoryError::Config)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self, ArmoryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArmoryError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_velocity > 0.0 && self.min_velocity.is_finite()) {
            return Err(format!(
                "min_velocity ({}) must be positive and finite",
                self.min_velocity
            ));
        }

        if !(self.min_segment_length > 0.0 && self.min_segment_length.is_finite()) {
            return Err(format!(
                "min_segment_length ({}) must be positive and finite",
                self.min_segment_length
            ));
        }

        if self.max_trace_segments == 0 {
            return Err("max_trace_segments must be at least 1".into());
        }

        if !(self.max_spread_angle > 0.0 && self.max_spread_angle < std::f32::consts::FRAC_PI_2) {
            return Err(format!(
                "max_spread_angle ({}) should be in (0, pi/2)",
                self.max_spread_angle
            ));
        }

        if !(self.sprint_destabilization_scale >= 0.0
            && self.sprint_destabilization_scale.is_finite())
        {
            return Err(format!(
                "sprint_destabilization_scale ({}) must be finite and not negative",
                self.sprint_destabilization_scale
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<ArmoryConfig> = OnceLock::new();

/// Get the global config (initializes with defaults if not set)
pub fn config() -> &'static ArmoryConfig {
    CONFIG.get_or_init(ArmoryConfig::default)
}

/// Set the global config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: ArmoryConfig) -> Result<(), ArmoryConfig> {
    CONFIG.set(config)
}
