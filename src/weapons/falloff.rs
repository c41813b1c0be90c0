//! Distance-keyed damage falloff
//!
//! A falloff table is a step function: damage is constant inside a bucket
//! and drops at the bucket's upper bound. No interpolation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which falloff table on a weapon a table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalloffZone {
    Body,
    Head,
}

/// Why a falloff table was rejected at load time
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FalloffTableError {
    #[error("table has no breakpoints")]
    Empty,

    #[error("last breakpoint ends at {0} instead of infinity")]
    NotTerminated(f32),

    #[error("breakpoint {index} does not extend past the previous one")]
    NotAscending { index: usize },

    #[error("damage rises at breakpoint {index}")]
    DamageIncreases { index: usize },

    #[error("breakpoint {index} has negative or non-finite damage")]
    NegativeDamage { index: usize },
}

/// One bucket of a falloff table: `damage` applies up to and including
/// `max_distance`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FalloffBreakpoint {
    pub max_distance: f32,
    pub damage: f32,
}

impl FalloffBreakpoint {
    pub fn new(max_distance: f32, damage: f32) -> Self {
        Self {
            max_distance,
            damage,
        }
    }
}

/// Ascending breakpoint list terminated by an unbounded bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageFalloffTable {
    breakpoints: Vec<FalloffBreakpoint>,
}

impl DamageFalloffTable {
    /// Build a validated table
    pub fn new(breakpoints: Vec<FalloffBreakpoint>) -> Result<Self, FalloffTableError> {
        let table = Self { breakpoints };
        table.validate()?;
        Ok(table)
    }

    /// Build a validated table from `(max_distance, damage)` pairs
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Result<Self, FalloffTableError> {
        let table = Self::authored(pairs);
        table.validate()?;
        Ok(table)
    }

    /// Build from authored pairs without checking the invariant
    ///
    /// Registries validate every table on insert, so catalog data built
    /// this way is still rejected at load time if malformed.
    pub fn authored(pairs: &[(f32, f32)]) -> Self {
        Self {
            breakpoints: pairs
                .iter()
                .map(|&(max_distance, damage)| FalloffBreakpoint::new(max_distance, damage))
                .collect(),
        }
    }

    /// A table that deals the same damage at every distance
    pub fn flat(damage: f32) -> Self {
        Self {
            breakpoints: vec![FalloffBreakpoint::new(f32::INFINITY, damage)],
        }
    }

    pub fn breakpoints(&self) -> &[FalloffBreakpoint] {
        &self.breakpoints
    }

    /// Check the table invariant
    ///
    /// Tables deserialized from data skip construction, so registries call
    /// this on every table they accept.
    pub fn validate(&self) -> Result<(), FalloffTableError> {
        let last = self.breakpoints.last().ok_or(FalloffTableError::Empty)?;

        for (index, bp) in self.breakpoints.iter().enumerate() {
            if !bp.damage.is_finite() || bp.damage < 0.0 {
                return Err(FalloffTableError::NegativeDamage { index });
            }
            if index == 0 {
                if bp.max_distance.is_nan() || bp.max_distance < 0.0 {
                    return Err(FalloffTableError::NotAscending { index });
                }
                continue;
            }
            let prev = self.breakpoints[index - 1];
            // `!(a > b)` also rejects NaN
            if !(bp.max_distance > prev.max_distance) {
                return Err(FalloffTableError::NotAscending { index });
            }
            if bp.damage > prev.damage {
                return Err(FalloffTableError::DamageIncreases { index });
            }
        }

        if last.max_distance != f32::INFINITY {
            return Err(FalloffTableError::NotTerminated(last.max_distance));
        }

        Ok(())
    }

    /// Damage for a travel distance
    ///
    /// Returns the damage of the first bucket whose upper bound is at or
    /// beyond `distance`. Negative and NaN distances count as zero.
    pub fn resolve(&self, distance: f32) -> f32 {
        let distance = distance.max(0.0);
        self.breakpoints
            .iter()
            .find(|bp| bp.max_distance >= distance)
            .or_else(|| self.breakpoints.last())
            .map(|bp| bp.damage)
            .unwrap_or(0.0)
    }

    /// Multiply every bucket's damage by `factor`
    ///
    /// Monotone falloff is preserved for non-negative factors.
    pub fn scale_damage(&mut self, factor: f32) {
        let factor = factor.max(0.0);
        for bp in &mut self.breakpoints {
            bp.damage *= factor;
        }
    }

    /// Multiply every finite bucket bound by `factor`
    pub fn scale_distances(&mut self, factor: f32) {
        let factor = factor.max(0.0);
        for bp in &mut self.breakpoints {
            if bp.max_distance.is_finite() {
                bp.max_distance *= factor;
            }
        }
    }
}

/// Resolve damage from a falloff table at a travel distance
pub fn resolve_damage(table: &DamageFalloffTable, distance: f32) -> f32 {
    table.resolve(distance)
}
