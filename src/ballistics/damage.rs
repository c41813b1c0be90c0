//! Fire-time damage resolution
//!
//! Composes the stepper, the falloff evaluator and the spread resolver into
//! a single per-shot result. Everything here is a total function over
//! validated data.

use serde::{Deserialize, Serialize};

use crate::ballistics::spread::{spread_cone_with, Stance};
use crate::ballistics::stepper::{trace_with, TraceResult};
use crate::core::config::{config, ArmoryConfig};
use crate::weapons::definition::WeaponDefinition;
use crate::weapons::falloff::FalloffZone;

/// Where a projectile landed on the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitZone {
    Head,
    Body,
    Limb,
}

/// Damage for a hit zone at an effective distance
///
/// Head hits read the head table (falling back to body); limb hits are
/// the body value scaled by the limb multiplier.
pub fn zone_damage(def: &WeaponDefinition, distance: f32, zone: HitZone) -> f32 {
    match zone {
        HitZone::Head => def.damage.table(FalloffZone::Head).resolve(distance),
        HitZone::Body => def.damage.body.resolve(distance),
        HitZone::Limb => def.damage.body.resolve(distance) * def.damage.limb_multiplier,
    }
}

/// Outcome of one trigger pull against a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotResolution {
    pub trace: TraceResult,
    pub zone: HitZone,
    pub damage_per_projectile: f32,
    pub projectiles: u32,
    /// Damage if every projectile connects
    pub total_damage: f32,
    /// Cone half-angle to draw the shot direction from (radians)
    pub spread: f32,
    /// False when the target was beyond max range and the trace was clamped
    pub in_range: bool,
}

pub fn resolve_shot(
    def: &WeaponDefinition,
    distance: f32,
    zone: HitZone,
    stance: Stance,
) -> ShotResolution {
    resolve_shot_with(def, distance, zone, stance, config())
}

pub fn resolve_shot_with(
    def: &WeaponDefinition,
    distance: f32,
    zone: HitZone,
    stance: Stance,
    cfg: &ArmoryConfig,
) -> ShotResolution {
    let trace = trace_with(&def.ballistics, distance, cfg);
    let damage_per_projectile = zone_damage(def, trace.effective_distance, zone);
    let projectiles = def.firing.projectiles_per_shot.max(1);

    ShotResolution {
        trace,
        zone,
        damage_per_projectile,
        projectiles,
        total_damage: damage_per_projectile * projectiles as f32,
        spread: spread_cone_with(def, stance, trace.destabilization_angle, cfg),
        in_range: !(distance > def.ballistics.max_range),
    }
}

/// Damage from a detonation `distance` units away
///
/// Throwable falloff tables are keyed by distance from the blast; nothing
/// outside the blast radius takes damage.
pub fn resolve_blast(def: &WeaponDefinition, distance: f32, zone: HitZone) -> f32 {
    let radius = def
        .throwable
        .as_ref()
        .map_or(f32::INFINITY, |throwable| throwable.blast_radius);
    if distance > radius {
        return 0.0;
    }
    zone_damage(def, distance, zone)
}
