//! Spread cone and recoil sampling

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::core::config::{config, ArmoryConfig};
use crate::weapons::definition::{HandlingModel, WeaponDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    #[default]
    Hip,
    Ads,
    Sprint,
}

/// Base cone half-angle for a stance
pub fn stance_spread(handling: &HandlingModel, stance: Stance) -> f32 {
    match stance {
        Stance::Hip => handling.hip_spread,
        Stance::Ads => handling.ads_spread,
        Stance::Sprint => handling.sprint_spread,
    }
}

pub fn spread_cone(def: &WeaponDefinition, stance: Stance, destabilization_angle: f32) -> f32 {
    spread_cone_with(def, stance, destabilization_angle, config())
}

/// Stance spread plus destabilization, capped at `max_spread_angle`
pub fn spread_cone_with(
    def: &WeaponDefinition,
    stance: Stance,
    destabilization_angle: f32,
    cfg: &ArmoryConfig,
) -> f32 {
    let destabilization = match stance {
        Stance::Sprint => destabilization_angle * cfg.sprint_destabilization_scale,
        Stance::Hip | Stance::Ads => destabilization_angle,
    };
    let cone = stance_spread(&def.handling, stance) + destabilization.max(0.0);
    if cone.is_nan() {
        return 0.0;
    }
    cone.clamp(0.0, cfg.max_spread_angle)
}

/// Draw a (yaw, pitch) offset uniformly from a cone's disk
pub fn sample_spread_offset<R: Rng + ?Sized>(cone: f32, rng: &mut R) -> Vec2 {
    if !(cone > 0.0) {
        return Vec2::ZERO;
    }
    let radius = cone * rng.gen::<f32>().sqrt();
    let theta = rng.gen::<f32>() * TAU;
    Vec2::new(radius * theta.cos(), radius * theta.sin())
}

/// Draw a (yaw, pitch) recoil kick: full pitch up, yaw either way
pub fn sample_recoil_kick<R: Rng + ?Sized>(handling: &HandlingModel, rng: &mut R) -> Vec2 {
    let yaw = if handling.recoil_yaw > 0.0 {
        rng.gen_range(-handling.recoil_yaw..=handling.recoil_yaw)
    } else {
        0.0
    };
    Vec2::new(yaw, handling.recoil_pitch)
}
