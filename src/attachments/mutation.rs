//! Typed mutation operations applied by attachments
//!
//! An attachment's effect is a list of `Mutation`s run in order against
//! the accumulating derived definition. Mutations only ever touch the
//! definition they are handed; they can read state left by earlier
//! attachments through `Mutation::When`.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::weapons::definition::{AmmoType, WeaponCategory, WeaponDefinition, WeaponFlag};
use crate::weapons::falloff::{DamageFalloffTable, FalloffTableError, FalloffZone};

/// Shortest fire interval a mutation can produce (seconds)
pub const MIN_FIRE_INTERVAL: f32 = 0.01;

/// Scalar stat addressable by set/scale/add mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    FireInterval,
    ProjectilesPerShot,
    AmmoPerShot,
    MagazineSize,
    ReserveAmmo,
    /// Both reload times; an explicit empty reload time scales along
    ReloadTime,
    EmptyReloadTime,
    MuzzleVelocity,
    DragPerSegment,
    Gravity,
    SegmentLength,
    DestabilizeDistance,
    DestabilizeAmount,
    MaxRange,
    BaseDamage,
    LimbMultiplier,
    HipSpread,
    AdsSpread,
    SprintSpread,
    SprintSpeedMultiplier,
    RecoilPitch,
    RecoilYaw,
    RecoilRecovery,
}

impl Stat {
    /// Current value of the stat; integer stats are widened
    pub fn get(self, def: &WeaponDefinition) -> f32 {
        use Stat::*;
        match self {
            FireInterval => def.firing.fire_interval,
            ProjectilesPerShot => def.firing.projectiles_per_shot as f32,
            AmmoPerShot => def.firing.ammo_per_shot as f32,
            MagazineSize => def.firing.magazine_size as f32,
            ReserveAmmo => def.firing.reserve_ammo as f32,
            ReloadTime => def.firing.reload_time,
            EmptyReloadTime => def.firing.reload_duration(0),
            MuzzleVelocity => def.ballistics.muzzle_velocity,
            DragPerSegment => def.ballistics.drag_per_segment,
            Gravity => def.ballistics.gravity,
            SegmentLength => def.ballistics.segment_length,
            DestabilizeDistance => def.ballistics.destabilize_distance,
            DestabilizeAmount => def.ballistics.destabilize_amount,
            MaxRange => def.ballistics.max_range,
            BaseDamage => def.damage.base_damage,
            LimbMultiplier => def.damage.limb_multiplier,
            HipSpread => def.handling.hip_spread,
            AdsSpread => def.handling.ads_spread,
            SprintSpread => def.handling.sprint_spread,
            SprintSpeedMultiplier => def.handling.sprint_speed_multiplier,
            RecoilPitch => def.handling.recoil_pitch,
            RecoilYaw => def.handling.recoil_yaw,
            RecoilRecovery => def.handling.recoil_recovery,
        }
    }

    /// Write the stat, clamping to its legal range
    ///
    /// Every stat is non-negative; integer stats round to the nearest
    /// whole value and fire interval never drops below `MIN_FIRE_INTERVAL`.
    pub fn set(self, def: &mut WeaponDefinition, value: f32) {
        use Stat::*;
        let value = if value.is_nan() { 0.0 } else { value.max(0.0) };
        let count = value.round() as u32;
        match self {
            FireInterval => def.firing.fire_interval = value.max(MIN_FIRE_INTERVAL),
            ProjectilesPerShot => def.firing.projectiles_per_shot = count,
            AmmoPerShot => def.firing.ammo_per_shot = count,
            MagazineSize => def.firing.magazine_size = count,
            ReserveAmmo => def.firing.reserve_ammo = count,
            ReloadTime => {
                let previous = def.firing.reload_time;
                def.firing.reload_time = value;
                if let Some(empty) = def.firing.empty_reload_time.as_mut() {
                    if previous > 0.0 {
                        *empty *= value / previous;
                    }
                }
            }
            EmptyReloadTime => def.firing.empty_reload_time = Some(value),
            MuzzleVelocity => def.ballistics.muzzle_velocity = value,
            DragPerSegment => def.ballistics.drag_per_segment = value,
            Gravity => def.ballistics.gravity = value,
            SegmentLength => def.ballistics.segment_length = value,
            DestabilizeDistance => def.ballistics.destabilize_distance = value,
            DestabilizeAmount => def.ballistics.destabilize_amount = value,
            MaxRange => def.ballistics.max_range = value,
            BaseDamage => def.damage.base_damage = value,
            LimbMultiplier => def.damage.limb_multiplier = value,
            HipSpread => def.handling.hip_spread = value,
            AdsSpread => def.handling.ads_spread = value,
            SprintSpread => def.handling.sprint_spread = value,
            SprintSpeedMultiplier => def.handling.sprint_speed_multiplier = value,
            RecoilPitch => def.handling.recoil_pitch = value,
            RecoilYaw => def.handling.recoil_yaw = value,
            RecoilRecovery => def.handling.recoil_recovery = value,
        }
    }
}

/// State predicate a conditional mutation branches on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "is", rename_all = "snake_case")]
pub enum Condition {
    HasFlag { flag: WeaponFlag },
    LacksFlag { flag: WeaponFlag },
    Automatic,
    SemiAutomatic,
    AmmoType { ammo_type: AmmoType },
    Category { category: WeaponCategory },
}

impl Condition {
    pub fn holds(&self, def: &WeaponDefinition) -> bool {
        match self {
            Condition::HasFlag { flag } => def.has_flag(*flag),
            Condition::LacksFlag { flag } => !def.has_flag(*flag),
            Condition::Automatic => def.firing.automatic,
            Condition::SemiAutomatic => !def.firing.automatic,
            Condition::AmmoType { ammo_type } => def.firing.ammo_type == *ammo_type,
            Condition::Category { category } => def.category == *category,
        }
    }
}

/// Code-defined mutation for effects the typed operations cannot express
#[derive(Clone, Copy)]
pub struct CustomMutation {
    pub name: &'static str,
    pub apply: fn(&mut WeaponDefinition),
}

impl fmt::Debug for CustomMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomMutation({})", self.name)
    }
}

impl PartialEq for CustomMutation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// One step of an attachment's effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Set {
        stat: Stat,
        value: f32,
    },
    Scale {
        stat: Stat,
        factor: f32,
    },
    Add {
        stat: Stat,
        delta: f32,
    },
    SetAutomatic {
        automatic: bool,
    },
    SetAmmoType {
        ammo_type: AmmoType,
    },
    SetFlag {
        flag: WeaponFlag,
    },
    ClearFlag {
        flag: WeaponFlag,
    },
    /// Replace a zone's falloff table outright
    OverrideFalloff {
        zone: FalloffZone,
        table: DamageFalloffTable,
    },
    ScaleFalloffDamage {
        zone: FalloffZone,
        factor: f32,
    },
    ScaleFalloffRange {
        zone: FalloffZone,
        factor: f32,
    },
    /// Shift a mount point; unknown mounts are left alone
    NudgeMount {
        mount: String,
        offset: Vec3,
    },
    When {
        condition: Condition,
        #[serde(default)]
        then: Vec<Mutation>,
        #[serde(default)]
        otherwise: Vec<Mutation>,
    },
    #[serde(skip)]
    Custom(CustomMutation),
}

impl Mutation {
    pub fn set(stat: Stat, value: f32) -> Self {
        Mutation::Set { stat, value }
    }

    pub fn scale(stat: Stat, factor: f32) -> Self {
        Mutation::Scale { stat, factor }
    }

    pub fn add(stat: Stat, delta: f32) -> Self {
        Mutation::Add { stat, delta }
    }

    pub fn flag(flag: WeaponFlag) -> Self {
        Mutation::SetFlag { flag }
    }

    pub fn when(condition: Condition, then: Vec<Mutation>) -> Self {
        Mutation::When {
            condition,
            then,
            otherwise: Vec::new(),
        }
    }

    /// Apply to the accumulating definition
    pub fn apply(&self, def: &mut WeaponDefinition) {
        match self {
            Mutation::Set { stat, value } => stat.set(def, *value),
            Mutation::Scale { stat, factor } => {
                let current = stat.get(def);
                stat.set(def, current * factor);
            }
            Mutation::Add { stat, delta } => {
                let current = stat.get(def);
                stat.set(def, current + delta);
            }
            Mutation::SetAutomatic { automatic } => def.firing.automatic = *automatic,
            Mutation::SetAmmoType { ammo_type } => def.firing.ammo_type = *ammo_type,
            Mutation::SetFlag { flag } => {
                def.flags.insert(*flag);
            }
            Mutation::ClearFlag { flag } => {
                def.flags.remove(flag);
            }
            Mutation::OverrideFalloff { zone, table } => match zone {
                FalloffZone::Body => def.damage.body = table.clone(),
                FalloffZone::Head => def.damage.head = Some(table.clone()),
            },
            // A head without its own table resolves through body, which
            // already carries the body-zone mutations
            Mutation::ScaleFalloffDamage { zone, factor } => match def.damage.table_mut(*zone) {
                Some(table) => table.scale_damage(*factor),
                None => tracing::trace!("{} has no {:?} table to scale", def.id, zone),
            },
            Mutation::ScaleFalloffRange { zone, factor } => match def.damage.table_mut(*zone) {
                Some(table) => table.scale_distances(*factor),
                None => tracing::trace!("{} has no {:?} table to scale", def.id, zone),
            },
            Mutation::NudgeMount { mount, offset } => match def.mount_mut(mount) {
                Some(slot) => slot.offset += *offset,
                None => tracing::debug!("{} has no mount '{}' to nudge", def.id, mount),
            },
            Mutation::When {
                condition,
                then,
                otherwise,
            } => {
                let branch = if condition.holds(def) { then } else { otherwise };
                for mutation in branch {
                    mutation.apply(def);
                }
            }
            Mutation::Custom(custom) => (custom.apply)(def),
        }
    }

    /// Load-time check of authored values
    pub fn validate(&self) -> Result<(), MutationError> {
        match self {
            Mutation::Set { value, .. } if !value.is_finite() => {
                Err(MutationError::NonFinite(*value))
            }
            Mutation::Add { delta, .. } if !delta.is_finite() => {
                Err(MutationError::NonFinite(*delta))
            }
            Mutation::Scale { factor, .. }
            | Mutation::ScaleFalloffDamage { factor, .. }
            | Mutation::ScaleFalloffRange { factor, .. }
                if !(factor.is_finite() && *factor >= 0.0) =>
            {
                Err(MutationError::BadFactor(*factor))
            }
            Mutation::OverrideFalloff { zone, table } => table
                .validate()
                .map_err(|reason| MutationError::Table { zone: *zone, reason }),
            Mutation::When {
                then, otherwise, ..
            } => then.iter().chain(otherwise).try_for_each(Mutation::validate),
            _ => Ok(()),
        }
    }
}

/// Why an authored mutation was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MutationError {
    #[error("value {0} is not finite")]
    NonFinite(f32),

    #[error("scale factor {0} must be finite and non-negative")]
    BadFactor(f32),

    #[error("{zone:?} falloff override: {reason}")]
    Table {
        zone: FalloffZone,
        reason: FalloffTableError,
    },
}
