//! Weapon definition data model
//!
//! A `WeaponDefinition` is the full stat block of a weapon or throwable.
//! Canonical instances live in the registry and are never mutated; derived
//! copies are produced by loadout composition.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::attachments::SlotType;
use crate::core::error::DataError;
use crate::core::types::WeaponId;
use crate::weapons::falloff::{DamageFalloffTable, FalloffZone};

/// Loadout category a weapon occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Primary,
    Secondary,
    Melee,
    Throwable,
}

/// Loaded ammunition variant, shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmmoType {
    #[default]
    Standard,
    Subsonic,
    HollowPoint,
    ArmorPiercing,
    Buckshot,
    Slug,
    /// Melee weapons and throwables
    None,
}

/// Derived state flags set by attachment mutations
///
/// Later mutations in an equip sequence may branch on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponFlag {
    Suppressed,
    FullAutoConversion,
    Subsonic,
    ExtendedMagazine,
    Bipod,
    MagnifiedOptic,
}

/// How the weapon cycles and feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiringModel {
    pub automatic: bool,
    /// Seconds between shots
    pub fire_interval: f32,
    pub projectiles_per_shot: u32,
    pub ammo_per_shot: u32,
    pub magazine_size: u32,
    pub reserve_ammo: u32,
    /// Reload with rounds still in the magazine (seconds)
    pub reload_time: f32,
    /// Reload from an empty magazine; defaults to `reload_time`
    #[serde(default)]
    pub empty_reload_time: Option<f32>,
    #[serde(default)]
    pub ammo_type: AmmoType,
}

impl FiringModel {
    /// Fire interval for a cyclic rate in rounds per minute
    pub fn interval_for_rpm(rpm: f32) -> f32 {
        60.0 / rpm
    }

    pub fn rounds_per_minute(&self) -> f32 {
        if self.fire_interval > 0.0 {
            60.0 / self.fire_interval
        } else {
            0.0
        }
    }

    /// Trigger pulls a full magazine supports
    pub fn shots_per_magazine(&self) -> u32 {
        if self.ammo_per_shot == 0 {
            return self.magazine_size;
        }
        self.magazine_size / self.ammo_per_shot
    }

    /// Reload duration given the rounds left in the magazine
    pub fn reload_duration(&self, rounds_in_magazine: u32) -> f32 {
        if rounds_in_magazine == 0 {
            self.empty_reload_time.unwrap_or(self.reload_time)
        } else {
            self.reload_time
        }
    }
}

/// Stylized projectile flight parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallisticsProfile {
    pub muzzle_velocity: f32,
    /// Velocity lost per full segment
    pub drag_per_segment: f32,
    /// Downward acceleration (world units per second squared)
    pub gravity: f32,
    pub segment_length: f32,
    /// Travel distance at which destabilization starts
    pub destabilize_distance: f32,
    /// Destabilization angle gained per unit of travel past the threshold
    pub destabilize_amount: f32,
    /// Maximum range; also bounds damage evaluation
    pub max_range: f32,
}

impl BallisticsProfile {
    /// Contact-range profile with no drag, drop or destabilization
    pub fn melee(reach: f32) -> Self {
        Self {
            muzzle_velocity: 0.0,
            drag_per_segment: 0.0,
            gravity: 0.0,
            segment_length: reach.max(0.1),
            destabilize_distance: f32::INFINITY,
            destabilize_amount: 0.0,
            max_range: reach,
        }
    }

    /// No drag and no gravity: the path is a straight line
    pub fn is_degenerate(&self) -> bool {
        self.gravity == 0.0 && self.drag_per_segment == 0.0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.max_range.is_finite() && self.max_range > 0.0) {
            return Err(format!("max_range ({}) must be finite and positive", self.max_range));
        }
        if !(self.segment_length > 0.0) {
            return Err(format!("segment_length ({}) must be positive", self.segment_length));
        }
        if self.drag_per_segment < 0.0 || self.gravity < 0.0 || self.destabilize_amount < 0.0 {
            return Err("drag, gravity and destabilize_amount must not be negative".into());
        }
        if self.destabilize_distance.is_nan() || self.destabilize_distance < 0.0 {
            return Err("destabilize_distance must not be negative".into());
        }
        if !self.is_degenerate() && !(self.muzzle_velocity > 0.0) {
            return Err(format!(
                "muzzle_velocity ({}) must be positive for projectile profiles",
                self.muzzle_velocity
            ));
        }
        Ok(())
    }
}

/// Damage per projectile by hit zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageModel {
    /// Nominal damage shown in loadout screens
    pub base_damage: f32,
    pub body: DamageFalloffTable,
    /// Falls back to `body` when absent
    #[serde(default)]
    pub head: Option<DamageFalloffTable>,
    /// Applied to the resolved body damage for limb hits
    pub limb_multiplier: f32,
}

impl DamageModel {
    /// Same damage at every distance for every zone except limbs
    pub fn flat(base_damage: f32, limb_multiplier: f32) -> Self {
        Self {
            base_damage,
            body: DamageFalloffTable::flat(base_damage),
            head: None,
            limb_multiplier,
        }
    }

    /// Table for a zone, falling back to body
    pub fn table(&self, zone: FalloffZone) -> &DamageFalloffTable {
        match zone {
            FalloffZone::Body => &self.body,
            FalloffZone::Head => self.head.as_ref().unwrap_or(&self.body),
        }
    }

    /// The zone's own table; `None` for head when it falls back to body
    pub fn table_mut(&mut self, zone: FalloffZone) -> Option<&mut DamageFalloffTable> {
        match zone {
            FalloffZone::Body => Some(&mut self.body),
            FalloffZone::Head => self.head.as_mut(),
        }
    }
}

/// Spread and recoil source values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlingModel {
    /// Cone half-angles in radians
    pub hip_spread: f32,
    pub ads_spread: f32,
    pub sprint_spread: f32,
    pub sprint_speed_multiplier: f32,
    pub recoil_pitch: f32,
    pub recoil_yaw: f32,
    /// Exponential recovery rate per second
    pub recoil_recovery: f32,
}

/// A mount point an attachment slot type is equipped on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentSlot {
    pub slot: SlotType,
    pub mount: String,
    #[serde(default)]
    pub offset: Vec3,
}

impl AttachmentSlot {
    pub fn new(slot: SlotType, mount: &str, offset: Vec3) -> Self {
        Self {
            slot,
            mount: mount.to_string(),
            offset,
        }
    }
}

/// Rendering/animation identifiers; opaque to composition and ballistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationHooks {
    pub model: String,
    pub animation_set: String,
    pub view_offset: Vec3,
    pub muzzle_offset: Vec3,
}

/// Charge-to-throw parameters for throwables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowableModel {
    pub fuse_time: f32,
    pub min_throw_velocity: f32,
    pub max_throw_velocity: f32,
    /// Seconds of holding to reach max velocity
    pub charge_time: f32,
    pub blast_radius: f32,
}

impl ThrowableModel {
    /// Release velocity after holding the throw for `held` seconds
    pub fn throw_velocity(&self, held: f32) -> f32 {
        let t = if self.charge_time > 0.0 {
            (held / self.charge_time).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.min_throw_velocity + (self.max_throw_velocity - self.min_throw_velocity) * t
    }
}

/// Complete weapon stat block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: WeaponId,
    pub name: String,
    pub category: WeaponCategory,
    pub firing: FiringModel,
    pub ballistics: BallisticsProfile,
    pub damage: DamageModel,
    pub handling: HandlingModel,
    #[serde(default)]
    pub slots: Vec<AttachmentSlot>,
    #[serde(default)]
    pub presentation: PresentationHooks,
    #[serde(default)]
    pub flags: BTreeSet<WeaponFlag>,
    #[serde(default)]
    pub throwable: Option<ThrowableModel>,
}

impl WeaponDefinition {
    pub fn has_flag(&self, flag: WeaponFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Does the weapon offer a mount for this slot type?
    pub fn has_slot(&self, slot: SlotType) -> bool {
        self.slots.iter().any(|s| s.slot == slot)
    }

    pub fn slot(&self, slot: SlotType) -> Option<&AttachmentSlot> {
        self.slots.iter().find(|s| s.slot == slot)
    }

    pub fn mount_mut(&mut self, mount: &str) -> Option<&mut AttachmentSlot> {
        self.slots.iter_mut().find(|s| s.mount == mount)
    }

    /// Load-time validation of tables and the ballistics profile
    pub fn validate(&self) -> Result<(), DataError> {
        let owner = self.id.to_string();
        self.damage
            .body
            .validate()
            .map_err(|reason| DataError::InvalidFalloffTable {
                owner: owner.clone(),
                zone: FalloffZone::Body,
                reason,
            })?;
        if let Some(head) = &self.damage.head {
            head.validate()
                .map_err(|reason| DataError::InvalidFalloffTable {
                    owner: owner.clone(),
                    zone: FalloffZone::Head,
                    reason,
                })?;
        }

        let invalid = |reason: String| DataError::InvalidProfile {
            weapon: self.id.clone(),
            reason,
        };
        self.ballistics.validate().map_err(invalid)?;
        if !(self.firing.fire_interval > 0.0) {
            return Err(invalid(format!(
                "fire_interval ({}) must be positive",
                self.firing.fire_interval
            )));
        }
        if self.damage.limb_multiplier < 0.0 {
            return Err(invalid("limb_multiplier must not be negative".into()));
        }
        if self.category == WeaponCategory::Throwable && self.throwable.is_none() {
            return Err(invalid("throwables need a throwable model".into()));
        }
        Ok(())
    }
}
