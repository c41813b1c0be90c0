//! Armory - equip-time weapon composition and fire-time ballistics

pub mod attachments;
pub mod ballistics;
pub mod core;
pub mod loadout;
pub mod weapons;

pub use crate::attachments::{AttachmentDefinition, AttachmentRegistry, Mutation, SlotType};
pub use crate::ballistics::{resolve_shot, trace, HitZone, ShotResolution, Stance, TraceResult};
pub use crate::core::{ArmoryConfig, ArmoryError, AttachmentId, CompositionError, DataError, WeaponId};
pub use crate::loadout::{compose, CompositionCache, DerivedWeaponDefinition, EquipSet};
pub use crate::weapons::{resolve_damage, DamageFalloffTable, WeaponDefinition, WeaponRegistry};
