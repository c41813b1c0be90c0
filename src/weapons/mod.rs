//! Canonical weapon data: definitions, falloff tables and the registry

pub mod catalog;
pub mod definition;
pub mod falloff;
pub mod registry;

pub use definition::{
    AmmoType, AttachmentSlot, BallisticsProfile, DamageModel, FiringModel, HandlingModel,
    PresentationHooks, ThrowableModel, WeaponCategory, WeaponDefinition, WeaponFlag,
};
pub use falloff::{
    resolve_damage, DamageFalloffTable, FalloffBreakpoint, FalloffTableError, FalloffZone,
};
pub use registry::{install_weapons, weapons, WeaponRegistry};
