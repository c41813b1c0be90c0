//! Equip-time composition of weapons and attachments

pub mod cache;
pub mod compose;
pub mod derived;
pub mod equip;

pub use cache::CompositionCache;
pub use compose::{compose, compose_equip_set, compose_repaired};
pub use derived::DerivedWeaponDefinition;
pub use equip::EquipSet;
