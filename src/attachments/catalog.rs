//! Built-in attachment catalog

use glam::Vec3;

use crate::attachments::definition::{AttachmentDefinition, SlotType};
use crate::attachments::mutation::{Condition, CustomMutation, Mutation, Stat};
use crate::weapons::definition::{AmmoType, WeaponDefinition, WeaponFlag};
use crate::weapons::falloff::{DamageFalloffTable, FalloffZone};

/// Fire interval of a converted trigger group (600 RPM)
pub const CONVERSION_FIRE_INTERVAL: f32 = 0.1;
/// Fire interval subsonic loads cycle at on a converted weapon (300 RPM)
pub const SUBSONIC_AUTO_FIRE_INTERVAL: f32 = 0.2;

pub fn suppressor() -> AttachmentDefinition {
    AttachmentDefinition::new("suppressor", "Suppressor", SlotType::Muzzle)
        .mutate(Mutation::flag(WeaponFlag::Suppressed))
        .mutate(Mutation::scale(Stat::MuzzleVelocity, 0.95))
        .mutate(Mutation::scale(Stat::RecoilPitch, 0.9))
        .mutate(Mutation::ScaleFalloffRange {
            zone: FalloffZone::Body,
            factor: 0.9,
        })
}

pub fn compensator() -> AttachmentDefinition {
    AttachmentDefinition::new("compensator", "Compensator", SlotType::Muzzle)
        .mutate(Mutation::scale(Stat::RecoilPitch, 0.75))
        .mutate(Mutation::scale(Stat::RecoilYaw, 0.8))
        .mutate(Mutation::scale(Stat::HipSpread, 1.1))
}

/// Converts the trigger group to fully automatic fire
pub fn trigger_conversion() -> AttachmentDefinition {
    AttachmentDefinition::new("trigger_conversion", "Auto Sear", SlotType::Trigger)
        .mutate(Mutation::SetAutomatic { automatic: true })
        .mutate(Mutation::flag(WeaponFlag::FullAutoConversion))
        .mutate(Mutation::set(Stat::FireInterval, CONVERSION_FIRE_INTERVAL))
        .mutate(Mutation::scale(Stat::HipSpread, 1.2))
}

/// Subsonic loads; on a converted weapon they cycle slower
pub fn subsonic_ammo() -> AttachmentDefinition {
    AttachmentDefinition::new("subsonic_ammo", "Subsonic Rounds", SlotType::Ammunition)
        .requires("suppressor")
        .mutate(Mutation::SetAmmoType {
            ammo_type: AmmoType::Subsonic,
        })
        .mutate(Mutation::flag(WeaponFlag::Subsonic))
        .mutate(Mutation::scale(Stat::MuzzleVelocity, 0.7))
        .mutate(Mutation::ScaleFalloffDamage {
            zone: FalloffZone::Body,
            factor: 0.9,
        })
        .mutate(Mutation::ScaleFalloffDamage {
            zone: FalloffZone::Head,
            factor: 0.9,
        })
        .mutate(Mutation::when(
            Condition::HasFlag {
                flag: WeaponFlag::FullAutoConversion,
            },
            vec![Mutation::set(Stat::FireInterval, SUBSONIC_AUTO_FIRE_INTERVAL)],
        ))
}

pub fn hollow_point() -> AttachmentDefinition {
    AttachmentDefinition::new("hollow_point", "Hollow Point Rounds", SlotType::Ammunition)
        .mutate(Mutation::SetAmmoType {
            ammo_type: AmmoType::HollowPoint,
        })
        .mutate(Mutation::ScaleFalloffDamage {
            zone: FalloffZone::Body,
            factor: 1.15,
        })
        .mutate(Mutation::ScaleFalloffRange {
            zone: FalloffZone::Body,
            factor: 0.85,
        })
        .mutate(Mutation::scale(Stat::LimbMultiplier, 0.8))
}

pub fn extended_mag() -> AttachmentDefinition {
    AttachmentDefinition::new("extended_mag", "Extended Magazine", SlotType::Magazine)
        .mutate(Mutation::flag(WeaponFlag::ExtendedMagazine))
        .mutate(Mutation::scale(Stat::MagazineSize, 1.5))
        .mutate(Mutation::scale(Stat::ReloadTime, 1.1))
}

/// Drum magazine; holds more rounds on automatic weapons
pub fn drum_mag() -> AttachmentDefinition {
    AttachmentDefinition::new("drum_mag", "Drum Magazine", SlotType::Magazine)
        .mutate(Mutation::flag(WeaponFlag::ExtendedMagazine))
        .mutate(Mutation::When {
            condition: Condition::Automatic,
            then: vec![Mutation::add(Stat::MagazineSize, 30.0)],
            otherwise: vec![Mutation::add(Stat::MagazineSize, 15.0)],
        })
        .mutate(Mutation::scale(Stat::ReloadTime, 1.4))
        .mutate(Mutation::scale(Stat::SprintSpeedMultiplier, 0.95))
}

pub fn red_dot() -> AttachmentDefinition {
    AttachmentDefinition::new("red_dot", "Red Dot Sight", SlotType::Optic)
        .mutate(Mutation::scale(Stat::AdsSpread, 0.8))
}

pub fn scope_4x() -> AttachmentDefinition {
    AttachmentDefinition::new("scope_4x", "4x Scope", SlotType::Optic)
        .mutate(Mutation::flag(WeaponFlag::MagnifiedOptic))
        .mutate(Mutation::scale(Stat::AdsSpread, 0.5))
        .mutate(Mutation::scale(Stat::SprintSpread, 1.1))
        // Taller mount raises the rail
        .mutate(Mutation::NudgeMount {
            mount: "rail_top".to_string(),
            offset: Vec3::new(0.0, 0.015, 0.0),
        })
}

/// Laser module; the scope's eye relief blocks the side rail
pub fn laser_sight() -> AttachmentDefinition {
    AttachmentDefinition::new("laser_sight", "Laser Sight", SlotType::Laser)
        .excludes("scope_4x")
        .mutate(Mutation::scale(Stat::HipSpread, 0.8))
}

fn shift_yaw_into_pitch(def: &mut WeaponDefinition) {
    let moved = def.handling.recoil_yaw * 0.3;
    def.handling.recoil_yaw -= moved;
    def.handling.recoil_pitch += moved * 0.5;
}

pub fn angled_grip() -> AttachmentDefinition {
    AttachmentDefinition::new("angled_grip", "Angled Grip", SlotType::Grip).mutate(
        Mutation::Custom(CustomMutation {
            name: "shift_yaw_into_pitch",
            apply: shift_yaw_into_pitch,
        }),
    )
}

pub fn vertical_grip() -> AttachmentDefinition {
    AttachmentDefinition::new("vertical_grip", "Vertical Grip", SlotType::Underbarrel)
        .mutate(Mutation::scale(Stat::RecoilPitch, 0.8))
        .mutate(Mutation::scale(Stat::SprintSpeedMultiplier, 0.97))
}

pub fn bipod() -> AttachmentDefinition {
    AttachmentDefinition::new("bipod", "Bipod", SlotType::Underbarrel)
        .mutate(Mutation::flag(WeaponFlag::Bipod))
        .mutate(Mutation::scale(Stat::AdsSpread, 0.6))
        .mutate(Mutation::scale(Stat::RecoilPitch, 0.5))
        .mutate(Mutation::scale(Stat::SprintSpeedMultiplier, 0.9))
}

pub fn long_barrel() -> AttachmentDefinition {
    AttachmentDefinition::new("long_barrel", "Long Barrel", SlotType::Barrel)
        .mutate(Mutation::scale(Stat::MuzzleVelocity, 1.1))
        .mutate(Mutation::scale(Stat::DestabilizeDistance, 1.25))
        .mutate(Mutation::ScaleFalloffRange {
            zone: FalloffZone::Body,
            factor: 1.2,
        })
        .mutate(Mutation::ScaleFalloffRange {
            zone: FalloffZone::Head,
            factor: 1.2,
        })
        .mutate(Mutation::scale(Stat::SprintSpeedMultiplier, 0.95))
}

pub fn short_barrel() -> AttachmentDefinition {
    AttachmentDefinition::new("short_barrel", "Short Barrel", SlotType::Barrel)
        .mutate(Mutation::scale(Stat::MuzzleVelocity, 0.9))
        .mutate(Mutation::ScaleFalloffRange {
            zone: FalloffZone::Body,
            factor: 0.85,
        })
        .mutate(Mutation::scale(Stat::HipSpread, 0.9))
}

/// Single-projectile shotgun load with its own falloff
pub fn slug_rounds() -> AttachmentDefinition {
    AttachmentDefinition::new("slug_rounds", "Slug Rounds", SlotType::Ammunition)
        .mutate(Mutation::SetAmmoType {
            ammo_type: AmmoType::Slug,
        })
        .mutate(Mutation::set(Stat::ProjectilesPerShot, 1.0))
        .mutate(Mutation::set(Stat::MaxRange, 120.0))
        .mutate(Mutation::OverrideFalloff {
            zone: FalloffZone::Body,
            table: DamageFalloffTable::authored(&[(20.0, 90.0), (40.0, 70.0), (f32::INFINITY, 50.0)]),
        })
}

pub fn tactical_stock() -> AttachmentDefinition {
    AttachmentDefinition::new("tactical_stock", "Tactical Stock", SlotType::Stock)
        .mutate(Mutation::scale(Stat::RecoilRecovery, 1.25))
        .mutate(Mutation::scale(Stat::SprintSpeedMultiplier, 1.05))
}

/// Every built-in attachment
pub fn all() -> Vec<AttachmentDefinition> {
    vec![
        suppressor(),
        compensator(),
        trigger_conversion(),
        subsonic_ammo(),
        hollow_point(),
        extended_mag(),
        drum_mag(),
        red_dot(),
        scope_4x(),
        laser_sight(),
        angled_grip(),
        vertical_grip(),
        bipod(),
        long_barrel(),
        short_barrel(),
        slug_rounds(),
        tactical_stock(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AttachmentId;
    use crate::weapons::catalog as weapons;

    #[test]
    fn test_catalog_attachments_validate() {
        for attachment in all() {
            assert!(
                attachment.validate().is_ok(),
                "{} failed validation",
                attachment.id
            );
        }
    }

    #[test]
    fn test_subsonic_requires_suppressor() {
        assert_eq!(subsonic_ammo().requires, vec![AttachmentId::from("suppressor")]);
    }

    #[test]
    fn test_drum_mag_branches_on_automatic() {
        let mut rifle = weapons::rifle();
        drum_mag().apply(&mut rifle);
        assert_eq!(rifle.firing.magazine_size, 35);

        let mut carbine = weapons::carbine();
        drum_mag().apply(&mut carbine);
        assert_eq!(carbine.firing.magazine_size, 60);
    }

    #[test]
    fn test_angled_grip_moves_yaw_into_pitch() {
        let mut carbine = weapons::carbine();
        let yaw = carbine.handling.recoil_yaw;
        angled_grip().apply(&mut carbine);
        assert!(carbine.handling.recoil_yaw < yaw);
        assert!(carbine.handling.recoil_pitch > weapons::carbine().handling.recoil_pitch);
    }

    #[test]
    fn test_slug_override_keeps_table_valid() {
        let mut shotgun = weapons::shotgun();
        slug_rounds().apply(&mut shotgun);
        assert!(shotgun.validate().is_ok());
        assert_eq!(shotgun.firing.projectiles_per_shot, 1);
        assert_eq!(shotgun.damage.body.resolve(30.0), 70.0);
    }
}
