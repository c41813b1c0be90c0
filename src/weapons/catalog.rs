//! Built-in weapon catalog
//!
//! Canonical stat blocks shipped with the crate. Additional weapons can be
//! loaded from TOML through the registry.

use glam::Vec3;
use std::collections::BTreeSet;

use crate::attachments::SlotType;
use crate::core::types::WeaponId;
use crate::weapons::definition::{
    AmmoType, AttachmentSlot, BallisticsProfile, DamageModel, FiringModel, HandlingModel,
    PresentationHooks, ThrowableModel, WeaponCategory, WeaponDefinition,
};
use crate::weapons::falloff::DamageFalloffTable;

const INF: f32 = f32::INFINITY;

fn table(pairs: &[(f32, f32)]) -> DamageFalloffTable {
    DamageFalloffTable::authored(pairs)
}

fn presentation(model: &str, animation_set: &str, muzzle_z: f32) -> PresentationHooks {
    PresentationHooks {
        model: format!("weapons/{}", model),
        animation_set: animation_set.to_string(),
        view_offset: Vec3::new(0.12, -0.1, 0.25),
        muzzle_offset: Vec3::new(0.0, 0.01, muzzle_z),
    }
}

/// Semi-automatic service rifle
pub fn rifle() -> WeaponDefinition {
    WeaponDefinition {
        id: WeaponId::from("rifle"),
        name: "Service Rifle".to_string(),
        category: WeaponCategory::Primary,
        firing: FiringModel {
            automatic: false,
            fire_interval: 0.15,
            projectiles_per_shot: 1,
            ammo_per_shot: 1,
            magazine_size: 20,
            reserve_ammo: 80,
            reload_time: 2.2,
            empty_reload_time: Some(2.8),
            ammo_type: AmmoType::Standard,
        },
        ballistics: BallisticsProfile {
            muzzle_velocity: 850.0,
            drag_per_segment: 2.0,
            gravity: 0.0,
            segment_length: 5.0,
            destabilize_distance: 200.0,
            destabilize_amount: 0.0004,
            max_range: 500.0,
        },
        damage: DamageModel {
            base_damage: 110.0,
            body: table(&[(35.0, 110.0), (75.0, 90.0), (150.0, 70.0), (INF, 55.0)]),
            head: Some(table(&[
                (35.0, 250.0),
                (75.0, 200.0),
                (150.0, 150.0),
                (INF, 110.0),
            ])),
            limb_multiplier: 0.75,
        },
        handling: HandlingModel {
            hip_spread: 0.05,
            ads_spread: 0.005,
            sprint_spread: 0.12,
            sprint_speed_multiplier: 0.85,
            recoil_pitch: 1.4,
            recoil_yaw: 0.35,
            recoil_recovery: 6.0,
        },
        slots: vec![
            AttachmentSlot::new(SlotType::Optic, "rail_top", Vec3::new(0.0, 0.06, 0.1)),
            AttachmentSlot::new(SlotType::Muzzle, "muzzle", Vec3::new(0.0, 0.0, 0.55)),
            AttachmentSlot::new(SlotType::Barrel, "barrel", Vec3::new(0.0, 0.0, 0.35)),
            AttachmentSlot::new(SlotType::Underbarrel, "rail_bottom", Vec3::new(0.0, -0.04, 0.25)),
            AttachmentSlot::new(SlotType::Stock, "stock", Vec3::new(0.0, 0.0, -0.3)),
            AttachmentSlot::new(SlotType::Magazine, "magwell", Vec3::new(0.0, -0.08, 0.05)),
            AttachmentSlot::new(SlotType::Ammunition, "chamber", Vec3::ZERO),
            AttachmentSlot::new(SlotType::Trigger, "trigger_group", Vec3::new(0.0, -0.03, 0.0)),
            AttachmentSlot::new(SlotType::Laser, "rail_side", Vec3::new(0.03, 0.0, 0.3)),
        ],
        presentation: presentation("rifle", "rifle", 0.6),
        flags: BTreeSet::new(),
        throwable: None,
    }
}

/// Automatic carbine
pub fn carbine() -> WeaponDefinition {
    WeaponDefinition {
        id: WeaponId::from("carbine"),
        name: "Carbine".to_string(),
        category: WeaponCategory::Primary,
        firing: FiringModel {
            automatic: true,
            fire_interval: FiringModel::interval_for_rpm(750.0),
            projectiles_per_shot: 1,
            ammo_per_shot: 1,
            magazine_size: 30,
            reserve_ammo: 120,
            reload_time: 2.0,
            empty_reload_time: Some(2.6),
            ammo_type: AmmoType::Standard,
        },
        ballistics: BallisticsProfile {
            muzzle_velocity: 720.0,
            drag_per_segment: 3.0,
            gravity: 0.0,
            segment_length: 5.0,
            destabilize_distance: 120.0,
            destabilize_amount: 0.0008,
            max_range: 300.0,
        },
        damage: DamageModel {
            base_damage: 34.0,
            body: table(&[(20.0, 34.0), (50.0, 28.0), (100.0, 22.0), (INF, 18.0)]),
            head: Some(table(&[(20.0, 68.0), (50.0, 56.0), (100.0, 44.0), (INF, 36.0)])),
            limb_multiplier: 0.8,
        },
        handling: HandlingModel {
            hip_spread: 0.07,
            ads_spread: 0.012,
            sprint_spread: 0.14,
            sprint_speed_multiplier: 0.9,
            recoil_pitch: 0.8,
            recoil_yaw: 0.3,
            recoil_recovery: 8.0,
        },
        slots: vec![
            AttachmentSlot::new(SlotType::Optic, "rail_top", Vec3::new(0.0, 0.05, 0.08)),
            AttachmentSlot::new(SlotType::Muzzle, "muzzle", Vec3::new(0.0, 0.0, 0.42)),
            AttachmentSlot::new(SlotType::Underbarrel, "rail_bottom", Vec3::new(0.0, -0.04, 0.2)),
            AttachmentSlot::new(SlotType::Grip, "pistol_grip", Vec3::new(0.0, -0.07, -0.02)),
            AttachmentSlot::new(SlotType::Stock, "stock", Vec3::new(0.0, 0.0, -0.25)),
            AttachmentSlot::new(SlotType::Magazine, "magwell", Vec3::new(0.0, -0.08, 0.04)),
            AttachmentSlot::new(SlotType::Ammunition, "chamber", Vec3::ZERO),
            AttachmentSlot::new(SlotType::Laser, "rail_side", Vec3::new(0.03, 0.0, 0.24)),
        ],
        presentation: presentation("carbine", "rifle", 0.45),
        flags: BTreeSet::new(),
        throwable: None,
    }
}

/// Semi-automatic sidearm
pub fn pistol() -> WeaponDefinition {
    WeaponDefinition {
        id: WeaponId::from("pistol"),
        name: "Sidearm".to_string(),
        category: WeaponCategory::Secondary,
        firing: FiringModel {
            automatic: false,
            fire_interval: 0.12,
            projectiles_per_shot: 1,
            ammo_per_shot: 1,
            magazine_size: 12,
            reserve_ammo: 48,
            reload_time: 1.4,
            empty_reload_time: Some(1.8),
            ammo_type: AmmoType::Standard,
        },
        ballistics: BallisticsProfile {
            muzzle_velocity: 360.0,
            drag_per_segment: 4.0,
            gravity: 0.0,
            segment_length: 2.5,
            destabilize_distance: 40.0,
            destabilize_amount: 0.002,
            max_range: 120.0,
        },
        damage: DamageModel {
            base_damage: 40.0,
            body: table(&[(10.0, 40.0), (25.0, 32.0), (INF, 24.0)]),
            head: None,
            limb_multiplier: 0.8,
        },
        handling: HandlingModel {
            hip_spread: 0.04,
            ads_spread: 0.015,
            sprint_spread: 0.09,
            sprint_speed_multiplier: 1.0,
            recoil_pitch: 0.9,
            recoil_yaw: 0.25,
            recoil_recovery: 10.0,
        },
        slots: vec![
            AttachmentSlot::new(SlotType::Optic, "slide", Vec3::new(0.0, 0.03, 0.02)),
            AttachmentSlot::new(SlotType::Muzzle, "muzzle", Vec3::new(0.0, 0.0, 0.16)),
            AttachmentSlot::new(SlotType::Magazine, "magwell", Vec3::new(0.0, -0.07, 0.0)),
            AttachmentSlot::new(SlotType::Ammunition, "chamber", Vec3::ZERO),
            AttachmentSlot::new(SlotType::Laser, "dust_cover", Vec3::new(0.0, -0.03, 0.1)),
        ],
        presentation: presentation("pistol", "pistol", 0.18),
        flags: BTreeSet::new(),
        throwable: None,
    }
}

/// Pump shotgun firing a pellet spread
pub fn shotgun() -> WeaponDefinition {
    WeaponDefinition {
        id: WeaponId::from("shotgun"),
        name: "Pump Shotgun".to_string(),
        category: WeaponCategory::Primary,
        firing: FiringModel {
            automatic: false,
            fire_interval: 0.9,
            projectiles_per_shot: 8,
            ammo_per_shot: 1,
            magazine_size: 6,
            reserve_ammo: 30,
            reload_time: 4.0,
            empty_reload_time: Some(5.5),
            ammo_type: AmmoType::Buckshot,
        },
        ballistics: BallisticsProfile {
            muzzle_velocity: 400.0,
            drag_per_segment: 15.0,
            gravity: 0.0,
            segment_length: 2.0,
            destabilize_distance: 8.0,
            destabilize_amount: 0.01,
            max_range: 60.0,
        },
        damage: DamageModel {
            base_damage: 18.0,
            body: table(&[(8.0, 18.0), (15.0, 12.0), (25.0, 6.0), (INF, 2.0)]),
            head: None,
            limb_multiplier: 1.0,
        },
        handling: HandlingModel {
            hip_spread: 0.09,
            ads_spread: 0.07,
            sprint_spread: 0.15,
            sprint_speed_multiplier: 0.9,
            recoil_pitch: 3.0,
            recoil_yaw: 0.8,
            recoil_recovery: 4.0,
        },
        slots: vec![
            AttachmentSlot::new(SlotType::Muzzle, "muzzle", Vec3::new(0.0, 0.0, 0.6)),
            AttachmentSlot::new(SlotType::Underbarrel, "forend", Vec3::new(0.0, -0.05, 0.3)),
            AttachmentSlot::new(SlotType::Stock, "stock", Vec3::new(0.0, 0.0, -0.3)),
            AttachmentSlot::new(SlotType::Ammunition, "chamber", Vec3::ZERO),
        ],
        presentation: presentation("shotgun", "shotgun", 0.65),
        flags: BTreeSet::new(),
        throwable: None,
    }
}

/// Bolt-action rifle with a dropping projectile
pub fn sniper() -> WeaponDefinition {
    WeaponDefinition {
        id: WeaponId::from("sniper"),
        name: "Bolt-Action Rifle".to_string(),
        category: WeaponCategory::Primary,
        firing: FiringModel {
            automatic: false,
            fire_interval: 1.3,
            projectiles_per_shot: 1,
            ammo_per_shot: 1,
            magazine_size: 5,
            reserve_ammo: 25,
            reload_time: 3.0,
            empty_reload_time: Some(3.6),
            ammo_type: AmmoType::Standard,
        },
        ballistics: BallisticsProfile {
            muzzle_velocity: 900.0,
            drag_per_segment: 1.0,
            gravity: 9.81,
            segment_length: 10.0,
            destabilize_distance: 400.0,
            destabilize_amount: 0.0002,
            max_range: 1200.0,
        },
        damage: DamageModel {
            base_damage: 150.0,
            body: table(&[(100.0, 150.0), (300.0, 130.0), (INF, 110.0)]),
            head: Some(DamageFalloffTable::flat(300.0)),
            limb_multiplier: 0.6,
        },
        handling: HandlingModel {
            hip_spread: 0.12,
            ads_spread: 0.001,
            sprint_spread: 0.2,
            sprint_speed_multiplier: 0.8,
            recoil_pitch: 4.5,
            recoil_yaw: 0.6,
            recoil_recovery: 3.0,
        },
        slots: vec![
            AttachmentSlot::new(SlotType::Optic, "rail_top", Vec3::new(0.0, 0.07, 0.05)),
            AttachmentSlot::new(SlotType::Muzzle, "muzzle", Vec3::new(0.0, 0.0, 0.75)),
            AttachmentSlot::new(SlotType::Barrel, "barrel", Vec3::new(0.0, 0.0, 0.45)),
            AttachmentSlot::new(SlotType::Underbarrel, "rail_bottom", Vec3::new(0.0, -0.05, 0.3)),
            AttachmentSlot::new(SlotType::Stock, "stock", Vec3::new(0.0, 0.0, -0.35)),
            AttachmentSlot::new(SlotType::Ammunition, "chamber", Vec3::ZERO),
        ],
        presentation: presentation("sniper", "bolt_action", 0.8),
        flags: BTreeSet::new(),
        throwable: None,
    }
}

/// Combat knife
pub fn knife() -> WeaponDefinition {
    let mut damage = DamageModel::flat(55.0, 0.9);
    damage.head = Some(DamageFalloffTable::flat(80.0));

    WeaponDefinition {
        id: WeaponId::from("knife"),
        name: "Combat Knife".to_string(),
        category: WeaponCategory::Melee,
        firing: FiringModel {
            automatic: false,
            fire_interval: 0.6,
            projectiles_per_shot: 1,
            ammo_per_shot: 0,
            magazine_size: 0,
            reserve_ammo: 0,
            reload_time: 0.0,
            empty_reload_time: None,
            ammo_type: AmmoType::None,
        },
        ballistics: BallisticsProfile::melee(2.5),
        damage,
        handling: HandlingModel {
            hip_spread: 0.0,
            ads_spread: 0.0,
            sprint_spread: 0.0,
            sprint_speed_multiplier: 1.1,
            recoil_pitch: 0.0,
            recoil_yaw: 0.0,
            recoil_recovery: 0.0,
        },
        slots: Vec::new(),
        presentation: PresentationHooks {
            model: "weapons/knife".to_string(),
            animation_set: "melee".to_string(),
            ..Default::default()
        },
        flags: BTreeSet::new(),
        throwable: None,
    }
}

/// Fragmentation grenade
///
/// The ballistics profile describes the lobbed throw; the falloff tables
/// are keyed by distance from the detonation point.
pub fn frag_grenade() -> WeaponDefinition {
    WeaponDefinition {
        id: WeaponId::from("frag_grenade"),
        name: "Frag Grenade".to_string(),
        category: WeaponCategory::Throwable,
        firing: FiringModel {
            automatic: false,
            fire_interval: 1.0,
            projectiles_per_shot: 1,
            ammo_per_shot: 1,
            magazine_size: 1,
            reserve_ammo: 2,
            reload_time: 0.8,
            empty_reload_time: None,
            ammo_type: AmmoType::None,
        },
        ballistics: BallisticsProfile {
            muzzle_velocity: 18.0,
            drag_per_segment: 0.1,
            gravity: 9.81,
            segment_length: 0.5,
            destabilize_distance: INF,
            destabilize_amount: 0.0,
            max_range: 40.0,
        },
        damage: DamageModel {
            base_damage: 150.0,
            body: table(&[(2.0, 150.0), (5.0, 90.0), (8.0, 40.0), (INF, 0.0)]),
            head: None,
            limb_multiplier: 1.0,
        },
        handling: HandlingModel {
            hip_spread: 0.02,
            ads_spread: 0.02,
            sprint_spread: 0.05,
            sprint_speed_multiplier: 1.0,
            recoil_pitch: 0.0,
            recoil_yaw: 0.0,
            recoil_recovery: 0.0,
        },
        slots: Vec::new(),
        presentation: PresentationHooks {
            model: "weapons/frag_grenade".to_string(),
            animation_set: "throwable".to_string(),
            ..Default::default()
        },
        flags: BTreeSet::new(),
        throwable: Some(ThrowableModel {
            fuse_time: 3.5,
            min_throw_velocity: 8.0,
            max_throw_velocity: 18.0,
            charge_time: 1.0,
            blast_radius: 8.0,
        }),
    }
}

/// Every built-in weapon
pub fn all() -> Vec<WeaponDefinition> {
    vec![
        rifle(),
        carbine(),
        pistol(),
        shotgun(),
        sniper(),
        knife(),
        frag_grenade(),
    ]
}
