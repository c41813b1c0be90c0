//! Composition engine integration tests
//!
//! Exercises the equip flow end to end: registries, equip sets, the
//! shared cache and the repair path.

use std::sync::Arc;

use armory::attachments::{catalog, AttachmentRegistry, SlotType};
use armory::ballistics::{zone_damage, HitZone};
use armory::core::types::attachment_ids;
use armory::loadout::{compose, compose_equip_set, compose_repaired, CompositionCache, EquipSet};
use armory::weapons::{AmmoType, WeaponFlag, WeaponRegistry};
use armory::{AttachmentId, CompositionError};

fn registries() -> (WeaponRegistry, AttachmentRegistry) {
    (WeaponRegistry::builtin(), AttachmentRegistry::builtin())
}

/// Conversion first: subsonic loads see the conversion and cycle at 300 RPM
#[test]
fn test_conversion_then_subsonic_fires_at_300_rpm() {
    let (weapons, attachments) = registries();
    let set = EquipSet::new("rifle", &["suppressor", "trigger_conversion", "subsonic_ammo"]);
    let derived = compose_equip_set(&set, &weapons, &attachments).unwrap();

    assert!(derived.firing.automatic);
    assert!((derived.firing.fire_interval - 0.2).abs() < 1e-6);
    assert!((derived.firing.rounds_per_minute() - 300.0).abs() < 0.01);
    assert!(derived.has_flag(WeaponFlag::FullAutoConversion));
    assert!(derived.has_flag(WeaponFlag::Subsonic));
}

/// Subsonic first: nothing to branch on yet, the conversion sets 600 RPM
#[test]
fn test_subsonic_then_conversion_fires_at_600_rpm() {
    let (weapons, attachments) = registries();
    let set = EquipSet::new("rifle", &["suppressor", "subsonic_ammo", "trigger_conversion"]);
    let derived = compose_equip_set(&set, &weapons, &attachments).unwrap();

    assert!((derived.firing.fire_interval - 0.1).abs() < 1e-6);
    assert!((derived.firing.rounds_per_minute() - 600.0).abs() < 0.01);
}

#[test]
fn test_subsonic_alone_is_unmet_dependency() {
    let (weapons, attachments) = registries();
    let err = EquipSet::new("rifle", &["subsonic_ammo"])
        .compose(&weapons, &attachments)
        .unwrap_err();
    assert_eq!(
        err,
        CompositionError::UnmetDependency {
            attachment: AttachmentId::from("subsonic_ammo"),
            missing: AttachmentId::from("suppressor"),
        }
    );
}

#[test]
fn test_canonical_entry_untouched_after_compose() {
    let (weapons, attachments) = registries();
    let before = weapons.get("carbine").unwrap().clone();

    let set = EquipSet::new(
        "carbine",
        &["suppressor", "subsonic_ammo", "drum_mag", "angled_grip", "scope_4x"],
    );
    let derived = set.compose(&weapons, &attachments).unwrap();

    assert_eq!(weapons.get("carbine").unwrap(), &before);
    assert_ne!(derived.definition(), &before);
    assert_eq!(derived.firing.ammo_type, AmmoType::Subsonic);
}

/// Two attachments in one slot: both mutations ran, the later one is
/// displayed. Kept for compatibility with existing loadouts.
#[test]
fn test_slot_override_keeps_earlier_side_effects() {
    let (weapons, attachments) = registries();
    let rifle = weapons.get("rifle").unwrap();
    let derived = compose(
        rifle,
        &attachment_ids(&["extended_mag", "drum_mag"]),
        &attachments,
    )
    .unwrap();

    // 20 * 1.5 = 30, then +15 on a semi-automatic
    assert_eq!(derived.firing.magazine_size, 45);
    assert_eq!(
        derived.equipped(SlotType::Magazine),
        Some(&AttachmentId::from("drum_mag"))
    );
    assert!(!derived.is_equipped(&AttachmentId::from("extended_mag")));

    let expected_reload = rifle.firing.reload_time * 1.1 * 1.4;
    assert!((derived.firing.reload_time - expected_reload).abs() < 1e-5);
}

#[test]
fn test_mount_nudge_moves_only_derived_slot() {
    let (weapons, attachments) = registries();
    let rifle = weapons.get("rifle").unwrap();
    let derived = compose(rifle, &attachment_ids(&["scope_4x"]), &attachments).unwrap();

    let base_mount = rifle.slot(SlotType::Optic).unwrap().offset;
    let derived_mount = derived.slot(SlotType::Optic).unwrap().offset;
    assert!((derived_mount.y - base_mount.y - 0.015).abs() < 1e-6);
}

#[test]
fn test_repair_reports_dropped_in_order() {
    let (weapons, attachments) = registries();
    let rifle = weapons.get("rifle").unwrap();
    let ids = attachment_ids(&["red_dot", "laser_sight", "scope_4x", "subsonic_ammo"]);

    let (derived, dropped) = compose_repaired(rifle, &ids, &attachments).unwrap();
    assert_eq!(dropped, attachment_ids(&["laser_sight", "subsonic_ammo"]));
    assert_eq!(
        derived.equipped(SlotType::Optic),
        Some(&AttachmentId::from("scope_4x"))
    );
}

#[test]
fn test_repair_cannot_fix_unknown_weapon() {
    let (weapons, attachments) = registries();
    let set = EquipSet::new("railgun", &["red_dot"]);
    assert_eq!(
        compose_equip_set(&set, &weapons, &attachments).unwrap_err(),
        CompositionError::UnknownWeapon("railgun".into())
    );
}

#[test]
fn test_cache_serves_identical_sequences() {
    let (weapons, attachments) = registries();
    let cache = CompositionCache::new();

    let set = EquipSet::new("pistol", &["red_dot", "suppressor"]);
    let a = cache.get_or_compose(&set, &weapons, &attachments).unwrap();
    let b = cache
        .get_or_compose(&set.clone(), &weapons, &attachments)
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let reordered = EquipSet::new("pistol", &["suppressor", "red_dot"]);
    let c = cache.get_or_compose(&reordered, &weapons, &attachments).unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_custom_registry_attachment_composes() {
    let weapons = WeaponRegistry::builtin();
    let mut attachments = AttachmentRegistry::new();
    attachments.insert(catalog::suppressor()).unwrap();
    attachments.insert(catalog::subsonic_ammo()).unwrap();

    let derived = EquipSet::new("pistol", &["subsonic_ammo", "suppressor"])
        .compose(&weapons, &attachments)
        .unwrap();
    assert_eq!(derived.equip_sequence().len(), 2);

    let err = EquipSet::new("pistol", &["red_dot"])
        .compose(&weapons, &attachments)
        .unwrap_err();
    assert_eq!(err, CompositionError::UnknownAttachment("red_dot".into()));
}

/// Without its own head table a pistol's head hits track body in any order
#[test]
fn test_head_follows_body_without_head_table_in_any_order() {
    let (weapons, attachments) = registries();
    let pistol = weapons.get("pistol").unwrap();
    assert!(pistol.damage.head.is_none());

    let orders = [
        ["suppressor", "subsonic_ammo"],
        ["subsonic_ammo", "suppressor"],
    ];
    let derived: Vec<_> = orders
        .iter()
        .map(|order| {
            EquipSet::new("pistol", order)
                .compose(&weapons, &attachments)
                .unwrap()
        })
        .collect();

    for distance in [0.0, 5.0, 9.5, 20.0, 60.0] {
        for def in &derived {
            assert_eq!(
                zone_damage(def, distance, HitZone::Head),
                zone_damage(def, distance, HitZone::Body),
                "head vs body at {}",
                distance
            );
        }
        assert_eq!(
            zone_damage(&derived[0], distance, HitZone::Head),
            zone_damage(&derived[1], distance, HitZone::Head),
            "order changed head damage at {}",
            distance
        );
    }

    // Scaled once by subsonic loads, not twice
    let head = zone_damage(&derived[0], 5.0, HitZone::Head);
    assert!((head - 40.0 * 0.9).abs() < 1e-4);
    // Suppressor pulled the first bucket in to 9.0
    let head = zone_damage(&derived[1], 9.5, HitZone::Head);
    assert!((head - 32.0 * 0.9).abs() < 1e-4);
}
