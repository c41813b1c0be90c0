//! Data file loading tests
//!
//! Loads the shipped TOML data on top of the built-in catalogs and checks
//! that load-time validation rejects malformed definitions.

use std::path::PathBuf;

use armory::attachments::AttachmentRegistry;
use armory::ballistics::{resolve_shot_with, HitZone, Stance};
use armory::core::{ArmoryConfig, DataError};
use armory::loadout::EquipSet;
use armory::weapons::{FalloffTableError, FalloffZone, WeaponRegistry};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn loaded() -> (WeaponRegistry, AttachmentRegistry) {
    let mut weapons = WeaponRegistry::builtin();
    weapons.load_directory(&data_dir().join("weapons")).unwrap();
    let mut attachments = AttachmentRegistry::builtin();
    attachments
        .load_directory(&data_dir().join("attachments"))
        .unwrap();
    (weapons, attachments)
}

#[test]
fn test_shipped_data_loads() {
    let (weapons, attachments) = loaded();
    assert!(weapons.contains("marksman"));
    assert!(weapons.contains("smg"));
    assert!(attachments.contains("flash_hider"));
    assert!(attachments.contains("ap_rounds"));
    assert!(attachments.validate_references().is_ok());
}

#[test]
fn test_shipped_config_is_valid() {
    let config = ArmoryConfig::load(&data_dir().join("armory.toml")).unwrap();
    assert_eq!(config, ArmoryConfig::default());
}

#[test]
fn test_loaded_weapon_composes_with_builtin_attachments() {
    let (weapons, attachments) = loaded();
    let derived = EquipSet::new("smg", &["suppressor", "subsonic_ammo", "red_dot"])
        .compose(&weapons, &attachments)
        .unwrap();
    assert!(derived.firing.automatic);

    let shot = resolve_shot_with(
        &derived,
        10.0,
        HitZone::Body,
        Stance::Hip,
        &ArmoryConfig::default(),
    );
    // 26 * 0.9 from subsonic loads; suppressor pulls the bucket to 10.8
    assert!((shot.damage_per_projectile - 23.4).abs() < 1e-4);
}

#[test]
fn test_data_conditional_mutation_branches_on_suppressor() {
    let (weapons, attachments) = loaded();
    let marksman = weapons.get("marksman").unwrap();

    let loud = EquipSet::new("marksman", &["ap_rounds"])
        .compose(&weapons, &attachments)
        .unwrap();
    let quiet = EquipSet::new("marksman", &["suppressor", "ap_rounds"])
        .compose(&weapons, &attachments)
        .unwrap();

    let base = marksman.ballistics.muzzle_velocity;
    assert!((loud.ballistics.muzzle_velocity - base * 1.05).abs() < 1e-3);
    assert!((quiet.ballistics.muzzle_velocity - base * 0.95 * 0.9).abs() < 1e-3);
    assert_eq!(loud.damage.table(FalloffZone::Head).resolve(10.0), 120.0);
}

#[test]
fn test_data_exclusion_is_enforced() {
    let (weapons, attachments) = loaded();
    let err = EquipSet::new("marksman", &["muzzle_brake", "suppressor", "subsonic_ammo"])
        .compose(&weapons, &attachments)
        .unwrap_err();
    assert_eq!(err.attachment().map(|id| id.as_str()), Some("muzzle_brake"));
}

#[test]
fn test_unterminated_table_rejected_with_owner() {
    let toml = r#"
[[weapon]]
id = "broken"
name = "Broken"
category = "secondary"

[weapon.firing]
automatic = false
fire_interval = 0.2
projectiles_per_shot = 1
ammo_per_shot = 1
magazine_size = 8
reserve_ammo = 16
reload_time = 1.5

[weapon.ballistics]
muzzle_velocity = 300.0
drag_per_segment = 2.0
gravity = 0.0
segment_length = 2.0
destabilize_distance = 30.0
destabilize_amount = 0.001
max_range = 80.0

[weapon.damage]
base_damage = 30.0
limb_multiplier = 0.8
body = [
    { max_distance = 10.0, damage = 30.0 },
    { max_distance = 40.0, damage = 20.0 },
]

[weapon.handling]
hip_spread = 0.04
ads_spread = 0.02
sprint_spread = 0.08
sprint_speed_multiplier = 1.0
recoil_pitch = 0.5
recoil_yaw = 0.2
recoil_recovery = 8.0
"#;
    let mut weapons = WeaponRegistry::new();
    match weapons.load_str(toml, "broken.toml") {
        Err(DataError::InvalidFalloffTable {
            owner,
            zone,
            reason,
        }) => {
            assert_eq!(owner, "broken");
            assert_eq!(zone, FalloffZone::Body);
            assert_eq!(reason, FalloffTableError::NotTerminated(40.0));
        }
        other => panic!("expected falloff error, got {:?}", other),
    }
    assert!(weapons.is_empty());
}

#[test]
fn test_empty_override_table_rejected() {
    let toml = r#"
[[attachment]]
id = "blank_rounds"
name = "Blanks"
slot = "ammunition"

[[attachment.mutations]]
op = "override_falloff"
zone = "body"
table = []
"#;
    let err = AttachmentRegistry::new()
        .load_str(toml, "blanks.toml")
        .unwrap_err();
    assert!(matches!(
        err,
        DataError::InvalidFalloffTable {
            reason: FalloffTableError::Empty,
            ..
        }
    ));
}

#[test]
fn test_missing_directory_is_io_error() {
    let err = WeaponRegistry::new()
        .load_directory(&data_dir().join("does_not_exist"))
        .unwrap_err();
    assert!(matches!(err, DataError::Io(_)));
}
