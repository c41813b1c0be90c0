//! Loadout Probe
//!
//! Composes a loadout and prints resolved damage and spread at a set of
//! distances. Useful for balancing attachments without running the game.

use std::path::{Path, PathBuf};

use armory::attachments::{AttachmentRegistry, SlotType};
use armory::ballistics::{resolve_shot_with, sample_spread_offset, HitZone, Stance};
use armory::core::{set_config, ArmoryConfig, ArmoryError, AttachmentId, Result};
use armory::loadout::{compose, compose_repaired, DerivedWeaponDefinition};
use armory::weapons::WeaponRegistry;
use armory::CompositionError;
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZoneArg {
    Head,
    Body,
    Limb,
}

impl From<ZoneArg> for HitZone {
    fn from(zone: ZoneArg) -> Self {
        match zone {
            ZoneArg::Head => HitZone::Head,
            ZoneArg::Body => HitZone::Body,
            ZoneArg::Limb => HitZone::Limb,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StanceArg {
    Hip,
    Ads,
    Sprint,
}

impl From<StanceArg> for Stance {
    fn from(stance: StanceArg) -> Self {
        match stance {
            StanceArg::Hip => Stance::Hip,
            StanceArg::Ads => Stance::Ads,
            StanceArg::Sprint => Stance::Sprint,
        }
    }
}

/// Loadout Probe - inspect a composed weapon at range
#[derive(Parser, Debug)]
#[command(name = "loadout_probe")]
#[command(about = "Compose a weapon loadout and print damage and spread by distance")]
struct Args {
    /// Weapon id (e.g. rifle, carbine, shotgun)
    weapon: String,

    /// Attachment ids in equip order, comma separated
    #[arg(long, short = 'a', value_delimiter = ',')]
    attach: Vec<String>,

    /// Target distances to evaluate
    #[arg(long, value_delimiter = ',', default_value = "10,35,40,75,150,300,1000")]
    distances: Vec<f32>,

    /// Hit zone
    #[arg(long, value_enum, default_value = "body")]
    zone: ZoneArg,

    /// Shooter stance
    #[arg(long, value_enum, default_value = "hip")]
    stance: StanceArg,

    /// Data directory with weapons/ and attachments/ TOML files
    #[arg(long)]
    data: Option<PathBuf>,

    /// Evaluation config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop invalid attachments instead of failing
    #[arg(long)]
    repair: bool,

    /// Seed for sampling one spread offset per distance
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct ProbeRow {
    distance: f32,
    effective_distance: f32,
    damage: f32,
    total_damage: f32,
    spread: f32,
    destabilization: f32,
    drop: f32,
    in_range: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    spread_offset: Option<[f32; 2]>,
}

#[derive(Serialize)]
struct ProbeReport {
    weapon: String,
    attachments: Vec<AttachmentId>,
    equipped: Vec<(SlotType, AttachmentId)>,
    dropped: Vec<AttachmentId>,
    fire_interval: f32,
    rounds_per_minute: f32,
    magazine_size: u32,
    rows: Vec<ProbeRow>,
}

fn load_registries(data: Option<&Path>) -> Result<(WeaponRegistry, AttachmentRegistry)> {
    let mut weapons = WeaponRegistry::builtin();
    let mut attachments = AttachmentRegistry::builtin();

    if let Some(dir) = data {
        let weapon_dir = dir.join("weapons");
        if weapon_dir.is_dir() {
            let ids = weapons.load_directory(&weapon_dir)?;
            tracing::info!("Loaded {} weapons from {}", ids.len(), weapon_dir.display());
        }
        let attachment_dir = dir.join("attachments");
        if attachment_dir.is_dir() {
            attachments.load_directory(&attachment_dir)?;
        }
    }

    Ok((weapons, attachments))
}

fn probe(
    derived: &DerivedWeaponDefinition,
    dropped: Vec<AttachmentId>,
    args: &Args,
    cfg: &ArmoryConfig,
) -> ProbeReport {
    let mut rng = args.seed.map(ChaCha8Rng::seed_from_u64);

    let rows = args
        .distances
        .iter()
        .map(|&distance| {
            let shot = resolve_shot_with(
                derived,
                distance,
                args.zone.into(),
                args.stance.into(),
                cfg,
            );
            let spread_offset = rng.as_mut().map(|rng| {
                let offset = sample_spread_offset(shot.spread, rng);
                [offset.x, offset.y]
            });
            ProbeRow {
                distance,
                effective_distance: shot.trace.effective_distance,
                damage: shot.damage_per_projectile,
                total_damage: shot.total_damage,
                spread: shot.spread,
                destabilization: shot.trace.destabilization_angle,
                drop: shot.trace.drop,
                in_range: shot.in_range,
                spread_offset,
            }
        })
        .collect();

    ProbeReport {
        weapon: derived.id.to_string(),
        attachments: derived.equip_sequence().to_vec(),
        equipped: derived
            .equipped_slots()
            .map(|(slot, id)| (slot, id.clone()))
            .collect(),
        dropped,
        fire_interval: derived.firing.fire_interval,
        rounds_per_minute: derived.firing.rounds_per_minute(),
        magazine_size: derived.firing.magazine_size,
        rows,
    }
}

fn print_text(report: &ProbeReport) {
    println!("Loadout: {} [{}]", report.weapon, join(&report.attachments));
    for (slot, id) in &report.equipped {
        println!("  {:?}: {}", slot, id);
    }
    if !report.dropped.is_empty() {
        println!("Dropped: {}", join(&report.dropped));
    }
    println!(
        "Fire interval: {:.3}s ({:.0} RPM), magazine {}",
        report.fire_interval, report.rounds_per_minute, report.magazine_size
    );
    println!();
    println!(
        "{:>9} {:>10} {:>8} {:>8} {:>8} {:>8}",
        "distance", "effective", "damage", "total", "spread", "drop"
    );
    for row in &report.rows {
        println!(
            "{:>9.1} {:>10.2} {:>8.1} {:>8.1} {:>8.4} {:>8.3}{}",
            row.distance,
            row.effective_distance,
            row.damage,
            row.total_damage,
            row.spread,
            row.drop,
            if row.in_range { "" } else { "  (beyond max range)" }
        );
    }
}

fn join(ids: &[AttachmentId]) -> String {
    ids.iter()
        .map(AttachmentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("armory=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => ArmoryConfig::load(path)?,
        None => ArmoryConfig::default(),
    };
    if set_config(cfg.clone()).is_err() {
        tracing::warn!("Global config already initialized");
    }

    let (weapons, attachments) = load_registries(args.data.as_deref())?;
    let base = weapons
        .get(args.weapon.as_str())
        .ok_or_else(|| CompositionError::UnknownWeapon(args.weapon.as_str().into()))?;
    let ids: Vec<AttachmentId> = args.attach.iter().map(|id| id.as_str().into()).collect();

    let (derived, dropped) = if args.repair {
        compose_repaired(base, &ids, &attachments)?
    } else {
        (compose(base, &ids, &attachments)?, Vec::new())
    };

    let report = probe(&derived, dropped, &args, &cfg);
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_text(&report),
        other => {
            return Err(ArmoryError::Config(format!(
                "unknown output format '{}' (expected json or text)",
                other
            )))
        }
    }
    Ok(())
}
