use criterion::{black_box, criterion_group, criterion_main, Criterion};

use armory::attachments::AttachmentRegistry;
use armory::ballistics::{resolve_shot_with, trace_with, HitZone, Stance};
use armory::core::types::attachment_ids;
use armory::core::ArmoryConfig;
use armory::loadout::{compose, CompositionCache, EquipSet};
use armory::weapons::{catalog, WeaponRegistry};

fn benchmark_composition(c: &mut Criterion) {
    let weapons = WeaponRegistry::builtin();
    let attachments = AttachmentRegistry::builtin();
    let rifle = catalog::rifle();
    let ids = attachment_ids(&[
        "suppressor",
        "trigger_conversion",
        "subsonic_ammo",
        "scope_4x",
        "drum_mag",
        "long_barrel",
    ]);

    let mut group = c.benchmark_group("composition");

    group.bench_function("compose_six_attachments", |b| {
        b.iter(|| compose(black_box(&rifle), black_box(&ids), &attachments))
    });

    let cache = CompositionCache::new();
    let set = EquipSet {
        weapon: rifle.id.clone(),
        attachments: ids.clone(),
    };
    group.bench_function("cached_lookup", |b| {
        b.iter(|| cache.get_or_compose(black_box(&set), &weapons, &attachments))
    });

    group.finish();
}

fn benchmark_evaluation(c: &mut Criterion) {
    let cfg = ArmoryConfig::default();
    let rifle = catalog::rifle();
    let sniper = catalog::sniper();

    let mut group = c.benchmark_group("evaluation");

    group.bench_function("trace_hitscan_450", |b| {
        b.iter(|| trace_with(black_box(&rifle.ballistics), black_box(450.0), &cfg))
    });

    group.bench_function("trace_dropping_1000", |b| {
        b.iter(|| trace_with(black_box(&sniper.ballistics), black_box(1000.0), &cfg))
    });

    group.bench_function("resolve_shot", |b| {
        b.iter(|| {
            resolve_shot_with(
                black_box(&rifle),
                black_box(120.0),
                HitZone::Head,
                Stance::Ads,
                &cfg,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_composition, benchmark_evaluation);
criterion_main!(benches);
