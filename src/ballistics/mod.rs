//! Fire-time evaluation: projectile stepping, damage and spread

pub mod damage;
pub mod spread;
pub mod stepper;

pub use damage::{resolve_blast, resolve_shot, resolve_shot_with, zone_damage, HitZone, ShotResolution};
pub use spread::{
    sample_recoil_kick, sample_spread_offset, spread_cone, spread_cone_with, stance_spread, Stance,
};
pub use stepper::{trace, trace_path, trace_path_with, trace_with, TracePoint, TraceResult};
